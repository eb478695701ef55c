//! Bar frequency definitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frequency of a bar query.
///
/// Only `Minute1` is served from the cache and `Daily` is delegated to the
/// fallback source. The remaining variants exist so that callers asking for
/// them get a precise error instead of a parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Frequency {
    #[serde(rename = "tick")]
    Tick,
    #[serde(rename = "1m")]
    #[default]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "30m")]
    Minute30,
    #[serde(rename = "60m")]
    Minute60,
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1w")]
    Weekly,
}

impl Frequency {
    /// Whether bars at this frequency are served from the minute cache.
    pub fn is_cached(&self) -> bool {
        matches!(self, Frequency::Minute1)
    }

    /// Whether requests at this frequency go to the fallback source.
    pub fn is_delegated(&self) -> bool {
        matches!(self, Frequency::Daily)
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Frequency::Tick => "tick",
            Frequency::Minute1 => "1m",
            Frequency::Minute5 => "5m",
            Frequency::Minute15 => "15m",
            Frequency::Minute30 => "30m",
            Frequency::Minute60 => "60m",
            Frequency::Daily => "1d",
            Frequency::Weekly => "1w",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tick" => Ok(Frequency::Tick),
            "1m" | "1min" | "minute" => Ok(Frequency::Minute1),
            "5m" | "5min" => Ok(Frequency::Minute5),
            "15m" | "15min" => Ok(Frequency::Minute15),
            "30m" | "30min" => Ok(Frequency::Minute30),
            "60m" | "1h" => Ok(Frequency::Minute60),
            "1d" | "day" | "daily" => Ok(Frequency::Daily),
            "1w" | "week" | "weekly" => Ok(Frequency::Weekly),
            _ => Err(format!("Invalid frequency: {}", s)),
        }
    }
}
