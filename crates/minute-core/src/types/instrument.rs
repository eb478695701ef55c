//! Instrument metadata needed by the cache.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An instrument as seen by the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Instrument {
    /// Data source identifier, e.g. `000001.XSHE`
    pub order_book_id: String,
    /// First date with valid data; backward walks stop before it
    pub listed_date: NaiveDate,
}

impl Instrument {
    /// Create a new instrument.
    pub fn new(order_book_id: impl Into<String>, listed_date: NaiveDate) -> Self {
        Self {
            order_book_id: order_book_id.into(),
            listed_date,
        }
    }
}

/// Price adjustment mode passed through to the bulk provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdjustType {
    None,
    #[default]
    Pre,
    Post,
}

impl fmt::Display for AdjustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdjustType::None => "none",
            AdjustType::Pre => "pre",
            AdjustType::Post => "post",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for AdjustType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(AdjustType::None),
            "pre" => Ok(AdjustType::Pre),
            "post" => Ok(AdjustType::Post),
            _ => Err(format!("Invalid adjust type: {}", s)),
        }
    }
}
