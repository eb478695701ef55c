//! Configuration structures.

use chrono::{NaiveDate, NaiveTime};
use config::ConfigError;
use minute_core::types::{AdjustType, SessionSchedule};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default)]
    pub symbols: SymbolSettings,
}

impl AppConfig {
    /// Check cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let cache = &self.cache;
        if cache.session_start >= cache.session_end {
            return Err(ConfigError::Message(format!(
                "cache.session_start ({}) must be before cache.session_end ({})",
                cache.session_start, cache.session_end
            )));
        }
        if self.symbols.exchanges.is_empty() {
            return Err(ConfigError::Message(
                "symbols.exchanges must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "minute-cache".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    /// Daily-rotated log file; stdout only when unset
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Cache and fill settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Initial per-symbol size bound; grows with the largest request
    pub initial_size: usize,
    /// Times before this belong to the previous trading session
    pub open_cutoff: NaiveTime,
    /// Start of the per-day fetch window
    pub session_start: NaiveTime,
    /// End of the per-day fetch window
    pub session_end: NaiveTime,
    /// Earliest date reported as available
    pub data_start: NaiveDate,
    /// Price adjustment passed to the provider
    pub adjust_type: AdjustType,
}

impl CacheSettings {
    /// Session schedule for the fill engine.
    pub fn session(&self) -> SessionSchedule {
        SessionSchedule {
            open_cutoff: self.open_cutoff,
            start: self.session_start,
            end: self.session_end,
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        let session = SessionSchedule::default();
        Self {
            initial_size: 480,
            open_cutoff: session.open_cutoff,
            session_start: session.start,
            session_end: session.end,
            data_start: NaiveDate::from_ymd_opt(2017, 5, 1).unwrap_or_default(),
            adjust_type: AdjustType::Pre,
        }
    }
}

/// Locations of the CSV data used by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DataSettings {
    /// Directory of `<provider symbol>.csv` minute files
    pub minute_dir: PathBuf,
    /// Directory of `<order_book_id>.csv` daily files
    pub daily_dir: Option<PathBuf>,
    /// One trading date per row
    pub calendar_file: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            minute_dir: PathBuf::from("data/minute"),
            daily_dir: None,
            calendar_file: PathBuf::from("data/trading_dates.csv"),
        }
    }
}

/// One exchange suffix to provider prefix mapping.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExchangeMapping {
    /// Data source suffix, e.g. `.XSHE`
    pub suffix: String,
    /// Provider prefix, e.g. `SZSE.`
    pub prefix: String,
}

/// Symbol translation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolSettings {
    pub exchanges: Vec<ExchangeMapping>,
}

impl SymbolSettings {
    /// (suffix, prefix) pairs.
    pub fn pairs(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.exchanges
            .iter()
            .map(|m| (m.suffix.clone(), m.prefix.clone()))
    }
}

impl Default for SymbolSettings {
    fn default() -> Self {
        let exchanges = [(".XSHE", "SZSE."), (".XSHG", "SHSE.")]
            .into_iter()
            .map(|(suffix, prefix)| ExchangeMapping {
                suffix: suffix.to_string(),
                prefix: prefix.to_string(),
            })
            .collect();
        Self { exchanges }
    }
}
