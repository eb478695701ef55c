//! Error types for the minute bar cache.

use thiserror::Error;

use crate::types::Frequency;

/// Data source errors.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unsupported frequency: {0}")]
    UnsupportedFrequency(Frequency),

    #[error("Invalid frequency: {0}")]
    InvalidFrequency(String),

    #[error("Unknown exchange suffix for symbol: {0}")]
    UnknownExchange(String),

    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for data operations.
pub type DataResult<T> = Result<T, DataError>;
