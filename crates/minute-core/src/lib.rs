//! Core types and traits for the minute bar cache.
//!
//! This crate provides the foundational building blocks including:
//! - Market data types (Bar, Instrument, Frequency)
//! - The integer datetime encoding used as the cache's sort key
//! - Traits for the bulk provider, trading calendar and daily fallback source

pub mod types;
pub mod traits;
pub mod error;

pub use error::{DataError, DataResult};
pub use types::*;
pub use traits::*;
