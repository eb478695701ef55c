//! Logging setup.

mod logging;

pub use logging::{setup_logging, setup_logging_with_file, LogGuard};
