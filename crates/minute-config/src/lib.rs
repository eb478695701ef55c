//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, CacheSettings, DataSettings, ExchangeMapping, LoggingConfig,
    SymbolSettings,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Load configuration from file and environment.
///
/// Environment variables prefixed `MINUTE__` override file values, e.g.
/// `MINUTE__CACHE__INITIAL_SIZE=960`.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(true))
        .add_source(
            Environment::with_prefix("MINUTE")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let app: AppConfig = config.try_deserialize()?;
    app.validate()?;
    Ok(app)
}
