//! Minute bar cache CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::ConfigError;
use minute_config::{load_config, AppConfig};
use minute_monitor::setup_logging_with_file;
use std::path::{Path, PathBuf};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config may be invalid; validate-config reports that itself.
    let config = load_config(&cli.config);

    // Setup logging
    let logging = LogSettings::resolve(&cli, config.as_ref().ok());
    let _log_guard =
        setup_logging_with_file(&logging.level, logging.json, logging.file.as_deref());

    // Execute command
    match cli.command {
        Commands::ValidateConfig(args) => cli::commands::validate::run(args, &cli.config).await,
        Commands::Bar(args) => cli::commands::bar::run(args, &loaded(config, &cli.config)?).await,
        Commands::History(args) => {
            cli::commands::history::run(args, &loaded(config, &cli.config)?).await
        }
        Commands::Range(args) => {
            cli::commands::range::run(args, &loaded(config, &cli.config)?).await
        }
        Commands::Calendar(args) => {
            cli::commands::calendar::run(args, &loaded(config, &cli.config)?).await
        }
    }
}

fn loaded(config: Result<AppConfig, ConfigError>, path: &Path) -> Result<AppConfig> {
    config.with_context(|| format!("Failed to load config {:?}", path))
}

/// Logging options: command-line flags win over the `[logging]` section.
#[derive(Debug, PartialEq)]
struct LogSettings {
    level: String,
    json: bool,
    file: Option<PathBuf>,
}

impl LogSettings {
    fn resolve(cli: &Cli, config: Option<&AppConfig>) -> Self {
        let level = match (&cli.log_level, config) {
            (Some(level), _) => level.as_str().to_string(),
            (None, Some(config)) => config.logging.level.clone(),
            (None, None) => "info".to_string(),
        };
        Self {
            level,
            json: cli.json_logs || config.is_some_and(|c| c.logging.format == "json"),
            file: config.and_then(|c| c.logging.file.clone()),
        }
    }
}
