//! Validate configuration command.

use anyhow::Result;
use minute_config::load_config;
use std::path::Path;

use crate::cli::ValidateArgs;

pub async fn run(args: ValidateArgs, config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_config(config_path) {
        Ok(config) => {
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("Initial cache size: {}", config.cache.initial_size);
            println!(
                "Session: {} - {} (open cutoff {})",
                config.cache.session_start, config.cache.session_end, config.cache.open_cutoff
            );
            println!("Minute data: {}", config.data.minute_dir.display());
            println!("Calendar: {}", config.data.calendar_file.display());
            if args.show {
                println!();
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
