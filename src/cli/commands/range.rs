//! Available data range command.

use anyhow::Result;
use minute_config::AppConfig;

use super::build_source;
use crate::cli::RangeArgs;

pub async fn run(args: RangeArgs, config: &AppConfig) -> Result<()> {
    let source = build_source(config)?;
    let (start, end) = source.available_data_range(args.frequency)?;
    println!("{} data available from {} to {}", args.frequency, start, end);
    Ok(())
}
