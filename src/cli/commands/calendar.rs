//! Trading calendar command.

use anyhow::Result;
use minute_config::AppConfig;

use super::build_source;
use crate::cli::CalendarArgs;

pub async fn run(args: CalendarArgs, config: &AppConfig) -> Result<()> {
    let source = build_source(config)?;
    let dates = source.trading_calendar()?;

    let selected: Vec<_> = dates
        .into_iter()
        .filter(|d| args.from.map_or(true, |from| *d >= from))
        .filter(|d| args.to.map_or(true, |to| *d <= to))
        .collect();
    for date in &selected {
        println!("{}", date);
    }
    println!("{} trading dates", selected.len());
    Ok(())
}
