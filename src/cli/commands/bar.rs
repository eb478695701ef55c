//! Point query command.

use anyhow::Result;
use minute_config::AppConfig;
use tracing::{debug, info};

use super::{build_source, format_bar, parse_datetime, resolve_instrument};
use crate::cli::{BarArgs, OutputFormat};

pub async fn run(args: BarArgs, config: &AppConfig) -> Result<()> {
    let mut source = build_source(config)?;
    let instrument = resolve_instrument(&source, &args.instrument)?;
    let dt = parse_datetime(&args.datetime)?;
    info!(symbol = %instrument.order_book_id, %dt, frequency = %args.frequency, "Bar query");

    let bar = source.get_bar(&instrument, dt, args.frequency).await?;

    match (args.output, &bar) {
        (OutputFormat::Json, _) => println!("{}", serde_json::to_string_pretty(&bar)?),
        (OutputFormat::Text, Some(bar)) => println!("{}", format_bar(bar)),
        (OutputFormat::Text, None) => println!("No bar for {} at {}", instrument.order_book_id, dt),
    }

    debug!(stats = ?source.stats(), "Cache stats");
    Ok(())
}
