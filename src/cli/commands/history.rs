//! Trailing window query command.

use anyhow::Result;
use minute_config::AppConfig;
use minute_core::HistoryOptions;
use tracing::{debug, info, warn};

use super::{build_source, format_bar, parse_datetime, resolve_instrument};
use crate::cli::{HistoryArgs, OutputFormat};

pub async fn run(args: HistoryArgs, config: &AppConfig) -> Result<()> {
    let mut source = build_source(config)?;
    let instrument = resolve_instrument(&source, &args.instrument)?;
    let dt = parse_datetime(&args.datetime)?;
    let options = HistoryOptions {
        fields: (!args.fields.is_empty()).then(|| args.fields.clone()),
        skip_suspended: !args.include_suspended,
        include_now: args.include_now,
        adjust_type: config.cache.adjust_type,
    };
    info!(
        symbol = %instrument.order_book_id,
        %dt,
        count = args.count,
        frequency = %args.frequency,
        "History query"
    );

    let bars = source
        .history_bars(&instrument, args.count, args.frequency, dt, &options)
        .await?;
    if bars.len() < args.count {
        warn!(
            requested = args.count,
            returned = bars.len(),
            listed_date = %instrument.listed_date,
            "History shorter than requested"
        );
    }

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bars)?),
        OutputFormat::Text => {
            for bar in &bars {
                println!("{}", format_bar(bar));
            }
            println!("{} bars", bars.len());
        }
    }

    debug!(stats = ?source.stats(), "Cache stats");
    Ok(())
}
