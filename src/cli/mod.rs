//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use minute_core::Frequency;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "minute")]
#[command(author, version, about = "Minute bar cache in front of a bulk data provider")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides `logging.level` from the config file)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Get the bar at an exact datetime
    Bar(BarArgs),
    /// Get the last N bars ending at or before a datetime
    History(HistoryArgs),
    /// Show the available data range
    Range(RangeArgs),
    /// Print trading dates
    Calendar(CalendarArgs),
    /// Validate configuration
    ValidateConfig(ValidateArgs),
}

#[derive(clap::Args)]
pub struct InstrumentArgs {
    /// Instrument identifier, e.g. 000001.XSHE
    #[arg(short, long)]
    pub symbol: String,

    /// Listing date (YYYY-MM-DD); defaults to the first calendar date
    #[arg(long)]
    pub listed_date: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct BarArgs {
    #[command(flatten)]
    pub instrument: InstrumentArgs,

    /// Datetime (YYYY-MM-DD HH:MM[:SS])
    #[arg(short, long)]
    pub datetime: String,

    /// Frequency (1m or 1d)
    #[arg(short, long, default_value = "1m")]
    pub frequency: Frequency,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct HistoryArgs {
    #[command(flatten)]
    pub instrument: InstrumentArgs,

    /// Number of bars
    #[arg(short = 'n', long, default_value = "240")]
    pub count: usize,

    /// Last datetime of the window (YYYY-MM-DD HH:MM[:SS])
    #[arg(short, long)]
    pub datetime: String,

    /// Frequency (1m or 1d)
    #[arg(short, long, default_value = "1m")]
    pub frequency: Frequency,

    /// Fields to return (comma-separated); all when omitted
    #[arg(long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Keep suspended days in daily history
    #[arg(long)]
    pub include_suspended: bool,

    /// Include the bar still forming at the datetime (daily only)
    #[arg(long)]
    pub include_now: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub output: OutputFormat,
}

#[derive(clap::Args)]
pub struct RangeArgs {
    /// Frequency (1m or 1d)
    #[arg(short, long, default_value = "1m")]
    pub frequency: Frequency,
}

#[derive(clap::Args)]
pub struct CalendarArgs {
    /// First date to print
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last date to print
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

#[derive(clap::Args)]
pub struct ValidateArgs {
    /// Print the effective configuration as TOML
    #[arg(long)]
    pub show: bool,
}
