use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    Off,
    /// Error messages only
    Error,
    /// Warnings and errors (default)
    Warn,
    /// Informational messages
    Info,
    /// Debug messages
    Debug,
    /// Trace-level messages (most verbose)
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::OFF,
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "r2o")]
#[command(about = "r2o - Convert a Roam Research JSON export into Obsidian markdown")]
#[command(version)]
pub struct Cli {
    /// Roam JSON export to convert
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Directory for pages (overrides config file, default: md)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Directory for daily notes (overrides config file, default: the pages directory)
    #[arg(short, long, value_name = "DIR")]
    pub daily_dir: Option<PathBuf>,

    /// Config file path (defaults to ~/.config/r2o/config.toml)
    #[arg(short = 'C', long)]
    pub config: Option<PathBuf>,

    /// Set log level (off, error, warn, info, debug, trace)
    #[arg(short = 'l', long, value_enum)]
    pub log_level: Option<LogLevel>,

    /// Enable verbose logging (shortcut for --log-level=debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Hide progress bars and the pass summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Write anchors with the same sanitized uid the links use
    #[arg(long)]
    pub sanitize_anchors: bool,
}

impl Cli {
    /// Effective log level: explicit level, then --verbose, then warn
    pub fn level_filter(&self) -> LevelFilter {
        match (self.log_level, self.verbose) {
            (Some(level), _) => level.into(),
            (None, true) => LevelFilter::DEBUG,
            (None, false) => LevelFilter::WARN,
        }
    }
}
