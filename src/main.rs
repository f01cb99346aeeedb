#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::{Level as TraceLevel, warn};
use tracing_subscriber::FmtSubscriber;

use formatter_profiles::cli::{self, Cli};
use formatter_profiles::config::AppConfig;

fn parse_level(level: &str) -> TraceLevel {
    match level.to_lowercase().as_str() {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Config is read before logging exists, so failures are reported after
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // LOG_LEVEL wins over the configured level
    let log_level = parse_level(&std::env::var("LOG_LEVEL").unwrap_or_else(|_| config.log_level.clone()));

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if let Some(e) = config_error {
        warn!(error = ?e, "Failed to load config, using defaults");
    }

    cli::run(cli, &config)
}
