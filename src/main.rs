//! Credibility analyzer binary entry point.
//!
//! Loads configuration from the environment, initializes logging and serves
//! the HTTP API until interrupted.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use credibility_analyzer::config::{Config, LogFormat};
use credibility_analyzer::server::AnalyzerServer;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str, format: LogFormat) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Text => builder.with_ansi(false).init(),
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing("info", LogFormat::Text);
            tracing::error!(error = %e, "Configuration error");
            std::process::exit(1);
        }
    };

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_addr = %config.bind_addr,
        provider = ?config.provider,
        "credibility-analyzer starting"
    );

    if let Err(e) = AnalyzerServer::new(config).run().await {
        tracing::error!(error = %e, "Server error");
        std::process::exit(1);
    }

    tracing::info!("credibility-analyzer shutdown complete");
}
