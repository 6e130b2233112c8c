use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quorum_core::{
    config::{parse_endpoint_list, AppConfig},
    consensus::RoundOrchestrator,
    report,
    upstream::{HttpClient, HttpClientConfig, RpcLedgerClient},
};
use std::{path::PathBuf, sync::Arc};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "slot-quorum")]
#[command(about = "Polls ledger RPC nodes and reports which slot and block they agree on")]
struct Cli {
    /// Config file path (defaults to $SLOT_QUORUM_CONFIG or config/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Inspect this slot in the block round instead of the quorum winner (0 = no override)
    #[arg(short, long)]
    slot: Option<u64>,

    /// Semicolon-separated endpoint list, replaces the configured endpoints
    #[arg(long)]
    endpoints: Option<String>,

    /// Output format for the final report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Log lines only
    Text,
    /// Log lines plus the full report as JSON on stdout
    Json,
}

/// Filter directives used when `RUST_LOG` is unset. Targets are the library
/// crate and this binary's crate name.
fn default_filter(level: &str) -> String {
    format!("warn,quorum_core={level},{}={level}", env!("CARGO_CRATE_NAME"))
}

/// Initializes the logging system based on the configuration.
///
/// `RUST_LOG` takes precedence over `logging.level`.
fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_filter(&config.logging.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.logging.format.as_str() == "json" {
        let fmt_layer = tracing_subscriber::fmt::layer().json();
        registry.with(fmt_layer).init();
    } else {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .with_target(false);
        registry.with(fmt_layer).init();
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::from_file(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    if let Some(raw) = &cli.endpoints {
        config.endpoints.urls = parse_endpoint_list(raw);
    }
    if let Some(slot) = cli.slot {
        config.round.slot_override = Some(slot);
    }

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    init_logging(&config);
    debug!(
        endpoints = config.endpoints.urls.len(),
        slot_override = ?config.round.override_slot(),
        query_timeout_seconds = config.round.query_timeout_seconds,
        max_concurrent_queries = config.round.max_concurrent_queries,
        "Configuration loaded"
    );

    let http_client = HttpClient::with_config(HttpClientConfig {
        concurrent_limit: config.round.max_concurrent_queries,
        ..HttpClientConfig::default()
    })
    .context("Failed to build HTTP client")?;

    let client = RpcLedgerClient::new(Arc::new(http_client))
        .with_request_timeout(config.round.query_timeout())
        .with_commitment(config.round.commitment.clone());

    let orchestrator =
        RoundOrchestrator::new(Arc::new(client), config.endpoints(), &config.round)?;
    let run_report = orchestrator.run().await;

    report::log_report(&run_report);
    info!(reached_block_round = run_report.reached_block_round(), "pass complete");

    if cli.output == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&run_report).context("Failed to encode report")?;
        println!("{json}");
    }

    Ok(())
}
