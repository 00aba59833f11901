use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use cloudscout_forticnapp::config::ServerConfig;
use cloudscout_forticnapp::server::FortiCnappServer;

/// MCP stdio server exposing FortiCNAPP vulnerability tools over the
/// Lacework CLI.
#[derive(Parser, Debug)]
#[command(name = "cloudscout-forticnapp", version, about)]
struct Cli {
    /// Lacework CLI binary to invoke.
    #[arg(long)]
    cli_bin: Option<String>,
    /// Per-call timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = ServerConfig::from_env();
    if let Some(bin) = cli.cli_bin {
        config.cli_bin = bin;
    }
    if let Some(secs) = cli.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    info!(
        cli_bin = %config.cli_bin,
        timeout_secs = config.timeout.as_secs(),
        "starting cloudscout-forticnapp stdio server"
    );

    let service = FortiCnappServer::new(config).serve(stdio()).await?;
    service.waiting().await?;
    Ok(())
}

/// Tracing goes to stderr; stdout carries the protocol.
fn init_tracing() {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
