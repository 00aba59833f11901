use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use rmcp::{ServiceExt, transport::stdio};
use tracing::info;

use cloudscout_aws::config::ServerConfig;
use cloudscout_aws::server::AwsServer;

/// MCP stdio server exposing EC2 inventory tools over the AWS CLI.
#[derive(Parser, Debug)]
#[command(name = "cloudscout-aws", version, about)]
struct Cli {
    /// AWS CLI binary to invoke.
    #[arg(long)]
    cli_bin: Option<String>,
    /// Per-call timeout in seconds.
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Region applied when a request does not specify one.
    #[arg(long)]
    region: Option<String>,
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
    if let Some(region) = cli.region {
        config.default_region = Some(region);
    }

    info!(
        cli_bin = %config.cli_bin,
        timeout_secs = config.timeout.as_secs(),
        "starting cloudscout-aws stdio server"
    );

    let service = AwsServer::new(config).serve(stdio()).await?;
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
