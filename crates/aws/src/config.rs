//! Runtime configuration for the AWS server process.

use std::time::Duration;

pub const DEFAULT_CLI_BIN: &str = "aws";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration assembled from defaults, environment, and CLI flags.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Binary invoked for every tool call.
    pub cli_bin: String,
    /// Wall-clock bound for one CLI invocation.
    pub timeout: Duration,
    /// Region applied when a request does not specify one.
    pub default_region: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cli_bin: DEFAULT_CLI_BIN.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            default_region: None,
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the environment.
    ///
    /// `CLOUDSCOUT_AWS_CLI` overrides the binary, `CLOUDSCOUT_AWS_TIMEOUT_SECS`
    /// the per-call timeout, and `CLOUDSCOUT_AWS_REGION` the default region.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(bin) = std::env::var("CLOUDSCOUT_AWS_CLI")
            && !bin.is_empty()
        {
            config.cli_bin = bin;
        }
        if let Ok(secs) = std::env::var("CLOUDSCOUT_AWS_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            config.timeout = Duration::from_secs(secs);
        }
        if let Ok(region) = std::env::var("CLOUDSCOUT_AWS_REGION")
            && !region.is_empty()
        {
            config.default_region = Some(region);
        }
        config
    }
}
