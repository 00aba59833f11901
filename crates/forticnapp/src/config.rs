//! Runtime configuration for the FortiCNAPP server process.

use std::time::Duration;

pub const DEFAULT_CLI_BIN: &str = "lacework";
/// The vulnerability CLI is slower than most; give it a wider bound.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration assembled from defaults, environment, and CLI flags.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Binary invoked for every tool call.
    pub cli_bin: String,
    /// Wall-clock bound for one CLI invocation.
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cli_bin: DEFAULT_CLI_BIN.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServerConfig {
    /// Build a configuration from the environment.
    ///
    /// `CLOUDSCOUT_LACEWORK_CLI` overrides the binary and
    /// `CLOUDSCOUT_LACEWORK_TIMEOUT_SECS` the per-call timeout.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(bin) = std::env::var("CLOUDSCOUT_LACEWORK_CLI")
            && !bin.is_empty()
        {
            config.cli_bin = bin;
        }
        if let Ok(secs) = std::env::var("CLOUDSCOUT_LACEWORK_TIMEOUT_SECS")
            && let Ok(secs) = secs.parse::<u64>()
            && secs > 0
        {
            config.timeout = Duration::from_secs(secs);
        }
        config
    }
}
