//! Vendor CLI execution adapter.
//!
//! Tool handlers retrieve data by invoking an external command-line program
//! and expecting JSON on stdout. [`CliRunner`] owns that interaction: it
//! appends the vendor's machine-readable output flag when the caller has not
//! already passed one, bounds the child process with a wall-clock timeout,
//! and classifies every outcome into the shared failure taxonomy. One call
//! is one invocation; there are no retries.

use std::process::Stdio;
use std::time::Duration;

use serde_json::Value;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use cloudscout_types::{ToolError, ToolResult};

/// Captured output of one completed CLI invocation.
#[derive(Debug, Clone)]
pub struct CliOutput {
    pub stdout: String,
    pub stderr: String,
    /// Parsed stdout, when it was valid JSON.
    pub json: Option<Value>,
    /// Parse failure detail when stdout was not valid JSON. Reported rather
    /// than silently falling back to raw text so the caller decides whether
    /// raw text is acceptable.
    pub parse_error: Option<String>,
}

/// Runs one vendor CLI with a bounded wall clock and uniform outcome
/// classification.
#[derive(Debug, Clone)]
pub struct CliRunner {
    program: String,
    json_flag: Vec<String>,
    timeout: Duration,
}

impl CliRunner {
    /// Create a runner for `program`.
    ///
    /// `json_flag` is the argument sequence that switches the CLI into
    /// machine-readable output (for example `["--output", "json"]` or
    /// `["--json"]`); it is appended to every invocation unless the caller
    /// already passed its leading token. An empty slice disables appending.
    pub fn new(program: impl Into<String>, json_flag: &[&str], timeout: Duration) -> Self {
        Self {
            program: program.into(),
            json_flag: json_flag.iter().map(|flag| flag.to_string()).collect(),
            timeout,
        }
    }

    /// Name of the external program this runner invokes.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Execute the CLI once and classify the outcome.
    ///
    /// Classification in priority order: binary not resolvable →
    /// [`ToolError::CommandNotFound`]; wall clock exceeded →
    /// [`ToolError::CommandTimedOut`] (the child is terminated); non-zero
    /// exit → [`ToolError::CommandNonZeroExit`] carrying stderr, falling
    /// back to stdout, verbatim. Otherwise the call succeeds and stdout is
    /// offered both raw and as parsed JSON.
    pub async fn run(&self, args: &[String]) -> ToolResult<CliOutput> {
        let argv = with_json_flag(args, &self.json_flag);
        debug!(program = %self.program, ?argv, "running vendor CLI");

        let mut command = Command::new(&self.program);
        command
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = match command.spawn() {
            Ok(child) => child,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                return Err(ToolError::command_not_found(&self.program));
            }
            Err(error) => return Err(ToolError::spawn(&self.program, error.to_string())),
        };

        // On timeout the in-flight future is dropped and kill_on_drop
        // terminates the child.
        let output = match timeout(self.timeout, child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => return Err(ToolError::spawn(&self.program, error.to_string())),
            Err(_elapsed) => {
                return Err(ToolError::command_timed_out(&self.program, self.timeout.as_secs()));
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            let diagnostic = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(ToolError::non_zero_exit(&self.program, diagnostic));
        }

        let (json, parse_error) = match serde_json::from_str::<Value>(&stdout) {
            Ok(value) => (Some(value), None),
            Err(error) => (None, Some(error.to_string())),
        };

        Ok(CliOutput {
            stdout,
            stderr,
            json,
            parse_error,
        })
    }

    /// Execute the CLI once and require JSON on stdout.
    pub async fn run_json(&self, args: &[String]) -> ToolResult<Value> {
        let output = self.run(args).await?;
        match output.json {
            Some(value) => Ok(value),
            None => Err(ToolError::malformed_output(
                &self.program,
                output.parse_error.unwrap_or_else(|| "empty output".to_string()),
            )),
        }
    }
}

/// Append the machine-readable output flag unless its leading token is
/// already present in `args`.
fn with_json_flag(args: &[String], json_flag: &[String]) -> Vec<String> {
    let mut argv = args.to_vec();
    if let Some(sentinel) = json_flag.first()
        && !argv.iter().any(|arg| arg == sentinel)
    {
        argv.extend(json_flag.iter().cloned());
    }
    argv
}
