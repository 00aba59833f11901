//! Failure taxonomy for tool invocations.

use thiserror::Error;

/// Failures that can surface anywhere in a tool handler chain.
///
/// All of these are recovered at the dispatcher boundary and flattened into
/// the text-prefixed wire convention; none of them ends the session.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("missing required argument: {name}")]
    MissingRequiredArgument { name: String },

    #[error("invalid value for '{name}': {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("{program} CLI not found on PATH. Install it and restart the server")]
    CommandNotFound { program: String },

    #[error("{program} command timed out after {timeout_secs} seconds")]
    CommandTimedOut { program: String, timeout_secs: u64 },

    #[error("{program} command failed: {diagnostic}")]
    CommandNonZeroExit { program: String, diagnostic: String },

    #[error("failed to parse {program} output as JSON: {reason}")]
    MalformedCommandOutput { program: String, reason: String },

    #[error("failed to launch {program}: {reason}")]
    Spawn { program: String, reason: String },

    #[error("{reason}")]
    Extraction { reason: String },

    #[error("{reason}")]
    Resolution { reason: String },
}

impl ToolError {
    /// Create a missing required argument error.
    pub fn missing_argument(name: impl Into<String>) -> Self {
        Self::MissingRequiredArgument { name: name.into() }
    }

    /// Create an invalid argument error.
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create a command not found error.
    pub fn command_not_found(program: impl Into<String>) -> Self {
        Self::CommandNotFound { program: program.into() }
    }

    /// Create a command timeout error.
    pub fn command_timed_out(program: impl Into<String>, timeout_secs: u64) -> Self {
        Self::CommandTimedOut {
            program: program.into(),
            timeout_secs,
        }
    }

    /// Create a non-zero exit error carrying the captured diagnostic text.
    pub fn non_zero_exit(program: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self::CommandNonZeroExit {
            program: program.into(),
            diagnostic: diagnostic.into(),
        }
    }

    /// Create a malformed command output error.
    pub fn malformed_output(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedCommandOutput {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create a spawn error for launch failures other than a missing binary.
    pub fn spawn(program: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Spawn {
            program: program.into(),
            reason: reason.into(),
        }
    }

    /// Create an extraction error for an absent or empty nested structure.
    pub fn extraction(reason: impl Into<String>) -> Self {
        Self::Extraction { reason: reason.into() }
    }

    /// Create a resolution error for a dependent lookup that yielded nothing.
    pub fn resolution(reason: impl Into<String>) -> Self {
        Self::Resolution { reason: reason.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_creation() {
        let err = ToolError::missing_argument("instance_id");
        assert!(matches!(err, ToolError::MissingRequiredArgument { .. }));

        let err = ToolError::command_timed_out("aws", 30);
        assert!(matches!(err, ToolError::CommandTimedOut { .. }));

        let err = ToolError::non_zero_exit("lacework", "bad credentials");
        assert!(matches!(err, ToolError::CommandNonZeroExit { .. }));
    }

    #[test]
    fn test_message_formats() {
        assert_eq!(
            ToolError::missing_argument("cve_id").to_string(),
            "missing required argument: cve_id"
        );
        assert_eq!(
            ToolError::command_timed_out("aws", 30).to_string(),
            "aws command timed out after 30 seconds"
        );
        assert_eq!(
            ToolError::non_zero_exit("aws", "InvalidInstanceID.NotFound").to_string(),
            "aws command failed: InvalidInstanceID.NotFound"
        );
        assert_eq!(
            ToolError::extraction("no instance data found").to_string(),
            "no instance data found"
        );
    }
}
