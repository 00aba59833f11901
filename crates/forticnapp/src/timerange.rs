//! Time-range argument validation.

use chrono::DateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use cloudscout_types::{ToolError, ToolResult};

/// Relative shorthand accepted by the vendor CLI, e.g. `-24h`, `-7d`, `-1w`.
static RELATIVE_RANGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-\d+[smhdw]$").expect("valid pattern"));

/// Validate one time-range argument before it reaches the CLI.
///
/// Accepts the relative shorthand, the literal `now`, or an RFC 3339
/// timestamp. Anything else is rejected here as a typed argument error
/// instead of surfacing later as an opaque CLI failure.
pub fn validate(name: &str, value: &str) -> ToolResult<()> {
    if value == "now" || RELATIVE_RANGE.is_match(value) || DateTime::parse_from_rfc3339(value).is_ok() {
        return Ok(());
    }
    Err(ToolError::invalid_argument(
        name,
        format!("'{value}' is not a relative range (e.g. -24h), 'now', or an RFC 3339 timestamp"),
    ))
}
