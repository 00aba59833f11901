//! Protocol-boundary response plumbing.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value;

use crate::error::ToolError;

/// Outcome of one tool handler invocation.
pub type ToolResult<T> = Result<T, ToolError>;

/// Fixed sentinel prefixing the text block of every failed invocation.
///
/// Hosts detect failures by this prefix; the response shape itself has no
/// error variant.
pub const ERROR_PREFIX: &str = "Error: ";

/// Flatten a handler outcome into the single-text-block wire shape.
///
/// Successes serialize as pretty-printed JSON. Failures become one text
/// block starting with [`ERROR_PREFIX`]; the typed error never crosses this
/// boundary.
pub fn render_tool_result(outcome: ToolResult<Value>) -> CallToolResult {
    match outcome {
        Ok(payload) => {
            let text = serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string());
            CallToolResult::success(vec![Content::text(text)])
        }
        Err(error) => CallToolResult::success(vec![Content::text(format!("{ERROR_PREFIX}{error}"))]),
    }
}
