//! The vulnerability posture tool server.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Map, Value, json};

use cloudscout_exec::CliRunner;
use cloudscout_types::{ToolResult, render_tool_result};

use crate::config::ServerConfig;
use crate::normalize;
use crate::schemas::{GetCriticalCvesRequest, ListCvesRequest, ListHostsByCveRequest};
use crate::timerange;

/// CVSS threshold used when the caller does not supply one.
const DEFAULT_CRITICAL_THRESHOLD: f64 = 9.0;

/// MCP server exposing FortiCNAPP vulnerability tools over the Lacework CLI.
#[derive(Clone)]
pub struct FortiCnappServer {
    tool_router: ToolRouter<Self>,
    runner: CliRunner,
}

#[tool_router]
impl FortiCnappServer {
    /// Create a server from the resolved process configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            runner: CliRunner::new(config.cli_bin, &["--json"], config.timeout),
        }
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List all CVEs found on hosts in your environment. Returns CVE ID, severity, CVSS scores, affected packages, and host count. Optionally filter by severity level (Critical, High, Medium, Low) or CVSS threshold."
    )]
    async fn list_cves(&self, param: Parameters<ListCvesRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(render_tool_result(self.handle_list_cves(param.0).await))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "List all hosts that contain a specific CVE ID. Returns machine ID, hostname, IP addresses, OS, cloud provider, instance ID, and status. Useful for identifying which instances need patching or remediation."
    )]
    async fn list_hosts_by_cve(&self, param: Parameters<ListHostsByCveRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(render_tool_result(self.handle_list_hosts_by_cve(param.0).await))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get high-priority CVEs that need immediate attention, sorted by CVSS score. Returns CVEs at or above the threshold (default 9.0) with host counts for prioritization."
    )]
    async fn get_critical_cves(&self, param: Parameters<GetCriticalCvesRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(render_tool_result(self.handle_get_critical_cves(param.0).await))
    }

    async fn handle_list_cves(&self, request: ListCvesRequest) -> ToolResult<Value> {
        let args = with_time_range(
            list_cves_args(),
            request.start_time.as_deref(),
            request.end_time.as_deref(),
        )?;
        let raw = self.runner.run_json(&args).await?;

        let mut cves = normalize::data_records(&raw);
        if let Some(severity) = request.severity_filter {
            cves = normalize::filter_by_severity(cves, severity);
        }
        if let Some(min_score) = request.min_cvss_score {
            cves = normalize::filter_by_min_score(cves, min_score);
        }

        let mut response = Map::new();
        response.insert("total_cves".to_string(), json!(cves.len()));
        response.insert("filters_applied".to_string(), filters_applied(&request));
        response.insert("cves".to_string(), Value::Array(cves));
        Ok(Value::Object(response))
    }

    async fn handle_list_hosts_by_cve(&self, request: ListHostsByCveRequest) -> ToolResult<Value> {
        let base = vec![
            "vulnerability".to_string(),
            "host".to_string(),
            "list-hosts".to_string(),
            request.cve_id.clone(),
        ];
        let args = with_time_range(base, request.start_time.as_deref(), request.end_time.as_deref())?;
        let raw = self.runner.run_json(&args).await?;
        let hosts = normalize::data_records(&raw);

        let mut response = Map::new();
        response.insert("cve_id".to_string(), json!(request.cve_id));
        response.insert("affected_hosts_count".to_string(), json!(hosts.len()));
        response.insert("hosts".to_string(), Value::Array(hosts));
        Ok(Value::Object(response))
    }

    async fn handle_get_critical_cves(&self, request: GetCriticalCvesRequest) -> ToolResult<Value> {
        let threshold = request.min_cvss_score.unwrap_or(DEFAULT_CRITICAL_THRESHOLD);
        let args = with_time_range(list_cves_args(), request.start_time.as_deref(), None)?;
        let raw = self.runner.run_json(&args).await?;

        let all_cves = normalize::data_records(&raw);
        let total_scanned = all_cves.len();
        let mut critical = normalize::filter_by_min_score(all_cves, threshold);
        normalize::sort_by_score_desc(&mut critical);

        let mut response = Map::new();
        response.insert("threshold".to_string(), json!(threshold));
        response.insert("critical_cves_count".to_string(), json!(critical.len()));
        response.insert("total_cves_scanned".to_string(), json!(total_scanned));
        response.insert("critical_cves".to_string(), Value::Array(critical));
        Ok(Value::Object(response))
    }
}

fn list_cves_args() -> Vec<String> {
    vec!["vulnerability".to_string(), "host".to_string(), "list-cves".to_string()]
}

/// Validate and append `--start`/`--end`; nothing is spawned when a value is
/// malformed.
fn with_time_range(mut args: Vec<String>, start: Option<&str>, end: Option<&str>) -> ToolResult<Vec<String>> {
    if let Some(start) = start {
        timerange::validate("start_time", start)?;
        args.push("--start".to_string());
        args.push(start.to_string());
    }
    if let Some(end) = end {
        timerange::validate("end_time", end)?;
        args.push("--end".to_string());
        args.push(end.to_string());
    }
    Ok(args)
}

/// Echo back the filters the caller actually provided, like the response's
/// own receipt.
fn filters_applied(request: &ListCvesRequest) -> Value {
    match serde_json::to_value(request) {
        Ok(Value::Object(fields)) => Value::Object(fields.into_iter().filter(|(_, value)| !value.is_null()).collect()),
        _ => Value::Object(Map::new()),
    }
}

#[tool_handler]
impl ServerHandler for FortiCnappServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "cloudscout-forticnapp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Cloudscout FortiCNAPP".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Tools for querying vulnerability posture over the Lacework CLI.\nFLOW:\n1) list_cves to inventory CVEs; narrow with severity_filter or min_cvss_score.\n2) list_hosts_by_cve to find the machines affected by one CVE.\n3) get_critical_cves for a prioritized, score-sorted shortlist.\nTime ranges accept relative values like -24h, the literal 'now', or RFC 3339 timestamps; the CLI's default window is -24h. Responses are JSON text blocks, and failures are a single block starting with 'Error: '.".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudscout_types::ToolError;

    fn unreachable_server() -> FortiCnappServer {
        FortiCnappServer::new(ServerConfig {
            cli_bin: "cloudscout-definitely-missing-binary".to_string(),
            ..ServerConfig::default()
        })
    }

    fn first_text(result: &CallToolResult) -> String {
        let value = serde_json::to_value(result).expect("serializable result");
        value["content"][0]["text"].as_str().expect("text block").to_string()
    }

    #[test]
    fn test_tool_catalog_names_are_unique_and_described() {
        let tools = FortiCnappServer::tool_router().list_all();
        let mut names: Vec<String> = tools.iter().map(|tool| tool.name.to_string()).collect();
        assert_eq!(names.len(), 3);
        names.sort();
        names.dedup();
        assert_eq!(
            names,
            vec![
                "get_critical_cves".to_string(),
                "list_cves".to_string(),
                "list_hosts_by_cve".to_string(),
            ]
        );
        for tool in &tools {
            assert!(tool.description.as_ref().is_some_and(|description| !description.is_empty()));
        }
    }

    #[test]
    fn test_time_range_is_validated_before_spawning() {
        let err = with_time_range(list_cves_args(), Some("yesterday"), None).expect_err("invalid range");
        assert!(matches!(err, ToolError::InvalidArgument { .. }));

        let args = with_time_range(list_cves_args(), Some("-24h"), Some("now")).unwrap();
        assert_eq!(
            args,
            vec![
                "vulnerability".to_string(),
                "host".to_string(),
                "list-cves".to_string(),
                "--start".to_string(),
                "-24h".to_string(),
                "--end".to_string(),
                "now".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_invalid_time_range_beats_missing_binary() {
        // Validation precedes execution: the error is the argument, not the
        // unreachable CLI.
        let server = unreachable_server();
        let err = server
            .handle_list_cves(ListCvesRequest {
                severity_filter: None,
                min_cvss_score: None,
                start_time: Some("yesterday".to_string()),
                end_time: None,
            })
            .await
            .expect_err("invalid start_time");
        assert!(matches!(err, ToolError::InvalidArgument { .. }));
    }

    #[tokio::test]
    async fn test_failures_flatten_to_error_prefixed_text() {
        let server = unreachable_server();
        let result = server
            .list_cves(Parameters(ListCvesRequest {
                severity_filter: None,
                min_cvss_score: None,
                start_time: None,
                end_time: None,
            }))
            .await
            .expect("dispatcher never propagates failures");
        let text = first_text(&result);
        assert!(text.starts_with("Error: "), "got: {text}");
    }

    #[test]
    fn test_filters_applied_echoes_only_provided_fields() {
        let request = ListCvesRequest {
            severity_filter: Some(crate::schemas::Severity::Critical),
            min_cvss_score: None,
            start_time: Some("-7d".to_string()),
            end_time: None,
        };
        let applied = filters_applied(&request);
        let fields = applied.as_object().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields["severity_filter"], "Critical");
        assert_eq!(fields["start_time"], "-7d");
    }
}
