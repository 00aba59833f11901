//! The EC2 inventory tool server.

use rmcp::handler::server::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, ErrorData, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{ServerHandler, tool, tool_handler, tool_router};
use serde_json::{Map, Value, json};

use cloudscout_exec::CliRunner;
use cloudscout_types::{ToolError, ToolResult, render_tool_result};

use crate::config::ServerConfig;
use crate::normalize;
use crate::schemas::{DescribeInstanceRequest, GetSecurityGroupsRequest};

/// MCP server exposing EC2 inventory tools over the AWS CLI.
///
/// The tool set is fixed at construction and read-only for the process
/// lifetime; every invocation runs a fresh, independent CLI query.
#[derive(Clone)]
pub struct AwsServer {
    tool_router: ToolRouter<Self>,
    runner: CliRunner,
    default_region: Option<String>,
}

#[tool_router]
impl AwsServer {
    /// Create a server from the resolved process configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            tool_router: Self::tool_router(),
            runner: CliRunner::new(config.cli_bin, &["--output", "json"], config.timeout),
            default_region: config.default_region,
        }
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get comprehensive metadata for an EC2 instance by instance ID. Returns instance details including IPs, DNS names, VPC info, security groups, tags, IAM role, state, and more. Essential for gathering context about instances before onboarding them to security tooling."
    )]
    async fn describe_instance(&self, param: Parameters<DescribeInstanceRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(render_tool_result(self.handle_describe_instance(param.0).await))
    }

    #[tool(
        annotations(read_only_hint = true, open_world_hint = true),
        description = "Get detailed security group rules and configurations. Fetches by explicit security group IDs, or resolves them from an instance ID first. Returns inbound/outbound rules with ports, protocols, and peer ranges. Critical for understanding what services are exposed."
    )]
    async fn get_security_groups(&self, param: Parameters<GetSecurityGroupsRequest>) -> Result<CallToolResult, ErrorData> {
        Ok(render_tool_result(self.handle_get_security_groups(param.0).await))
    }

    async fn handle_describe_instance(&self, request: DescribeInstanceRequest) -> ToolResult<Value> {
        let region = request.region.or_else(|| self.default_region.clone());
        let raw = self.describe_instances_raw(&request.instance_id, region.as_deref()).await?;
        let summary = normalize::instance_summary(&raw)?;

        let mut response = Map::new();
        response.insert("instance_id".to_string(), json!(request.instance_id));
        response.insert("summary".to_string(), serde_json::to_value(&summary).unwrap_or(Value::Null));
        if request.include_raw {
            response.insert("raw".to_string(), raw);
        }
        Ok(Value::Object(response))
    }

    /// Two-step pipeline: resolve the target group ids, then fetch their
    /// detail. A failure after step one surfaces as the whole invocation
    /// failing; no partial summary is returned.
    async fn handle_get_security_groups(&self, request: GetSecurityGroupsRequest) -> ToolResult<Value> {
        let region = request.region.or_else(|| self.default_region.clone());

        let group_ids = match (&request.security_group_ids, &request.instance_id) {
            (Some(ids), _) if !ids.is_empty() => ids.clone(),
            (_, Some(instance_id)) => self.resolve_group_ids(instance_id, region.as_deref()).await?,
            _ => return Err(ToolError::missing_argument("instance_id or security_group_ids")),
        };

        let mut args = vec![
            "ec2".to_string(),
            "describe-security-groups".to_string(),
            "--group-ids".to_string(),
        ];
        args.extend(group_ids.iter().cloned());
        let raw = self.runner.run_json(&with_region(args, region.as_deref())).await?;
        let summaries = normalize::security_group_summaries(&raw);

        let mut response = Map::new();
        response.insert("security_group_count".to_string(), json!(summaries.len()));
        response.insert(
            "security_groups".to_string(),
            serde_json::to_value(&summaries).unwrap_or(Value::Null),
        );
        if let Some(instance_id) = request.instance_id {
            response.insert("instance_id".to_string(), json!(instance_id));
        }
        if request.include_raw {
            response.insert("raw".to_string(), raw);
        }
        Ok(Value::Object(response))
    }

    async fn resolve_group_ids(&self, instance_id: &str, region: Option<&str>) -> ToolResult<Vec<String>> {
        let raw = self.describe_instances_raw(instance_id, region).await?;
        normalize::instance_security_group_ids(&raw, instance_id)
    }

    async fn describe_instances_raw(&self, instance_id: &str, region: Option<&str>) -> ToolResult<Value> {
        let args = vec![
            "ec2".to_string(),
            "describe-instances".to_string(),
            "--instance-ids".to_string(),
            instance_id.to_string(),
        ];
        self.runner.run_json(&with_region(args, region)).await
    }
}

fn with_region(mut args: Vec<String>, region: Option<&str>) -> Vec<String> {
    if let Some(region) = region {
        args.push("--region".to_string());
        args.push(region.to_string());
    }
    args
}

#[tool_handler]
impl ServerHandler for AwsServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "cloudscout-aws".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("Cloudscout AWS".to_string()),
                ..Default::default()
            },
            instructions: Some(
                "Tools for gathering EC2 context over the AWS CLI.\nFLOW:\n1) describe_instance with an instance ID for metadata (IPs, VPC, tags, IAM profile, attached security groups).\n2) get_security_groups with the same instance ID, or with explicit group IDs, for inbound/outbound rule detail.\nPass region when the target is outside the CLI's default region. Set include_raw=true only when the summary is insufficient; responses are JSON text blocks, and failures are a single block starting with 'Error: '.".to_string(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_server() -> AwsServer {
        // Points at a binary that cannot exist so any CLI call fails fast.
        AwsServer::new(ServerConfig {
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
        let tools = AwsServer::tool_router().list_all();
        let mut names: Vec<String> = tools.iter().map(|tool| tool.name.to_string()).collect();
        assert_eq!(names.len(), 2);
        names.sort();
        names.dedup();
        assert_eq!(names, vec!["describe_instance".to_string(), "get_security_groups".to_string()]);
        for tool in &tools {
            assert!(tool.description.as_ref().is_some_and(|description| !description.is_empty()));
        }
    }

    #[tokio::test]
    async fn test_security_groups_require_a_selector() {
        let server = unreachable_server();
        let request = GetSecurityGroupsRequest {
            instance_id: None,
            security_group_ids: None,
            region: None,
            include_raw: false,
        };
        let err = server
            .handle_get_security_groups(request)
            .await
            .expect_err("neither selector given");
        assert!(matches!(err, ToolError::MissingRequiredArgument { .. }));
    }

    #[tokio::test]
    async fn test_empty_group_id_list_counts_as_absent() {
        let server = unreachable_server();
        let request = GetSecurityGroupsRequest {
            instance_id: None,
            security_group_ids: Some(vec![]),
            region: None,
            include_raw: false,
        };
        let err = server.handle_get_security_groups(request).await.expect_err("empty list");
        assert!(matches!(err, ToolError::MissingRequiredArgument { .. }));
    }

    #[tokio::test]
    async fn test_failures_flatten_to_error_prefixed_text() {
        let server = unreachable_server();
        let result = server
            .describe_instance(Parameters(DescribeInstanceRequest {
                instance_id: "i-0abc".to_string(),
                region: None,
                include_raw: false,
            }))
            .await
            .expect("dispatcher never propagates failures");
        let text = first_text(&result);
        assert!(text.starts_with("Error: "), "got: {text}");
    }
}
