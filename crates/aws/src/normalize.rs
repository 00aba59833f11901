//! Normalizers for AWS CLI responses.
//!
//! The AWS API nests the interesting fields several levels deep and pads
//! them with volume the host does not need. Each normalizer here is a pure
//! function of one raw response: it either yields a fully built summary or a
//! typed extraction failure, never a partial record. Every nested lookup
//! tolerates absent data.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use cloudscout_types::{ToolError, ToolResult};

/// Flat summary of one EC2 instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceSummary {
    pub instance_id: Option<String>,
    pub instance_type: Option<String>,
    pub state: Option<String>,
    pub availability_zone: Option<String>,
    /// AWS only sets `Platform` for Windows; everything else is Linux.
    pub platform: String,
    pub public_ip: Option<String>,
    pub private_ip: Option<String>,
    pub public_dns: Option<String>,
    pub private_dns: Option<String>,
    pub vpc_id: Option<String>,
    pub subnet_id: Option<String>,
    pub security_group_ids: Vec<String>,
    pub iam_instance_profile: Option<String>,
    pub tags: IndexMap<String, String>,
    pub launch_time: Option<String>,
    pub architecture: Option<String>,
    pub virtualization_type: Option<String>,
}

/// One inbound or outbound security-group rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleSummary {
    pub protocol: String,
    /// Absent together with `to_port` when the rule is fully open.
    pub from_port: Option<i64>,
    pub to_port: Option<i64>,
    pub ip_ranges: Vec<String>,
    pub ipv6_ranges: Vec<String>,
    pub peer_group_ids: Vec<String>,
    pub description: Option<String>,
}

/// Flat summary of one security group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SecurityGroupSummary {
    pub group_id: Option<String>,
    pub group_name: Option<String>,
    pub description: Option<String>,
    pub vpc_id: Option<String>,
    pub inbound_rules: Vec<RuleSummary>,
    pub outbound_rules: Vec<RuleSummary>,
    pub tags: IndexMap<String, String>,
}

/// Build an [`InstanceSummary`] from a raw `describe-instances` response.
pub fn instance_summary(raw: &Value) -> ToolResult<InstanceSummary> {
    let instance = first_instance(raw)?;
    Ok(InstanceSummary {
        instance_id: str_field(instance, "InstanceId"),
        instance_type: str_field(instance, "InstanceType"),
        state: nested_str(instance, "State", "Name"),
        availability_zone: nested_str(instance, "Placement", "AvailabilityZone"),
        platform: str_field(instance, "Platform").unwrap_or_else(|| "linux".to_string()),
        public_ip: str_field(instance, "PublicIpAddress"),
        private_ip: str_field(instance, "PrivateIpAddress"),
        public_dns: str_field(instance, "PublicDnsName"),
        private_dns: str_field(instance, "PrivateDnsName"),
        vpc_id: str_field(instance, "VpcId"),
        subnet_id: str_field(instance, "SubnetId"),
        security_group_ids: project_strings(instance.get("SecurityGroups"), "GroupId"),
        iam_instance_profile: nested_str(instance, "IamInstanceProfile", "Arn"),
        tags: fold_tags(instance.get("Tags")),
        launch_time: str_field(instance, "LaunchTime"),
        architecture: str_field(instance, "Architecture"),
        virtualization_type: str_field(instance, "VirtualizationType"),
    })
}

/// Project the attached security-group ids out of a raw `describe-instances`
/// response.
///
/// This is the dependent lookup step of the security-group tool: an unknown
/// instance or an instance with no attached groups terminates the pipeline
/// with a resolution failure instead of an empty-but-successful list.
pub fn instance_security_group_ids(raw: &Value, instance_id: &str) -> ToolResult<Vec<String>> {
    let instance =
        first_instance(raw).map_err(|_| ToolError::resolution(format!("instance {instance_id} not found")))?;
    let ids = project_strings(instance.get("SecurityGroups"), "GroupId");
    if ids.is_empty() {
        return Err(ToolError::resolution(format!(
            "instance {instance_id} has no attached security groups"
        )));
    }
    Ok(ids)
}

/// Build summaries for every group in a raw `describe-security-groups`
/// response.
pub fn security_group_summaries(raw: &Value) -> Vec<SecurityGroupSummary> {
    raw.get("SecurityGroups")
        .and_then(Value::as_array)
        .map(|groups| groups.iter().map(group_summary).collect())
        .unwrap_or_default()
}

fn group_summary(group: &Value) -> SecurityGroupSummary {
    SecurityGroupSummary {
        group_id: str_field(group, "GroupId"),
        group_name: str_field(group, "GroupName"),
        description: str_field(group, "Description"),
        vpc_id: str_field(group, "VpcId"),
        inbound_rules: rule_summaries(group.get("IpPermissions")),
        outbound_rules: rule_summaries(group.get("IpPermissionsEgress")),
        tags: fold_tags(group.get("Tags")),
    }
}

fn rule_summaries(rules: Option<&Value>) -> Vec<RuleSummary> {
    rules
        .and_then(Value::as_array)
        .map(|rules| rules.iter().map(rule_summary).collect())
        .unwrap_or_default()
}

fn rule_summary(rule: &Value) -> RuleSummary {
    RuleSummary {
        protocol: str_field(rule, "IpProtocol").unwrap_or_else(|| "all".to_string()),
        from_port: rule.get("FromPort").and_then(Value::as_i64),
        to_port: rule.get("ToPort").and_then(Value::as_i64),
        ip_ranges: project_strings(rule.get("IpRanges"), "CidrIp"),
        ipv6_ranges: project_strings(rule.get("Ipv6Ranges"), "CidrIpv6"),
        peer_group_ids: project_strings(rule.get("UserIdGroupPairs"), "GroupId"),
        description: rule
            .get("IpRanges")
            .and_then(Value::as_array)
            .and_then(|ranges| ranges.first())
            .and_then(|range| str_field(range, "Description")),
    }
}

fn first_instance(raw: &Value) -> ToolResult<&Value> {
    raw.get("Reservations")
        .and_then(Value::as_array)
        .and_then(|reservations| reservations.first())
        .and_then(|reservation| reservation.get("Instances"))
        .and_then(Value::as_array)
        .and_then(|instances| instances.first())
        .ok_or_else(|| ToolError::extraction("no instance data found"))
}

/// Fold a `{Key, Value}` tag list into a plain map; later duplicates win.
fn fold_tags(tags: Option<&Value>) -> IndexMap<String, String> {
    let mut folded = IndexMap::new();
    if let Some(entries) = tags.and_then(Value::as_array) {
        for entry in entries {
            if let (Some(key), Some(value)) = (str_field(entry, "Key"), str_field(entry, "Value")) {
                folded.insert(key, value);
            }
        }
    }
    folded
}

/// Project one string attribute out of each record in a list, skipping
/// records where it is absent.
fn project_strings(list: Option<&Value>, key: &str) -> Vec<String> {
    list.and_then(Value::as_array)
        .map(|entries| entries.iter().filter_map(|entry| str_field(entry, key)).collect())
        .unwrap_or_default()
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

fn nested_str(value: &Value, outer: &str, inner: &str) -> Option<String> {
    value.get(outer).and_then(|nested| str_field(nested, inner))
}
