//! Request parameter schemas for the EC2 inventory tools.
//!
//! Deserializing through these structs is the upfront validation pass:
//! required fields, patterns, and types are enforced before a handler runs,
//! and the same derivation produces the input schema advertised to the host.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the instance description tool.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DescribeInstanceRequest {
    /// Target instance.
    #[schemars(
        description = "EC2 instance ID (e.g., i-1234567890abcdef0).",
        regex(pattern = r"^i-[a-f0-9]+$")
    )]
    pub instance_id: String,
    /// Region override for this call.
    #[schemars(description = "AWS region (e.g., us-east-1). If not specified, uses the default AWS CLI region.")]
    pub region: Option<String>,
    /// Attach the raw vendor response alongside the summary.
    #[serde(default)]
    #[schemars(description = "Include the raw AWS API response in addition to the simplified summary (default: false).")]
    pub include_raw: bool,
}

/// Parameters for the security-group lookup tool.
///
/// One of `instance_id` or `security_group_ids` must resolve to a non-empty
/// group list; the handler enforces the cross-field rule the schema cannot
/// express.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetSecurityGroupsRequest {
    /// Instance whose attached groups should be fetched.
    #[schemars(
        description = "EC2 instance ID to resolve security groups from (e.g., i-1234567890abcdef0).",
        regex(pattern = r"^i-[a-f0-9]+$")
    )]
    pub instance_id: Option<String>,
    /// Explicit group ids, taking precedence over instance resolution.
    #[schemars(description = "List of security group IDs (e.g., [\"sg-12345\", \"sg-67890\"]).")]
    pub security_group_ids: Option<Vec<String>>,
    /// Region override for this call.
    #[schemars(description = "AWS region (e.g., us-east-1). If not specified, uses the default AWS CLI region.")]
    pub region: Option<String>,
    /// Attach the raw vendor response alongside the summary.
    #[serde(default)]
    #[schemars(description = "Include the raw AWS API response in addition to the simplified summary (default: false).")]
    pub include_raw: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::schema_for;
    use serde_json::Value;

    fn assert_required_subset_of_properties(schema: &Value) {
        let properties = schema["properties"].as_object().expect("object schema");
        if let Some(required) = schema["required"].as_array() {
            for name in required {
                let name = name.as_str().expect("required entries are names");
                assert!(properties.contains_key(name), "required field '{name}' missing from properties");
            }
        }
    }

    #[test]
    fn test_schemas_are_well_formed() {
        let describe = serde_json::to_value(schema_for!(DescribeInstanceRequest)).unwrap();
        assert_required_subset_of_properties(&describe);
        let required = describe["required"].as_array().expect("instance_id is required");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "instance_id");
        assert_eq!(describe["properties"]["instance_id"]["pattern"], "^i-[a-f0-9]+$");

        let groups = serde_json::to_value(schema_for!(GetSecurityGroupsRequest)).unwrap();
        assert_required_subset_of_properties(&groups);
        assert!(groups["properties"].as_object().unwrap().contains_key("security_group_ids"));
    }

    #[test]
    fn test_include_raw_defaults_off() {
        let request: DescribeInstanceRequest =
            serde_json::from_value(serde_json::json!({"instance_id": "i-0abc"})).unwrap();
        assert!(!request.include_raw);
        assert!(request.region.is_none());
    }
}
