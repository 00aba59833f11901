//! Request parameter schemas for the vulnerability tools.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Severity levels reported by the vulnerability CLI.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Lowercase form used for case-insensitive comparison against vendor
    /// records.
    pub fn as_lower(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

/// Parameters for the CVE inventory tool.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListCvesRequest {
    /// Keep only CVEs at exactly this severity.
    #[schemars(description = "Filter by severity (Critical, High, Medium, Low).")]
    pub severity_filter: Option<Severity>,
    /// Keep only CVEs scoring at or above this threshold.
    #[schemars(description = "Minimum CVSS score (0.0-10.0).", range(min = 0.0, max = 10.0))]
    pub min_cvss_score: Option<f64>,
    /// Start of the query window.
    #[schemars(description = "Start of time range (default: -24h). Examples: -7d, -1w, 2024-01-01T00:00:00Z.")]
    pub start_time: Option<String>,
    /// End of the query window.
    #[schemars(description = "End of time range (default: now). Examples: now, 2024-01-31T23:59:59Z.")]
    pub end_time: Option<String>,
}

/// Parameters for the affected-host lookup tool.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListHostsByCveRequest {
    /// CVE to look up.
    #[schemars(
        description = "CVE identifier (e.g., CVE-2024-1234).",
        regex(pattern = r"^CVE-\d{4}-\d+$")
    )]
    pub cve_id: String,
    /// Start of the query window.
    #[schemars(description = "Start of time range (default: -24h).")]
    pub start_time: Option<String>,
    /// End of the query window.
    #[schemars(description = "End of time range (default: now).")]
    pub end_time: Option<String>,
}

/// Parameters for the prioritized critical-CVE tool.
#[derive(JsonSchema, Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GetCriticalCvesRequest {
    /// Score threshold; unset means 9.0 (Critical).
    #[schemars(
        description = "Minimum CVSS score threshold (default: 9.0 for Critical).",
        range(min = 0.0, max = 10.0)
    )]
    pub min_cvss_score: Option<f64>,
    /// Start of the query window.
    #[schemars(description = "Start of time range (default: -24h).")]
    pub start_time: Option<String>,
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
        let list = serde_json::to_value(schema_for!(ListCvesRequest)).unwrap();
        assert_required_subset_of_properties(&list);

        let hosts = serde_json::to_value(schema_for!(ListHostsByCveRequest)).unwrap();
        assert_required_subset_of_properties(&hosts);
        let required = hosts["required"].as_array().expect("cve_id is required");
        assert_eq!(required.len(), 1);
        assert_eq!(required[0], "cve_id");

        let critical = serde_json::to_value(schema_for!(GetCriticalCvesRequest)).unwrap();
        assert_required_subset_of_properties(&critical);
    }

    #[test]
    fn test_severity_enum_has_four_fixed_levels() {
        let schema = serde_json::to_value(schema_for!(Severity)).unwrap();
        let levels = schema["enum"].as_array().expect("enum schema");
        assert_eq!(levels.len(), 4);
        for level in ["Critical", "High", "Medium", "Low"] {
            assert!(levels.iter().any(|value| value == level));
        }
    }

    #[test]
    fn test_severity_round_trip() {
        let severity: Severity = serde_json::from_str("\"Critical\"").unwrap();
        assert_eq!(severity, Severity::Critical);
        assert_eq!(severity.as_lower(), "critical");
        assert!(serde_json::from_str::<Severity>("\"Severe\"").is_err());
    }
}
