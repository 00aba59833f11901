//! Projection, filtering, and ordering of vendor vulnerability records.
//!
//! CVE and host records are returned to the host as received; the vendor
//! payload is already the unit of interest and unknown fields must survive
//! untouched. What lives here is the `data` envelope unwrapping and the
//! typed projections the filters and sort are built on.

use serde_json::Value;

use crate::schemas::Severity;

/// Unwrap the CLI's `data` envelope into a record list.
///
/// The vendor omits the field when nothing matched; that reads as an empty
/// list, not a failure.
pub fn data_records(raw: &Value) -> Vec<Value> {
    raw.get("data").and_then(Value::as_array).cloned().unwrap_or_default()
}

/// Severity of one record, lowercased for comparison; absent reads as empty.
pub fn severity_of(record: &Value) -> String {
    record
        .get("severity")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// CVSS score of one record, coerced from a number or a numeric string;
/// absent or unparsable reads as 0.0.
pub fn cvss_score_of(record: &Value) -> f64 {
    match record.get("cvss_score") {
        Some(Value::Number(score)) => score.as_f64().unwrap_or(0.0),
        Some(Value::String(score)) => score.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

/// Keep records at exactly the given severity, order preserved.
pub fn filter_by_severity(records: Vec<Value>, severity: Severity) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| severity_of(record) == severity.as_lower())
        .collect()
}

/// Keep records scoring at or above the threshold, order preserved.
pub fn filter_by_min_score(records: Vec<Value>, min_score: f64) -> Vec<Value> {
    records
        .into_iter()
        .filter(|record| cvss_score_of(record) >= min_score)
        .collect()
}

/// Sort records by CVSS score, highest first.
pub fn sort_by_score_desc(records: &mut [Value]) {
    records.sort_by(|a, b| cvss_score_of(b).total_cmp(&cvss_score_of(a)));
}
