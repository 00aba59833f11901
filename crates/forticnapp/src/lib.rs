//! FortiCNAPP vulnerability MCP server backed by the Lacework CLI.
//!
//! Exposes three tools over a stdio MCP session: `list_cves`,
//! `list_hosts_by_cve`, and `get_critical_cves`. Vendor CVE and host records
//! pass through as received; this crate owns the envelope unwrapping, the
//! typed projections used for filtering and ordering, and the time-range
//! validation applied before any subprocess is spawned.

pub mod config;
pub mod normalize;
pub mod schemas;
pub mod server;
pub mod timerange;
