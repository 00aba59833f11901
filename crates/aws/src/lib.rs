//! EC2 inventory MCP server backed by the AWS CLI.
//!
//! Exposes two tools over a stdio MCP session: `describe_instance` and
//! `get_security_groups`. Each invocation shells out to the AWS CLI,
//! normalizes the nested vendor response into a flat summary, and returns it
//! as a single pretty-printed text block.

pub mod config;
pub mod normalize;
pub mod schemas;
pub mod server;
