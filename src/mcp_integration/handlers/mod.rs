//! MCP integration handlers
//!
//! Handlers are organized by functional area. Each one extracts its
//! arguments, calls the provisioning service and renders the result as a
//! [`ToolResult`].

pub mod role_assignment;
pub mod system_info;
pub mod user_crud;
pub mod user_queries;

pub use role_assignment::*;
pub use system_info::*;
pub use user_crud::*;
pub use user_queries::*;

use super::core::ToolResult;
use serde_json::Value;

/// Required, non-blank string argument.
pub(crate) fn required_str<'a>(arguments: &'a Value, name: &str) -> Result<&'a str, ToolResult> {
    match arguments.get(name).and_then(Value::as_str) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ToolResult::invalid_arguments(format!(
            "Missing {name} parameter"
        ))),
    }
}

/// Optional string argument; blank counts as absent.
pub(crate) fn optional_str<'a>(arguments: &'a Value, name: &str) -> Option<&'a str> {
    arguments
        .get(name)
        .and_then(Value::as_str)
        .filter(|value| !value.trim().is_empty())
}

/// Optional non-negative integer argument.
pub(crate) fn optional_u32(arguments: &Value, name: &str, default: u32) -> Result<u32, ToolResult> {
    match arguments.get(name) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                ToolResult::invalid_arguments(format!(
                    "Invalid {name} parameter: expected a non-negative integer"
                ))
            }),
    }
}
