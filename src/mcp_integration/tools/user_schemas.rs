//! User tool schema definitions for MCP integration
//!
//! **CRUD Operations**:
//! - [`create_user_tool`] - user creation with locale and time zone defaults
//! - [`get_user_tool`] - user retrieval by ID
//! - [`update_user_tool`] - partial update of profile fields
//!
//! **Query Operations**:
//! - [`list_users_tool`] - paged listing with an optional OData filter

use crate::users::{DEFAULT_LOCALE, DEFAULT_PAGE_SIZE, DEFAULT_TIMEZONE};
use serde_json::{Value, json};

/// Properties shared by the tools that create a user.
pub(crate) fn new_user_properties() -> Value {
    json!({
        "user_id": {
            "type": "string",
            "description": "Unique user ID"
        },
        "username": {
            "type": "string",
            "description": "Login name"
        },
        "first_name": {
            "type": "string",
            "description": "First name",
            "default": ""
        },
        "last_name": {
            "type": "string",
            "description": "Last name",
            "default": ""
        },
        "email": {
            "type": "string",
            "description": "Email address",
            "default": ""
        },
        "locale": {
            "type": "string",
            "description": "Default locale",
            "default": DEFAULT_LOCALE
        },
        "timezone": {
            "type": "string",
            "description": "Time zone",
            "default": DEFAULT_TIMEZONE
        }
    })
}

/// Schema definition for user creation tool
pub fn create_user_tool() -> Value {
    json!({
        "name": "create_user",
        "description": "Create a new user in SAP SuccessFactors",
        "inputSchema": {
            "type": "object",
            "properties": new_user_properties(),
            "required": ["user_id", "username"]
        }
    })
}

/// Schema definition for user retrieval tool
pub fn get_user_tool() -> Value {
    json!({
        "name": "get_user",
        "description": "Get a user by ID",
        "inputSchema": {
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "ID of the user to retrieve"
                }
            },
            "required": ["user_id"]
        }
    })
}

/// Schema definition for user update tool
///
/// Only non-empty fields are sent; a call with no fields is rejected.
pub fn update_user_tool() -> Value {
    json!({
        "name": "update_user",
        "description": "Update profile fields of an existing user",
        "inputSchema": {
            "type": "object",
            "properties": {
                "user_id": {
                    "type": "string",
                    "description": "ID of the user to update"
                },
                "first_name": { "type": "string", "default": "" },
                "last_name": { "type": "string", "default": "" },
                "email": { "type": "string", "default": "" },
                "locale": { "type": "string", "default": "" },
                "timezone": { "type": "string", "default": "" }
            },
            "required": ["user_id"]
        }
    })
}

/// Schema definition for user listing tool
pub fn list_users_tool() -> Value {
    json!({
        "name": "list_users",
        "description": "List users with paging and an optional OData $filter expression",
        "inputSchema": {
            "type": "object",
            "properties": {
                "top": {
                    "type": "integer",
                    "description": "Maximum number of users to return",
                    "minimum": 1,
                    "default": DEFAULT_PAGE_SIZE
                },
                "skip": {
                    "type": "integer",
                    "description": "Number of users to skip",
                    "minimum": 0,
                    "default": 0
                },
                "filter_query": {
                    "type": "string",
                    "description": "OData $filter expression, e.g. \"status eq 'active'\"",
                    "default": ""
                }
            }
        }
    })
}
