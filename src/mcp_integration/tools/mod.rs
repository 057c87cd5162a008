//! MCP tool schema definitions
//!
//! JSON schema definitions returned from `tools/list`, organized by
//! functional area:
//! - [`user_schemas`] - user CRUD and listing
//! - [`role_schemas`] - admin group membership
//! - [`system_schemas`] - connectivity and server metadata
//!
//! Optional string parameters default to `""`, which the handlers treat the
//! same as an absent value.

pub mod role_schemas;
pub mod system_schemas;
pub mod user_schemas;

pub use role_schemas::*;
pub use system_schemas::*;
pub use user_schemas::*;
