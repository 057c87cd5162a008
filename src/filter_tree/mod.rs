//! Filter-tree codec for dynamic-group membership.
//!
//! The remote service stores a group's membership as a declarative filter tree
//! rather than a member list:
//!
//! ```text
//! DynamicGroup
//!   └─ dgIncludePools ─▶ Pool*            (one pool per member when we write)
//!        └─ filters ─▶ Filter             (name = "username")
//!             └─ expressions ─▶ Expression* (operator = "equals")
//!                  └─ values ─▶ Value*    (fieldValue = member id)
//! ```
//!
//! Every level may arrive as a bare object or as an OData envelope
//! (`{"results": [...]}`), independently of the levels around it. Reading goes
//! through [`normalize_to_list`] at each level so that variance is handled in
//! one place; writing always emits the envelope shape.
//!
//! - [`decode`] - filter tree JSON → [`MemberList`](crate::membership::MemberList)
//! - [`encode`] - member list → [`FilterTree`]

pub mod codec;
pub mod wire;

pub use codec::{DecodeError, TreeLevel, decode, encode, normalize_to_list};
pub use wire::{Envelope, Expression, FieldValue, Filter, FilterTree, Pool};

/// Field name every membership filter matches on.
pub const MEMBER_FIELD: &str = "username";

/// Operator used by membership expressions.
pub const EQUALS_OPERATOR: &str = "equals";

/// Group type written with replaced trees.
pub const GROUP_TYPE: &str = "permission";

/// `$expand` path that pulls the whole tree in one request.
pub const EXPAND_PATH: &str = "dgIncludePools/filters/expressions/values";
