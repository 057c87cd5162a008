//! Membership value objects.
//!
//! Type-safe wrappers for the identifiers the reconciler works with:
//!
//! - [`MemberId`] - one member token, compared by exact string equality
//! - [`GroupId`] / [`GroupTarget`] - the remote dynamic group being reconciled
//! - [`MemberList`] - ordered, duplicate-free membership sequence
//!
//! All constructors validate their input once; downstream code can rely on the
//! invariants without re-checking.

pub mod group;
pub mod member_id;
pub mod member_list;

pub use group::{GroupId, GroupTarget};
pub use member_id::MemberId;
pub use member_list::MemberList;
