//! Ordered, duplicate-free membership sequence.
//!
//! `MemberList` preserves first-occurrence order: collecting `[a, b, a, c]`
//! yields `[a, b, c]`. Appending only ever adds at the end, so existing members
//! keep their positions across a merge.

use crate::membership::MemberId;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An ordered set of members, deduplicated by first occurrence.
///
/// ```rust
/// use sf_provisioning::membership::{MemberId, MemberList};
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let mut members: MemberList = ["alice", "bob", "alice"]
///         .into_iter()
///         .map(MemberId::new)
///         .collect::<Result<_, _>>()?;
///     assert_eq!(members.len(), 2);
///
///     assert!(members.push(MemberId::new("carol")?));
///     assert!(!members.push(MemberId::new("bob")?));
///     assert_eq!(members.to_strings(), vec!["alice", "bob", "carol"]);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<MemberId>", into = "Vec<MemberId>")]
pub struct MemberList {
    members: Vec<MemberId>,
    #[serde(skip)]
    seen: HashSet<MemberId>,
}

impl MemberList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `member` at the end unless it is already present.
    ///
    /// Returns `true` when the member was added.
    pub fn push(&mut self, member: MemberId) -> bool {
        if self.seen.contains(&member) {
            return false;
        }
        self.seen.insert(member.clone());
        self.members.push(member);
        true
    }

    /// Exact-match membership test.
    pub fn contains(&self, member: &MemberId) -> bool {
        self.seen.contains(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MemberId> {
        self.members.iter()
    }

    pub fn as_slice(&self) -> &[MemberId] {
        &self.members
    }

    /// Members as plain strings, in order.
    pub fn to_strings(&self) -> Vec<String> {
        self.members.iter().map(|m| m.as_str().to_string()).collect()
    }
}

impl From<Vec<MemberId>> for MemberList {
    fn from(members: Vec<MemberId>) -> Self {
        members.into_iter().collect()
    }
}

impl From<MemberList> for Vec<MemberId> {
    fn from(list: MemberList) -> Self {
        list.members
    }
}

impl FromIterator<MemberId> for MemberList {
    fn from_iter<I: IntoIterator<Item = MemberId>>(iter: I) -> Self {
        let mut list = MemberList::new();
        for member in iter {
            list.push(member);
        }
        list
    }
}

impl<'a> IntoIterator for &'a MemberList {
    type Item = &'a MemberId;
    type IntoIter = std::slice::Iter<'a, MemberId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.iter()
    }
}

impl IntoIterator for MemberList {
    type Item = MemberId;
    type IntoIter = std::vec::IntoIter<MemberId>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}
