//! MemberId value object for group membership tokens.
//!
//! A member identifier is the username-equivalent key carried in a filter-tree
//! leaf. It is opaque: no trimming, case folding or other normalization is
//! applied, so `"Alice"` and `"alice"` are different members.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated group member identifier.
///
/// ## Validation Rules
///
/// - Must not be empty
///
/// ## Examples
///
/// ```rust
/// use sf_provisioning::membership::MemberId;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let member = MemberId::new("alice")?;
///     assert_eq!(member.as_str(), "alice");
///
///     // Exact match only
///     assert_ne!(member, MemberId::new("Alice")?);
///     assert!(MemberId::new("").is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MemberId(String);

impl MemberId {
    /// Create a new MemberId with validation.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::EmptyMemberId);
        }
        Ok(Self(value))
    }

    /// Get the string representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the identifier and return the owned string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for MemberId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MemberId {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for MemberId {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl Serialize for MemberId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for MemberId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_member_id() {
        let member = MemberId::new("BobTEST0003").unwrap();
        assert_eq!(member.as_str(), "BobTEST0003");
        assert_eq!(member.to_string(), "BobTEST0003");
    }

    #[test]
    fn test_empty_member_id_rejected() {
        assert_eq!(MemberId::new(""), Err(ValidationError::EmptyMemberId));
    }

    #[test]
    fn test_no_normalization() {
        let padded = MemberId::new(" alice ").unwrap();
        assert_eq!(padded.as_str(), " alice ");
        assert_ne!(padded, MemberId::new("alice").unwrap());
        assert_ne!(
            MemberId::new("ALICE").unwrap(),
            MemberId::new("alice").unwrap()
        );
    }

    #[test]
    fn test_serde_round_trip() {
        let member = MemberId::new("carol").unwrap();
        let value = serde_json::to_value(&member).unwrap();
        assert_eq!(value, json!("carol"));

        let back: MemberId = serde_json::from_value(value).unwrap();
        assert_eq!(back, member);

        let invalid: Result<MemberId, _> = serde_json::from_value(json!(""));
        assert!(invalid.is_err());
    }
}
