//! Group identity value objects.
//!
//! Dynamic groups are addressed by a numeric identifier (an OData `Edm.Int64`
//! key, written `DynamicGroup(123L)` on the wire). The display name travels with
//! the identifier for logging and for the replace payload, but it is never used
//! to look a group up.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A validated dynamic-group identifier.
///
/// ```rust
/// use sf_provisioning::membership::GroupId;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let id = GroupId::new("4521")?;
///     assert_eq!(id.odata_key(), "DynamicGroup(4521L)");
///     assert!(GroupId::new("admins").is_err());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupId(String);

impl GroupId {
    /// Create a new GroupId; the value must be a non-empty run of ASCII digits.
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidGroupId { value });
        }
        Ok(Self(value))
    }

    /// Get the string representation of the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Entity key path used to address the group on the OData service.
    pub fn odata_key(&self) -> String {
        format!("DynamicGroup({}L)", self.0)
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for GroupId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}

/// The group a reconciliation attempt acts on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTarget {
    id: GroupId,
    name: String,
}

impl GroupTarget {
    /// Create a new target; the display name must not be empty.
    pub fn new(id: GroupId, name: impl Into<String>) -> ValidationResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyGroupName);
        }
        Ok(Self { id, name })
    }

    pub fn id(&self) -> &GroupId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GroupTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
