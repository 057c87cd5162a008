//! Serializable filter-tree payload written by the codec.
//!
//! These types describe the shape we *send*. Reads are not deserialized into
//! them because the service is looser about nesting than a derive can express;
//! see [`super::codec::decode`].

use serde::{Deserialize, Serialize};

/// OData v2 collection envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub results: Vec<T>,
}

impl<T> Envelope<T> {
    pub fn new(results: Vec<T>) -> Self {
        Self { results }
    }

    pub fn single(item: T) -> Self {
        Self {
            results: vec![item],
        }
    }
}

/// Root of a dynamic group's membership definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterTree {
    #[serde(rename = "groupID")]
    pub group_id: String,
    pub group_name: String,
    pub group_type: String,
    pub dg_include_pools: Envelope<Pool>,
}

impl FilterTree {
    /// Number of pools in the tree.
    pub fn pool_count(&self) -> usize {
        self.dg_include_pools.results.len()
    }

    /// Render the tree as the JSON body sent to the service.
    pub fn to_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// People pool: holds the filter selecting one member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub filters: Envelope<Filter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub name: String,
    pub expressions: Envelope<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    pub operator: String,
    pub values: Envelope<FieldValue>,
}

/// Leaf value carrying one member identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValue {
    pub field_value: String,
}
