//! Decoding and encoding between member lists and filter trees.

use super::wire::{Envelope, Expression, FieldValue, Filter, FilterTree, Pool};
use super::{EQUALS_OPERATOR, GROUP_TYPE, MEMBER_FIELD};
use crate::membership::{GroupId, MemberId, MemberList};
use log::warn;
use serde_json::{Map, Value};
use std::fmt;

/// The four nesting levels below the tree root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreeLevel {
    Pool,
    Filter,
    Expression,
    Value,
}

impl TreeLevel {
    /// Field on the parent object that holds this level.
    pub fn field(self) -> &'static str {
        match self {
            TreeLevel::Pool => "dgIncludePools",
            TreeLevel::Filter => "filters",
            TreeLevel::Expression => "expressions",
            TreeLevel::Value => "values",
        }
    }
}

impl fmt::Display for TreeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

/// A filter tree whose shape is outside the tolerated variance.
///
/// The reconciler treats these as "no members known" rather than failing the
/// attempt, so the variants exist mainly for the log line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("filter tree root must be an object, got {found}")]
    RootNotObject { found: &'static str },

    #[error("envelope at '{level}' has non-array results ({found})")]
    MalformedEnvelope { level: TreeLevel, found: &'static str },

    #[error("unexpected {found} at '{level}'")]
    UnexpectedShape { level: TreeLevel, found: &'static str },
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Flatten one tree level into an ordered list of nodes.
///
/// | input                      | output          |
/// |----------------------------|-----------------|
/// | absent / `null`            | `[]`            |
/// | `{"results": [a, b]}`      | `[a, b]`        |
/// | `[a, b]`                   | `[a, b]`        |
/// | `{...}` (no `results` key) | `[{...}]`       |
///
/// Anything else is a [`DecodeError`].
pub fn normalize_to_list(
    node: Option<&Value>,
    level: TreeLevel,
) -> Result<Vec<&Value>, DecodeError> {
    match node {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => Ok(items.iter().collect()),
        Some(object @ Value::Object(map)) => match map.get("results") {
            None => Ok(vec![object]),
            Some(Value::Array(items)) => Ok(items.iter().collect()),
            Some(other) => Err(DecodeError::MalformedEnvelope {
                level,
                found: json_kind(other),
            }),
        },
        Some(other) => Err(DecodeError::UnexpectedShape {
            level,
            found: json_kind(other),
        }),
    }
}

fn children<'a>(
    parent: &'a Map<String, Value>,
    level: TreeLevel,
) -> Result<Vec<&'a Map<String, Value>>, DecodeError> {
    normalize_to_list(parent.get(level.field()), level)?
        .into_iter()
        .map(|node| {
            node.as_object().ok_or(DecodeError::UnexpectedShape {
                level,
                found: json_kind(node),
            })
        })
        .collect()
}

/// Member carried by one leaf.
///
/// Numbers are kept in their decimal form. Empty strings and other scalars
/// match nobody, so the leaf is skipped without touching its siblings.
fn field_value(value: &Map<String, Value>) -> Option<MemberId> {
    let raw = match value.get("fieldValue")? {
        Value::Null => return None,
        Value::String(raw) => raw.clone(),
        Value::Number(number) => number.to_string(),
        other => {
            warn!("Skipping filter value with {} fieldValue", json_kind(other));
            return None;
        }
    };
    match MemberId::new(raw) {
        Ok(member) => Some(member),
        Err(e) => {
            warn!("Skipping unusable filter value: {}", e);
            None
        }
    }
}

/// Read the effective membership of a filter tree.
///
/// Leaves are collected in document order and deduplicated by first occurrence.
/// Branches with missing fields contribute nothing, and so do leaves whose
/// `fieldValue` is empty or not a scalar. Only structural problems are errors.
///
/// ```rust
/// use sf_provisioning::filter_tree::decode;
/// use serde_json::json;
///
/// let tree = json!({
///     "dgIncludePools": {"results": [
///         {"filters": {"expressions": {"values": {"fieldValue": "alice"}}}},
///         {"filters": {"results": [{"expressions": {"results": [
///             {"values": {"results": [{"fieldValue": "bob"}, {"fieldValue": "alice"}]}}
///         ]}}]}}
///     ]}
/// });
/// let members = decode(&tree).unwrap();
/// assert_eq!(members.to_strings(), vec!["alice", "bob"]);
/// ```
pub fn decode(tree: &Value) -> Result<MemberList, DecodeError> {
    let root = tree.as_object().ok_or(DecodeError::RootNotObject {
        found: json_kind(tree),
    })?;

    let mut members = MemberList::new();
    for pool in children(root, TreeLevel::Pool)? {
        for filter in children(pool, TreeLevel::Filter)? {
            for expression in children(filter, TreeLevel::Expression)? {
                for value in children(expression, TreeLevel::Value)? {
                    if let Some(member) = field_value(value) {
                        members.push(member);
                    }
                }
            }
        }
    }
    Ok(members)
}

/// Build the filter tree for `members`, one pool per member in list order.
///
/// An empty list produces a tree with no pools.
pub fn encode(group_id: &GroupId, group_name: &str, members: &MemberList) -> FilterTree {
    let pools = members
        .iter()
        .map(|member| Pool {
            filters: Envelope::single(Filter {
                name: MEMBER_FIELD.to_string(),
                expressions: Envelope::single(Expression {
                    operator: EQUALS_OPERATOR.to_string(),
                    values: Envelope::single(FieldValue {
                        field_value: member.as_str().to_string(),
                    }),
                }),
            }),
        })
        .collect();

    FilterTree {
        group_id: group_id.as_str().to_string(),
        group_name: group_name.to_string(),
        group_type: GROUP_TYPE.to_string(),
        dg_include_pools: Envelope::new(pools),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn members(values: &[&str]) -> MemberList {
        values.iter().map(|v| MemberId::new(*v).unwrap()).collect()
    }

    fn wrap(node: Value, enveloped: bool) -> Value {
        if enveloped {
            json!({ "results": [node] })
        } else {
            node
        }
    }

    /// One member, with each of the four levels wrapped according to `mask`.
    fn tree_with_mask(mask: u8, member: &str) -> Value {
        let value = wrap(json!({ "fieldValue": member }), mask & 0b0001 != 0);
        let expression = wrap(
            json!({ "operator": "equals", "values": value }),
            mask & 0b0010 != 0,
        );
        let filter = wrap(
            json!({ "name": "username", "expressions": expression }),
            mask & 0b0100 != 0,
        );
        let pool = wrap(json!({ "filters": filter }), mask & 0b1000 != 0);
        json!({ "groupID": "12", "groupName": "Admins", "dgIncludePools": pool })
    }

    #[test]
    fn test_all_sixteen_wrapping_combinations_decode_identically() {
        for mask in 0u8..16 {
            let decoded = decode(&tree_with_mask(mask, "alice"))
                .unwrap_or_else(|e| panic!("mask {mask:04b} failed: {e}"));
            assert_eq!(decoded.to_strings(), vec!["alice"], "mask {mask:04b}");
        }
    }

    #[test]
    fn test_mixed_shapes_across_siblings() {
        let tree = json!({
            "dgIncludePools": { "results": [
                { "filters": { "expressions": { "values": { "fieldValue": "alice" } } } },
                { "filters": { "results": [
                    { "expressions": { "results": [
                        { "values": { "results": [
                            { "fieldValue": "bob" },
                            { "fieldValue": "carol" }
                        ] } }
                    ] } }
                ] } },
                { "filters": [ { "expressions": [ { "values": [ { "fieldValue": "dave" } ] } ] } ] }
            ] }
        });

        assert_eq!(
            decode(&tree).unwrap().to_strings(),
            vec!["alice", "bob", "carol", "dave"]
        );
    }

    #[test]
    fn test_duplicates_collapse_by_first_occurrence() {
        let tree = json!({
            "dgIncludePools": [
                { "filters": { "expressions": { "values": [
                    { "fieldValue": "bob" }, { "fieldValue": "alice" }
                ] } } },
                { "filters": { "expressions": { "values": { "fieldValue": "bob" } } } }
            ]
        });
        assert_eq!(decode(&tree).unwrap().to_strings(), vec!["bob", "alice"]);
    }

    #[test]
    fn test_missing_fields_contribute_nothing() {
        let tree = json!({
            "groupID": "12",
            "dgIncludePools": { "results": [
                {},
                { "filters": null },
                { "filters": { "expressions": { "results": [] } } },
                { "filters": { "expressions": { "values": { "results": [ {} ] } } } },
                { "filters": { "expressions": { "values": { "fieldValue": "erin" } } } }
            ] }
        });
        assert_eq!(decode(&tree).unwrap().to_strings(), vec!["erin"]);

        let no_pools = json!({ "groupID": "12", "groupName": "Admins" });
        assert!(decode(&no_pools).unwrap().is_empty());
    }

    #[test]
    fn test_normalize_to_list_shapes() {
        let object = json!({ "a": 1 });
        assert_eq!(
            normalize_to_list(Some(&object), TreeLevel::Pool).unwrap(),
            vec![&object]
        );

        let envelope = json!({ "results": [1, 2] });
        assert_eq!(
            normalize_to_list(Some(&envelope), TreeLevel::Pool).unwrap(),
            vec![&json!(1), &json!(2)]
        );

        assert!(normalize_to_list(None, TreeLevel::Pool).unwrap().is_empty());
        assert!(
            normalize_to_list(Some(&Value::Null), TreeLevel::Pool)
                .unwrap()
                .is_empty()
        );
    }

    #[test]
    fn test_malformed_shapes_are_errors() {
        assert_eq!(
            decode(&json!(["not", "an", "object"])),
            Err(DecodeError::RootNotObject { found: "array" })
        );

        let bad_envelope = json!({ "dgIncludePools": { "results": "nope" } });
        assert_eq!(
            decode(&bad_envelope),
            Err(DecodeError::MalformedEnvelope {
                level: TreeLevel::Pool,
                found: "string"
            })
        );

        let scalar_filter = json!({ "dgIncludePools": { "filters": 42 } });
        assert_eq!(
            decode(&scalar_filter),
            Err(DecodeError::UnexpectedShape {
                level: TreeLevel::Filter,
                found: "number"
            })
        );
    }

    #[test]
    fn test_unusable_leaves_are_skipped_locally() {
        let tree = json!({
            "dgIncludePools": [
                { "filters": { "expressions": { "values": { "fieldValue": "alice" } } } },
                { "filters": { "expressions": { "values": { "fieldValue": "" } } } },
                { "filters": { "expressions": { "values": { "fieldValue": true } } } },
                { "filters": { "expressions": { "values": [
                    { "fieldValue": { "nested": "x" } },
                    { "fieldValue": "bob" }
                ] } } }
            ]
        });
        assert_eq!(decode(&tree).unwrap().to_strings(), vec!["alice", "bob"]);
    }

    #[test]
    fn test_numeric_field_values_are_kept() {
        let tree = json!({
            "dgIncludePools": { "filters": { "expressions": { "values": [
                { "fieldValue": 7 },
                { "fieldValue": "carol" }
            ] } } }
        });
        assert_eq!(decode(&tree).unwrap().to_strings(), vec!["7", "carol"]);
    }

    #[test]
    fn test_encode_empty_list_has_no_pools() {
        let group_id = GroupId::new("12").unwrap();
        let tree = encode(&group_id, "Admins", &MemberList::new());
        assert_eq!(tree.pool_count(), 0);

        let value = tree.to_value().unwrap();
        assert_eq!(value["dgIncludePools"], json!({ "results": [] }));
        assert!(decode(&value).unwrap().is_empty());
    }

    #[test]
    fn test_encode_wire_shape() {
        let group_id = GroupId::new("12").unwrap();
        let tree = encode(&group_id, "Admins", &members(&["alice"]));

        assert_eq!(
            tree.to_value().unwrap(),
            json!({
                "groupID": "12",
                "groupName": "Admins",
                "groupType": "permission",
                "dgIncludePools": { "results": [
                    { "filters": { "results": [
                        { "name": "username", "expressions": { "results": [
                            { "operator": "equals", "values": { "results": [
                                { "fieldValue": "alice" }
                            ] } }
                        ] } }
                    ] } }
                ] }
            })
        );
    }

    #[test]
    fn test_encode_one_pool_per_member_in_order() {
        let group_id = GroupId::new("12").unwrap();
        let list = members(&["zed", "amy", "bob"]);
        let tree = encode(&group_id, "Admins", &list);

        assert_eq!(tree.pool_count(), 3);
        assert_eq!(decode(&tree.to_value().unwrap()).unwrap(), list);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let group_id = GroupId::new("12").unwrap();
        let list = members(&["alice", "bob"]);
        assert_eq!(
            encode(&group_id, "Admins", &list),
            encode(&group_id, "Admins", &list)
        );
    }
}
