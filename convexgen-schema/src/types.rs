//! Validator type definitions.
//!
//! This module contains the recursive type tree describing the arguments and
//! return values of Convex functions, as reported by `function-spec`.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// One node of a validator type tree.
///
/// The JSON form is discriminated by a `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeNode {
    /// Document id of a table.
    Id {
        /// Table the id points into.
        #[serde(rename = "tableName")]
        table_name: String,
    },
    /// The `null` value.
    Null,
    /// 64-bit integer.
    #[serde(rename = "bigint")]
    Int64,
    /// 64-bit float.
    #[serde(rename = "number")]
    Float64,
    /// Boolean.
    #[serde(rename = "boolean")]
    Bool,
    /// UTF-8 string.
    String,
    /// Byte array.
    Bytes,
    /// Homogeneous array.
    Array {
        /// Element type.
        value: Box<TypeNode>,
    },
    /// Object with named fields, in declaration order.
    Object {
        /// Field map.
        value: IndexMap<String, ObjectField>,
    },
    /// String-keyed map.
    Record {
        /// Key type (a string or id).
        keys: Box<TypeNode>,
        /// Value field.
        values: Box<ObjectField>,
    },
    /// Union of member types, in declaration order.
    Union {
        /// Members.
        value: Vec<TypeNode>,
    },
    /// A single constant value.
    Literal {
        /// Literal value; non-string literals keep their JSON text.
        #[serde(deserialize_with = "literal_text")]
        value: String,
    },
    /// Any value.
    Any,
}

/// A field of an object or the value of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectField {
    /// Field type.
    #[serde(rename = "fieldType")]
    pub field_type: TypeNode,
    /// Whether the field may be omitted.
    #[serde(default)]
    pub optional: bool,
}

impl ObjectField {
    /// Creates a required field.
    #[must_use]
    pub const fn required(field_type: TypeNode) -> Self {
        Self {
            field_type,
            optional: false,
        }
    }

    /// Creates an optional field.
    #[must_use]
    pub const fn optional(field_type: TypeNode) -> Self {
        Self {
            field_type,
            optional: true,
        }
    }
}

impl TypeNode {
    /// Creates an id node.
    #[must_use]
    pub fn id(table_name: impl Into<String>) -> Self {
        Self::Id {
            table_name: table_name.into(),
        }
    }

    /// Creates an array node.
    #[must_use]
    pub fn array(element: TypeNode) -> Self {
        Self::Array {
            value: Box::new(element),
        }
    }

    /// Creates an object node from `(name, field)` pairs, keeping their order.
    #[must_use]
    pub fn object<K: Into<String>>(fields: impl IntoIterator<Item = (K, ObjectField)>) -> Self {
        Self::Object {
            value: fields.into_iter().map(|(k, f)| (k.into(), f)).collect(),
        }
    }

    /// Creates a record node with string keys.
    #[must_use]
    pub fn record(values: ObjectField) -> Self {
        Self::Record {
            keys: Box::new(Self::String),
            values: Box::new(values),
        }
    }

    /// Creates a union node.
    #[must_use]
    pub fn union(members: impl IntoIterator<Item = TypeNode>) -> Self {
        Self::Union {
            value: members.into_iter().collect(),
        }
    }

    /// Creates a literal node.
    #[must_use]
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
        }
    }

    /// Returns true if this is the `null` type.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if this is an object type.
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Self::Object { .. })
    }

    /// Returns the literal value if this is a literal type.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the field map if this is an object type.
    #[must_use]
    pub fn as_object(&self) -> Option<&IndexMap<String, ObjectField>> {
        match self {
            Self::Object { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the schema name of this node's kind.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Id { .. } => "id",
            Self::Null => "null",
            Self::Int64 => "bigint",
            Self::Float64 => "number",
            Self::Bool => "boolean",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Array { .. } => "array",
            Self::Object { .. } => "object",
            Self::Record { .. } => "record",
            Self::Union { .. } => "union",
            Self::Literal { .. } => "literal",
            Self::Any => "any",
        }
    }
}

/// Accepts string literals as-is and keeps other literals as JSON text.
fn literal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => value,
        other => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_leaf_nodes() {
        let cases = [
            (json!({ "type": "null" }), TypeNode::Null),
            (json!({ "type": "bigint" }), TypeNode::Int64),
            (json!({ "type": "number" }), TypeNode::Float64),
            (json!({ "type": "boolean" }), TypeNode::Bool),
            (json!({ "type": "string" }), TypeNode::String),
            (json!({ "type": "bytes" }), TypeNode::Bytes),
            (json!({ "type": "any" }), TypeNode::Any),
            (
                json!({ "type": "id", "tableName": "users" }),
                TypeNode::id("users"),
            ),
        ];

        for (input, expected) in cases {
            let node: TypeNode = serde_json::from_value(input).expect("Failed to parse");
            assert_eq!(node, expected);
        }
    }

    #[test]
    fn test_object_preserves_field_order() {
        let node: TypeNode = serde_json::from_value(json!({
            "type": "object",
            "value": {
                "zeta": { "fieldType": { "type": "string" }, "optional": false },
                "alpha": { "fieldType": { "type": "number" }, "optional": true }
            }
        }))
        .expect("Failed to parse");

        let fields = node.as_object().expect("object");
        let names: Vec<&str> = fields.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert!(fields["alpha"].optional);
    }

    #[test]
    fn test_nested_nodes() {
        let node: TypeNode = serde_json::from_value(json!({
            "type": "record",
            "keys": { "type": "string" },
            "values": {
                "fieldType": {
                    "type": "array",
                    "value": {
                        "type": "union",
                        "value": [{ "type": "literal", "value": "a" }, { "type": "null" }]
                    }
                },
                "optional": false
            }
        }))
        .expect("Failed to parse");

        assert_eq!(
            node,
            TypeNode::record(ObjectField::required(TypeNode::array(TypeNode::union([
                TypeNode::literal("a"),
                TypeNode::Null,
            ]))))
        );
    }

    #[test]
    fn test_non_string_literals_keep_json_text() {
        let number: TypeNode =
            serde_json::from_value(json!({ "type": "literal", "value": 3 })).expect("Failed to parse");
        assert_eq!(number.as_literal(), Some("3"));

        let flag: TypeNode = serde_json::from_value(json!({ "type": "literal", "value": true }))
            .expect("Failed to parse");
        assert_eq!(flag.as_literal(), Some("true"));
    }

    #[test]
    fn test_unknown_type_is_rejected() {
        let result: Result<TypeNode, _> = serde_json::from_value(json!({ "type": "tuple" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(TypeNode::Int64.kind_name(), "bigint");
        assert_eq!(TypeNode::union([]).kind_name(), "union");
    }
}
