//! Typed intermediate tree
//!
//! The serializer first lowers an [`Expr`](crate::Expr) into this tagged
//! form, then renders it to text. The tree serializes to JSON as
//! `{ "type": ..., "kind": ..., "value": ..., "children": [...] }` so it can be
//! inspected or fed back into the renderer.

use crate::ast::ResultType;
use serde::{Deserialize, Serialize, Serializer};

/// Tag of a typed tree entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    Constant,
    Function,
    Value,
    /// Any tag not produced by the serializer (only reachable through deserialization)
    #[serde(other)]
    Unknown,
}

/// Largest integer an `f64` holds exactly (2^53)
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Scalar payload of a typed tree entry.
///
/// Whole numbers serialize as JSON integers (`3`, not `3.0`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum TreeValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl TreeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TreeValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Serialize for TreeValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeValue::Bool(b) => serializer.serialize_bool(*b),
            TreeValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_EXACT_INTEGER => {
                serializer.serialize_i64(*n as i64)
            }
            TreeValue::Number(n) => serializer.serialize_f64(*n),
            TreeValue::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// One entry of the typed intermediate tree.
///
/// - `constant`: `value` is the constant name, no children
/// - `function`: `value` is the function name, `children` holds the arguments in order
/// - `value`: `value` is the literal scalar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedTree {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<ResultType>,
    pub kind: TreeKind,
    pub value: TreeValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TypedTree>>,
}

impl TypedTree {
    pub fn constant<S: Into<String>>(result_type: Option<ResultType>, name: S) -> Self {
        Self {
            result_type,
            kind: TreeKind::Constant,
            value: TreeValue::Text(name.into()),
            children: None,
        }
    }

    pub fn function<S: Into<String>>(
        result_type: Option<ResultType>,
        name: S,
        children: Vec<TypedTree>,
    ) -> Self {
        Self {
            result_type,
            kind: TreeKind::Function,
            value: TreeValue::Text(name.into()),
            children: Some(children),
        }
    }

    pub fn value(result_type: ResultType, value: TreeValue) -> Self {
        Self {
            result_type: Some(result_type),
            kind: TreeKind::Value,
            value,
            children: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_tree_json_shape() {
        let tree = TypedTree::function(
            Some(ResultType::Number),
            "prop",
            vec![TypedTree::value(
                ResultType::Text,
                TreeValue::Text("name".into()),
            )],
        );

        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({
                "type": "Number",
                "kind": "function",
                "value": "prop",
                "children": [{ "type": "Text", "kind": "value", "value": "name" }],
            })
        );
    }

    #[test]
    fn test_untyped_constant_omits_type() {
        let tree = TypedTree::constant(None, "pi");
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({ "kind": "constant", "value": "pi" })
        );
    }

    #[test]
    fn test_deserialize_scalars() {
        let tree: TypedTree =
            serde_json::from_value(json!({ "type": "Checkbox", "kind": "value", "value": true }))
                .unwrap();
        assert_eq!(tree.value, TreeValue::Bool(true));

        let tree: TypedTree =
            serde_json::from_value(json!({ "type": "Number", "kind": "value", "value": 3 }))
                .unwrap();
        assert_eq!(tree.value, TreeValue::Number(3.0));
    }

    #[test]
    fn test_number_json() {
        let number = |n: f64| {
            serde_json::to_string(&TypedTree::value(ResultType::Number, TreeValue::Number(n)))
                .unwrap()
        };

        assert_eq!(number(3.0), r#"{"type":"Number","kind":"value","value":3}"#);
        assert_eq!(number(-0.0), r#"{"type":"Number","kind":"value","value":0}"#);
        assert_eq!(number(2.5), r#"{"type":"Number","kind":"value","value":2.5}"#);
        assert_eq!(
            number(1_688_994_240_000.0),
            r#"{"type":"Number","kind":"value","value":1688994240000}"#
        );
        assert_eq!(number(1e300), r#"{"type":"Number","kind":"value","value":1e300}"#);
    }

    #[test]
    fn test_as_text() {
        assert_eq!(TreeValue::Text("pi".into()).as_text(), Some("pi"));
        assert_eq!(TreeValue::Number(1.0).as_text(), None);
        assert_eq!(TreeValue::Bool(true).as_text(), None);
    }

    #[test]
    fn test_unknown_kind_is_preserved() {
        let tree: TypedTree =
            serde_json::from_value(json!({ "kind": "lambda", "value": "x" })).unwrap();
        assert_eq!(tree.kind, TreeKind::Unknown);
    }
}
