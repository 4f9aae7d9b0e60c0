//! Expression tree types
//!
//! An expression is either a bare reference value (number, text, boolean or
//! date) or a [`Node`]. Nodes are named and typed; a node either stands for a
//! constant (`pi`) or applies a function to an ordered list of child
//! expressions (`add(1,2)`).

use crate::error::{FormulaError, FormulaResult};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the function node that reads a table property
pub const PROP_FUNCTION: &str = "prop";

/// Name of the function node that dates are rewritten into
pub const FROM_TIMESTAMP_FUNCTION: &str = "fromTimestamp";

/// Declared result type of a node or value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultType {
    Date,
    Number,
    Checkbox,
    Text,
}

impl ResultType {
    /// Name used in the typed tree (`"Date"`, `"Number"`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultType::Date => "Date",
            ResultType::Number => "Number",
            ResultType::Checkbox => "Checkbox",
            ResultType::Text => "Text",
        }
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a node is a constant or a function application
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Named constant without arguments (`pi`, `true`)
    Constant,
    /// Function call with ordered arguments, possibly none (`now()`)
    Function(Vec<Expr>),
}

/// Immutable expression tree node
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    result_type: Option<ResultType>,
    name: String,
    kind: NodeKind,
}

impl Node {
    /// Create a node; `Some(children)` makes a function node, `None` a constant.
    ///
    /// The result type is trusted as declared.
    pub fn new<T, S>(result_type: T, name: S, children: Option<Vec<Expr>>) -> Self
    where
        T: Into<Option<ResultType>>,
        S: Into<String>,
    {
        let kind = match children {
            Some(children) => NodeKind::Function(children),
            None => NodeKind::Constant,
        };
        Self {
            result_type: result_type.into(),
            name: name.into(),
            kind,
        }
    }

    /// Create a constant node
    pub fn constant<S: Into<String>>(result_type: ResultType, name: S) -> Self {
        Self::new(result_type, name, None)
    }

    /// Create a function node
    pub fn function<T, S>(result_type: T, name: S, children: Vec<Expr>) -> Self
    where
        T: Into<Option<ResultType>>,
        S: Into<String>,
    {
        Self::new(result_type, name, Some(children))
    }

    /// Create a property reference: `prop("<property>")`.
    ///
    /// `result_type` is `None` when the property type is not known.
    pub fn prop<S: Into<String>>(property: S, result_type: Option<ResultType>) -> Self {
        Self::function(
            result_type,
            PROP_FUNCTION,
            vec![Expr::Text(property.into())],
        )
    }

    pub fn result_type(&self) -> Option<ResultType> {
        self.result_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Arguments of a function node, `None` for constants
    pub fn children(&self) -> Option<&[Expr]> {
        match &self.kind {
            NodeKind::Function(children) => Some(children),
            NodeKind::Constant => None,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.kind, NodeKind::Constant)
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, NodeKind::Function(_))
    }
}

// Deep argument chains are torn down with an explicit stack; the derived
// drop glue would recurse once per nesting level.
impl Drop for Node {
    fn drop(&mut self) {
        let mut stack = match &mut self.kind {
            NodeKind::Function(children) if !children.is_empty() => std::mem::take(children),
            _ => return,
        };
        while let Some(expr) = stack.pop() {
            if let Expr::Node(mut node) = expr {
                if let NodeKind::Function(children) = &mut node.kind {
                    stack.append(children);
                }
            }
        }
    }
}

/// Date reference value.
///
/// Holds no instant when it was built from unparseable text or an
/// out-of-range timestamp; serializing it then fails.
///
/// The representable range is chrono's: roughly years -262144 to 262143,
/// about ±8.2e15 ms around the epoch. Timestamps beyond that (up to the
/// ±8.64e15 ms a Notion date can hold) are invalid here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue(Option<DateTime<Utc>>);

impl DateValue {
    pub fn new(datetime: DateTime<Utc>) -> Self {
        Self(Some(datetime))
    }

    /// A date that holds no instant
    pub fn invalid() -> Self {
        Self(None)
    }

    /// Date from milliseconds since the Unix epoch
    pub fn from_timestamp_millis(millis: i64) -> Self {
        Self(DateTime::from_timestamp_millis(millis))
    }

    /// Parse an RFC 3339 timestamp (`2023-07-10T13:04:00Z`)
    pub fn parse(text: &str) -> Self {
        Self(
            DateTime::parse_from_rfc3339(text.trim())
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
        )
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_some()
    }

    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        self.0
    }

    /// Milliseconds since the Unix epoch, if valid
    pub fn timestamp_millis(&self) -> Option<i64> {
        self.0.map(|dt| dt.timestamp_millis())
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateValue {
    fn from(datetime: DateTime<Tz>) -> Self {
        Self::new(datetime.with_timezone(&Utc))
    }
}

/// Anything that can be serialized into formula text
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Constant or function node
    Node(Node),
    /// Date reference value
    Date(DateValue),
    /// Numeric reference value
    Number(f64),
    /// Boolean reference value
    Bool(bool),
    /// Text reference value
    Text(String),
}

impl Expr {
    /// Result type of this expression.
    ///
    /// Nodes report their declared type, which may be unset for
    /// untyped property references.
    pub fn result_type(&self) -> Option<ResultType> {
        match self {
            Expr::Node(node) => node.result_type(),
            Expr::Date(_) => Some(ResultType::Date),
            Expr::Number(_) => Some(ResultType::Number),
            Expr::Bool(_) => Some(ResultType::Checkbox),
            Expr::Text(_) => Some(ResultType::Text),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Expr::Node(node) => Some(node),
            _ => None,
        }
    }

    /// Convert an untyped JSON value into a reference value.
    ///
    /// Only numbers, strings and booleans are accepted.
    pub fn from_json(value: &serde_json::Value) -> FormulaResult<Expr> {
        use serde_json::Value;

        match value {
            Value::Number(n) => n
                .as_f64()
                .map(Expr::Number)
                .ok_or(FormulaError::UnreachableInvalidProperty),
            Value::String(s) => Ok(Expr::Text(s.clone())),
            Value::Bool(b) => Ok(Expr::Bool(*b)),
            Value::Null | Value::Array(_) | Value::Object(_) => {
                Err(FormulaError::UnreachableInvalidProperty)
            }
        }
    }
}

impl From<Node> for Expr {
    fn from(node: Node) -> Self {
        Expr::Node(node)
    }
}

impl From<DateValue> for Expr {
    fn from(date: DateValue) -> Self {
        Expr::Date(date)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Expr {
    fn from(datetime: DateTime<Tz>) -> Self {
        Expr::Date(datetime.into())
    }
}

impl From<f64> for Expr {
    fn from(n: f64) -> Self {
        Expr::Number(n)
    }
}

impl From<f32> for Expr {
    fn from(n: f32) -> Self {
        Expr::Number(n as f64)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        Expr::Number(n as f64)
    }
}

impl From<u32> for Expr {
    fn from(n: u32) -> Self {
        Expr::Number(n as f64)
    }
}

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        Expr::Number(n as f64)
    }
}

impl From<bool> for Expr {
    fn from(b: bool) -> Self {
        Expr::Bool(b)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        Expr::Text(s.to_string())
    }
}

impl From<String> for Expr {
    fn from(s: String) -> Self {
        Expr::Text(s)
    }
}

impl From<&String> for Expr {
    fn from(s: &String) -> Self {
        Expr::Text(s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_node_kind_predicates() {
        let pi = Node::constant(ResultType::Number, "pi");
        assert!(pi.is_constant());
        assert!(!pi.is_function());
        assert_eq!(pi.children(), None);

        let now = Node::function(ResultType::Date, "now", vec![]);
        assert!(now.is_function());
        assert!(!now.is_constant());
        assert_eq!(now.children(), Some(&[][..]));
    }

    #[test]
    fn test_node_new_discriminates_on_children() {
        assert!(Node::new(ResultType::Number, "e", None).is_constant());
        assert!(Node::new(ResultType::Date, "now", Some(vec![])).is_function());
    }

    #[test]
    fn test_prop_node_shape() {
        let node = Node::prop("count", Some(ResultType::Number));
        assert_eq!(node.name(), PROP_FUNCTION);
        assert_eq!(node.result_type(), Some(ResultType::Number));
        assert_eq!(node.children(), Some(&[Expr::Text("count".into())][..]));

        let untyped = Node::prop("other", None);
        assert_eq!(untyped.result_type(), None);
    }

    #[test]
    fn test_expr_conversions() {
        assert_eq!(Expr::from(3), Expr::Number(3.0));
        assert_eq!(Expr::from(2.5), Expr::Number(2.5));
        assert_eq!(Expr::from(true), Expr::Bool(true));
        assert_eq!(Expr::from("text"), Expr::Text("text".into()));
    }

    #[test]
    fn test_expr_result_type() {
        assert_eq!(Expr::from(1).result_type(), Some(ResultType::Number));
        assert_eq!(Expr::from(false).result_type(), Some(ResultType::Checkbox));
        assert_eq!(Expr::from("a").result_type(), Some(ResultType::Text));
        assert_eq!(
            Expr::from(DateValue::from_timestamp_millis(0)).result_type(),
            Some(ResultType::Date)
        );
        assert_eq!(Expr::from(Node::prop("x", None)).result_type(), None);
    }

    #[test]
    fn test_date_value_validity() {
        let date = DateValue::from_timestamp_millis(1_688_994_240_000);
        assert!(date.is_valid());
        assert_eq!(date.timestamp_millis(), Some(1_688_994_240_000));

        assert!(!DateValue::parse("wrong").is_valid());
        assert!(!DateValue::invalid().is_valid());
        assert!(!DateValue::from_timestamp_millis(i64::MAX).is_valid());

        let parsed = DateValue::parse("2023-07-10T13:04:00Z");
        assert_eq!(parsed.timestamp_millis(), Some(1_688_994_240_000));
        assert_eq!(
            parsed.datetime().map(|dt| dt.to_rfc3339()),
            Some("2023-07-10T13:04:00+00:00".to_string())
        );
        assert_eq!(DateValue::invalid().datetime(), None);
    }

    #[test]
    fn test_date_value_range() {
        assert!(DateValue::from_timestamp_millis(8_200_000_000_000_000).is_valid());
        assert!(DateValue::from_timestamp_millis(-8_200_000_000_000_000).is_valid());
        assert!(!DateValue::from_timestamp_millis(8_600_000_000_000_000).is_valid());
        assert!(!DateValue::from_timestamp_millis(-8_600_000_000_000_000).is_valid());
    }

    #[test]
    fn test_expr_as_node() {
        let expr = Expr::from(Node::constant(ResultType::Number, "pi"));
        assert_eq!(expr.as_node().map(Node::name), Some("pi"));
        assert_eq!(Expr::from(1).as_node(), None);
    }

    #[test]
    fn test_deep_node_drop() {
        let mut expr = Expr::from(1);
        for _ in 0..500_000 {
            expr = Node::function(ResultType::Number, "abs", vec![expr]).into();
        }
        drop(expr);

        // siblings alongside nested chains
        let mut wide = Vec::new();
        for i in 0..1_000 {
            let mut chain = Expr::from(i);
            for _ in 0..100 {
                chain = Node::function(ResultType::Number, "abs", vec![chain]).into();
            }
            wide.push(chain);
        }
        drop(Node::function(ResultType::Number, "max", wide));
    }

    #[test]
    fn test_expr_from_json() {
        assert_eq!(Expr::from_json(&json!(3)), Ok(Expr::Number(3.0)));
        assert_eq!(Expr::from_json(&json!("a")), Ok(Expr::Text("a".into())));
        assert_eq!(Expr::from_json(&json!(true)), Ok(Expr::Bool(true)));

        for bad in [json!(null), json!({}), json!([1]), json!({"name": "prop"})] {
            assert_eq!(
                Expr::from_json(&bad),
                Err(FormulaError::UnreachableInvalidProperty)
            );
        }
    }
}
