//! Formula serializer
//!
//! Converts an [`Expr`] into a [`TypedTree`] and renders that tree into
//! formula text such as `add(prop("count"),10)`.
//!
//! # Example
//!
//! ```rust
//! use notion_formula_core::{Builder, Expr, Node, ResultType};
//!
//! let add = Node::function(
//!     ResultType::Number,
//!     "add",
//!     vec![Node::prop("count", Some(ResultType::Number)).into(), Expr::from(10)],
//! );
//!
//! let builder = Builder::new();
//! assert_eq!(builder.to_text(&add.into()).unwrap(), r#"add(prop("count"),10)"#);
//!
//! let single = Builder::with_string_converter(|s| format!("'{s}'"));
//! assert_eq!(single.to_text(&Expr::from("x")).unwrap(), "'x'");
//! ```

use crate::ast::{Expr, Node, NodeKind, ResultType, FROM_TIMESTAMP_FUNCTION};
use crate::error::{FormulaError, FormulaResult};
use crate::tree::{TreeKind, TreeValue, TypedTree};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Turns a string into a quoted, escaped formula literal.
///
/// Implementations must wrap the text in the quotes of the target dialect and
/// escape anything that would end the literal early.
pub type StringConverter = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// Default nesting limit for [`Builder`]
pub const DEFAULT_MAX_DEPTH: usize = 256;

static DEFAULT_CONVERTER: OnceLock<StringConverter> = OnceLock::new();

fn get_default_converter() -> StringConverter {
    DEFAULT_CONVERTER
        .get_or_init(|| Arc::new(default_string_converter))
        .clone()
}

/// JSON string literal encoding: double quotes, backslash escapes for `"`,
/// `\` and control characters, non-ASCII passed through.
pub fn default_string_converter(text: &str) -> String {
    serde_json::Value::String(text.to_owned()).to_string()
}

/// Settings for [`Builder`]
#[derive(Clone)]
pub struct BuilderSettings {
    /// Converter for text literals (default: [`default_string_converter`])
    pub string_converter: Option<StringConverter>,
    /// Maximum nesting depth (default: [`DEFAULT_MAX_DEPTH`])
    pub max_depth: usize,
}

impl Default for BuilderSettings {
    fn default() -> Self {
        Self {
            string_converter: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for BuilderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderSettings")
            .field("custom_string_converter", &self.string_converter.is_some())
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Serializes expressions into formula text.
///
/// A builder holds no mutable state; one instance can be shared between
/// threads and reused for any number of expressions.
#[derive(Clone)]
pub struct Builder {
    string_converter: StringConverter,
    max_depth: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Builder {
    /// Create a builder with the default string converter
    pub fn new() -> Self {
        Self::with_settings(BuilderSettings::default())
    }

    pub fn with_settings(settings: BuilderSettings) -> Self {
        Self {
            string_converter: settings
                .string_converter
                .unwrap_or_else(get_default_converter),
            max_depth: settings.max_depth,
        }
    }

    /// Create a builder with a custom string converter
    pub fn with_string_converter<F>(converter: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::with_settings(BuilderSettings {
            string_converter: Some(Arc::new(converter)),
            ..Default::default()
        })
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Convert an expression into its typed tree.
    ///
    /// Dates are rewritten into `fromTimestamp(<epoch millis>)` here.
    ///
    /// # Errors
    ///
    /// [`FormulaError::InvalidDate`] and [`FormulaError::InvalidNumber`] for
    /// invalid leaves, [`FormulaError::DepthLimitExceeded`] for trees nested
    /// deeper than the configured limit.
    pub fn to_tree(&self, expr: &Expr) -> FormulaResult<TypedTree> {
        self.lower(expr, 0)
    }

    /// Render a typed tree into formula text
    pub fn render(&self, tree: &TypedTree) -> FormulaResult<String> {
        let mut out = String::new();
        self.render_into(tree, 0, &mut out)?;
        Ok(out)
    }

    /// Convert an expression into formula text.
    ///
    /// Same as [`Builder::to_tree`] followed by [`Builder::render`].
    pub fn to_text(&self, expr: &Expr) -> FormulaResult<String> {
        let tree = self.to_tree(expr)?;
        self.render(&tree)
    }

    /// Quote a string with the configured converter
    pub fn convert_string(&self, text: &str) -> String {
        (self.string_converter)(text)
    }

    fn check_depth(&self, depth: usize) -> FormulaResult<()> {
        if depth > self.max_depth {
            tracing::debug!(limit = self.max_depth, "expression depth limit exceeded");
            return Err(FormulaError::DepthLimitExceeded {
                limit: self.max_depth,
            });
        }
        Ok(())
    }

    fn lower(&self, expr: &Expr, depth: usize) -> FormulaResult<TypedTree> {
        self.check_depth(depth)?;

        match expr {
            Expr::Node(node) => self.lower_node(node, depth),
            Expr::Date(date) => {
                let millis = date.timestamp_millis().ok_or(FormulaError::InvalidDate)?;
                tracing::trace!(millis, "rewriting date as fromTimestamp call");
                let node = Node::function(
                    ResultType::Date,
                    FROM_TIMESTAMP_FUNCTION,
                    vec![Expr::Number(millis as f64)],
                );
                self.lower_node(&node, depth)
            }
            Expr::Number(n) => {
                if n.is_nan() {
                    return Err(FormulaError::InvalidNumber);
                }
                Ok(TypedTree::value(ResultType::Number, TreeValue::Number(*n)))
            }
            Expr::Bool(b) => Ok(TypedTree::value(ResultType::Checkbox, TreeValue::Bool(*b))),
            Expr::Text(s) => Ok(TypedTree::value(
                ResultType::Text,
                TreeValue::Text(s.clone()),
            )),
        }
    }

    fn lower_node(&self, node: &Node, depth: usize) -> FormulaResult<TypedTree> {
        match node.kind() {
            NodeKind::Constant => Ok(TypedTree::constant(node.result_type(), node.name())),
            NodeKind::Function(children) => {
                let children = children
                    .iter()
                    .map(|child| self.lower(child, depth + 1))
                    .collect::<FormulaResult<Vec<_>>>()?;
                Ok(TypedTree::function(
                    node.result_type(),
                    node.name(),
                    children,
                ))
            }
        }
    }

    fn render_into(&self, tree: &TypedTree, depth: usize, out: &mut String) -> FormulaResult<()> {
        self.check_depth(depth)?;

        match (tree.kind, &tree.value) {
            (TreeKind::Function, TreeValue::Text(name)) => {
                let children = tree
                    .children
                    .as_ref()
                    .ok_or(FormulaError::UnreachableInvalidKind)?;
                out.push_str(name);
                out.push('(');
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.render_into(child, depth + 1, out)?;
                }
                out.push(')');
            }
            (TreeKind::Constant, TreeValue::Text(name)) => out.push_str(name),
            (TreeKind::Value, TreeValue::Text(s)) => out.push_str(&self.convert_string(s)),
            (TreeKind::Value, TreeValue::Number(n)) => out.push_str(&format_number(*n)),
            (TreeKind::Value, TreeValue::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
            _ => return Err(FormulaError::UnreachableInvalidKind),
        }
        Ok(())
    }
}

/// Plain decimal text for a number (`3`, `0.5`, `-12.25`)
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // covers -0
        "0".to_string()
    } else if n == f64::INFINITY {
        "Infinity".to_string()
    } else if n == f64::NEG_INFINITY {
        "-Infinity".to_string()
    } else {
        n.to_string()
    }
}
