//! # notion-formula-core
//!
//! Expression tree and serializer for notion-formula.
//!
//! This crate provides:
//! - The expression model ([`Expr`], [`Node`], [`DateValue`])
//! - The typed intermediate tree ([`TypedTree`])
//! - The serializer that turns expressions into formula text ([`Builder`])
//!
//! ## Example
//!
//! ```rust
//! use notion_formula_core::{Builder, Node, ResultType};
//!
//! let pi = Node::constant(ResultType::Number, "pi");
//! assert_eq!(Builder::new().to_text(&pi.into()).unwrap(), "pi");
//! ```

pub mod ast;
pub mod builder;
pub mod error;
pub mod tree;

pub use ast::{
    DateValue, Expr, Node, NodeKind, ResultType, FROM_TIMESTAMP_FUNCTION, PROP_FUNCTION,
};
pub use builder::{
    default_string_converter, format_number, Builder, BuilderSettings, StringConverter,
    DEFAULT_MAX_DEPTH,
};
pub use error::{FormulaError, FormulaResult};
pub use tree::{TreeKind, TreeValue, TypedTree};
