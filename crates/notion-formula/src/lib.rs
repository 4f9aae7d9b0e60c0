//! # notion-formula
//!
//! A Rust library for building Notion formulas from typed expressions.
//!
//! Expressions are assembled with the [`Formula`] catalog (one factory per
//! formula function) and serialized into text that can be pasted into a
//! Notion formula property.
//!
//! ## Features
//!
//! - Typed expression nodes with declared result types
//! - Dates, numbers, booleans and text usable directly as arguments
//! - Configurable string quoting
//! - A typed intermediate tree that serializes to JSON
//!
//! ## Example
//!
//! ```rust
//! use notion_formula::prelude::*;
//!
//! let area = build(None).formula(|f| f.multiply(f.pi(), f.pow(2, 2)));
//! assert_eq!(area, "multiply(pi,pow(2,2))");
//!
//! let f = Formula::new(formula_props([("count", ResultType::Number)]));
//! let tree = Builder::new().to_tree(&f.add(f.prop("count"), 10).into()).unwrap();
//! assert_eq!(tree.kind, TreeKind::Function);
//! ```

pub mod build;
pub mod formula;
pub mod helpers;
pub mod prelude;

pub use build::{build, build_with, FormulaBuild, UNKNOWN_ERROR};
pub use formula::{formula_props, Conditional, DateUnit, Formula, FormulaProps, CATALOG};

// Re-export core types
pub use notion_formula_core::{
    default_string_converter, format_number, Builder, BuilderSettings, DateValue, Expr,
    FormulaError, FormulaResult, Node, NodeKind, ResultType, StringConverter, TreeKind,
    TreeValue, TypedTree, DEFAULT_MAX_DEPTH, FROM_TIMESTAMP_FUNCTION, PROP_FUNCTION,
};
