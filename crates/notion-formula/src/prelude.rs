//! Prelude module - common imports for notion-formula users
//!
//! ```rust
//! use notion_formula::prelude::*;
//! ```

pub use crate::{
    // Entry points
    build,
    build_with,
    formula_props,
    // Serializer
    Builder,
    BuilderSettings,
    Conditional,
    DateUnit,
    DateValue,
    Expr,
    // Catalog
    Formula,
    FormulaBuild,
    // Error types
    FormulaError,
    FormulaProps,
    FormulaResult,
    // Expression types
    Node,
    ResultType,
    TreeKind,
    TypedTree,
};
