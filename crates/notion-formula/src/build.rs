//! Formula entry point
//!
//! [`build`] pairs a [`Formula`] catalog with a [`Builder`] and always
//! returns text: either the formula or the message of whatever went wrong.
//!
//! # Example
//!
//! ```rust
//! use notion_formula::{build, formula_props, ResultType};
//!
//! let add = build(Some(formula_props([("number", ResultType::Number)])))
//!     .formula(|f| f.add(f.prop("number"), 3));
//! assert_eq!(add, r#"add(prop("number"),3)"#);
//!
//! let nan = build(None).formula(|f| f.abs(f64::NAN));
//! assert_eq!(nan, "Invalid number! NaN is not supported.");
//! ```

use crate::formula::{Formula, FormulaProps};
use notion_formula_core::{Builder, BuilderSettings, Expr};
use std::fmt::Display;

/// Message used when a failure carries no text
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Start a formula with the given table properties (`None` leaves every
/// property untyped)
pub fn build(props: Option<FormulaProps>) -> FormulaBuild {
    build_with(props, BuilderSettings::default())
}

/// [`build`] with custom serializer settings
pub fn build_with(props: Option<FormulaProps>, settings: BuilderSettings) -> FormulaBuild {
    FormulaBuild {
        formula: Formula::new(props.unwrap_or_default()),
        builder: Builder::with_settings(settings),
    }
}

/// Catalog and serializer ready to produce formula text
#[derive(Debug, Clone)]
pub struct FormulaBuild {
    formula: Formula,
    builder: Builder,
}

impl FormulaBuild {
    pub fn catalog(&self) -> &Formula {
        &self.formula
    }

    pub fn builder(&self) -> &Builder {
        &self.builder
    }

    /// Build formula text from the expression returned by `callback`.
    ///
    /// Serialization errors are returned as their message instead of the formula.
    pub fn formula<F, E>(&self, callback: F) -> String
    where
        F: FnOnce(&Formula) -> E,
        E: Into<Expr>,
    {
        let expr = callback(&self.formula).into();
        match self.builder.to_text(&expr) {
            Ok(text) => text,
            Err(e) => flatten_error(e),
        }
    }

    /// Like [`FormulaBuild::formula`], for callbacks that can fail themselves
    pub fn try_formula<F, E, Err>(&self, callback: F) -> String
    where
        F: FnOnce(&Formula) -> Result<E, Err>,
        E: Into<Expr>,
        Err: Display,
    {
        match callback(&self.formula) {
            Ok(expr) => self.formula(|_| expr),
            Err(e) => flatten_error(e),
        }
    }
}

fn flatten_error(error: impl Display) -> String {
    let message = error.to_string();
    tracing::debug!(%message, "formula build failed");
    if message.is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
