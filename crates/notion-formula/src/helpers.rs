//! Formula helpers composed from the catalog
//!
//! ```rust
//! use notion_formula::{build, formula_props, helpers, ResultType};
//!
//! let text = build(Some(formula_props([("date", ResultType::Date)])))
//!     .formula(|f| helpers::safe_to_number(f.prop("date")));
//! assert_eq!(text, r#"if(empty(toNumber(prop("date"))),0,toNumber(prop("date")))"#);
//! ```

use crate::formula::{Conditional, Formula};
use notion_formula_core::{Expr, Node};

/// Clamp `number` between two bounds given in either order
pub fn clamp(number: impl Into<Expr>, lower: impl Into<Expr>, upper: impl Into<Expr>) -> Node {
    let f = Formula::default();
    let (number, lower, upper) = (number.into(), lower.into(), upper.into());

    f.if_with(Conditional {
        condition: f.larger(lower.clone(), upper.clone()).into(),
        when_true: f
            .min(f.max(number.clone(), [upper.clone()]), [lower.clone()])
            .into(),
        when_false: f.min(f.max(number, [lower]), [upper]).into(),
    })
}

/// Length of a date range in `unit`
pub fn date_range(date: impl Into<Expr>, unit: impl Into<Expr>) -> Node {
    let f = Formula::default();
    let date = date.into();
    f.date_between(f.end(date.clone()), f.start(date), unit)
}

/// `toNumber` with `0` as fallback when the conversion yields nothing
pub fn safe_to_number(value: impl Into<Expr>) -> Node {
    safe_to_number_or(value, 0)
}

/// `toNumber` with a custom fallback
pub fn safe_to_number_or(value: impl Into<Expr>, fallback: impl Into<Expr>) -> Node {
    let f = Formula::default();
    let number = f.to_number(value);
    f.r#if(f.empty(number.clone()), fallback, number)
}

/// Whether `number` lies between two bounds given in either order
pub fn in_range(number: impl Into<Expr>, lower: impl Into<Expr>, upper: impl Into<Expr>) -> Node {
    let f = Formula::default();
    let (number, lower, upper) = (number.into(), lower.into(), upper.into());

    f.if_with(Conditional {
        condition: f.larger(lower.clone(), upper.clone()).into(),
        when_true: f
            .and(
                f.larger_eq(number.clone(), upper.clone()),
                f.smaller_eq(number.clone(), lower.clone()),
            )
            .into(),
        when_false: f
            .and(f.larger_eq(number.clone(), lower), f.smaller_eq(number, upper))
            .into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formula::DateUnit;
    use notion_formula_core::{Builder, ResultType};
    use pretty_assertions::assert_eq;

    fn text(node: Node) -> String {
        Builder::new().to_text(&node.into()).unwrap()
    }

    #[test]
    fn test_clamp() {
        assert_eq!(
            text(clamp(5, 1, 10)),
            "if(larger(1,10),min(max(5,10),1),min(max(5,1),10))"
        );
        assert_eq!(clamp(5, 1, 10).result_type(), Some(ResultType::Number));
    }

    #[test]
    fn test_date_range() {
        let f = Formula::default();
        assert_eq!(
            text(date_range(f.prop("when"), DateUnit::Days)),
            r#"dateBetween(end(prop("when")),start(prop("when")),"days")"#
        );
    }

    #[test]
    fn test_safe_to_number() {
        assert_eq!(
            text(safe_to_number("12")),
            r#"if(empty(toNumber("12")),0,toNumber("12"))"#
        );
        assert_eq!(
            text(safe_to_number_or("x", -1)),
            r#"if(empty(toNumber("x")),-1,toNumber("x"))"#
        );
    }

    #[test]
    fn test_in_range() {
        assert_eq!(
            text(in_range(5, 1, 10)),
            "if(larger(1,10),and(largerEq(5,10),smallerEq(5,1)),and(largerEq(5,1),smallerEq(5,10)))"
        );
        assert_eq!(in_range(5, 1, 10).result_type(), Some(ResultType::Checkbox));
    }
}
