//! Formula function catalog
//!
//! [`Formula`] has one factory per supported Notion formula function. Each
//! factory returns a [`Node`] whose name is the function's identifier and
//! whose children are the arguments in call order.
//!
//! # Example
//!
//! ```rust
//! use notion_formula::{formula_props, Builder, Formula, ResultType};
//!
//! let f = Formula::new(formula_props([("count", ResultType::Number)]));
//! let add = f.add(f.prop("count"), 10);
//!
//! assert_eq!(add.result_type(), Some(ResultType::Number));
//! assert_eq!(
//!     Builder::new().to_text(&add.into()).unwrap(),
//!     r#"add(prop("count"),10)"#
//! );
//! ```

use ahash::AHashMap;
use notion_formula_core::{Expr, Node, ResultType, FROM_TIMESTAMP_FUNCTION, PROP_FUNCTION};
use std::fmt;

/// Table properties and their result types
pub type FormulaProps = AHashMap<String, ResultType>;

/// Build [`FormulaProps`] from `(name, type)` pairs
pub fn formula_props<I, S>(props: I) -> FormulaProps
where
    I: IntoIterator<Item = (S, ResultType)>,
    S: Into<String>,
{
    props
        .into_iter()
        .map(|(name, ty)| (name.into(), ty))
        .collect()
}

/// Every function and constant identifier the catalog can produce
pub const CATALOG: &[&str] = &[
    // Constants
    "e",
    "pi",
    "true",
    "false",
    // Properties and control flow
    PROP_FUNCTION,
    "if",
    // Operators
    "add",
    "subtract",
    "multiply",
    "divide",
    "pow",
    "mod",
    "unaryMinus",
    "unaryPlus",
    "not",
    "and",
    "or",
    "equal",
    "unequal",
    "larger",
    "largerEq",
    "smaller",
    "smallerEq",
    // Text
    "concat",
    "join",
    "slice",
    "length",
    "format",
    "toNumber",
    "contains",
    "replace",
    "replaceAll",
    "test",
    "empty",
    // Math
    "abs",
    "cbrt",
    "ceil",
    "exp",
    "floor",
    "ln",
    "log10",
    "log2",
    "max",
    "min",
    "round",
    "sign",
    "sqrt",
    // Dates
    "start",
    "end",
    "now",
    "timestamp",
    FROM_TIMESTAMP_FUNCTION,
    "dateAdd",
    "dateSubtract",
    "dateBetween",
    "formatDate",
    "minute",
    "hour",
    "day",
    "date",
    "month",
    "year",
    // Misc
    "id",
];

/// Unit argument for `dateAdd`, `dateSubtract` and `dateBetween`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateUnit {
    Years,
    Quarters,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl DateUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateUnit::Years => "years",
            DateUnit::Quarters => "quarters",
            DateUnit::Months => "months",
            DateUnit::Weeks => "weeks",
            DateUnit::Days => "days",
            DateUnit::Hours => "hours",
            DateUnit::Minutes => "minutes",
            DateUnit::Seconds => "seconds",
            DateUnit::Milliseconds => "milliseconds",
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<DateUnit> for Expr {
    fn from(unit: DateUnit) -> Self {
        Expr::Text(unit.as_str().to_string())
    }
}

/// Arguments of `if` in record form
#[derive(Debug, Clone, PartialEq)]
pub struct Conditional {
    pub condition: Expr,
    pub when_true: Expr,
    pub when_false: Expr,
}

impl Conditional {
    pub fn new(
        condition: impl Into<Expr>,
        when_true: impl Into<Expr>,
        when_false: impl Into<Expr>,
    ) -> Self {
        Self {
            condition: condition.into(),
            when_true: when_true.into(),
            when_false: when_false.into(),
        }
    }
}

fn call<const N: usize>(result_type: ResultType, name: &str, args: [Expr; N]) -> Node {
    Node::function(result_type, name, args.into())
}

fn variadic<I>(result_type: ResultType, name: &str, first: Expr, rest: I) -> Node
where
    I: IntoIterator,
    I::Item: Into<Expr>,
{
    let children = std::iter::once(first)
        .chain(rest.into_iter().map(Into::into))
        .collect();
    Node::function(result_type, name, children)
}

/// Factory catalog for formula nodes.
///
/// The property map only types `prop` references; properties missing from it
/// produce nodes with no result type.
#[derive(Debug, Clone, Default)]
pub struct Formula {
    props: FormulaProps,
}

impl Formula {
    pub fn new(props: FormulaProps) -> Self {
        Self { props }
    }

    pub fn props(&self) -> &FormulaProps {
        &self.props
    }

    /// Value of a table property: `prop("<name>")`
    pub fn prop(&self, name: &str) -> Node {
        Node::prop(name, self.props.get(name).copied())
    }

    // === Constants ===

    /// Base of the natural logarithm
    pub fn e(&self) -> Node {
        Node::constant(ResultType::Number, "e")
    }

    /// Ratio of a circle's circumference to its diameter
    pub fn pi(&self) -> Node {
        Node::constant(ResultType::Number, "pi")
    }

    pub fn r#true(&self) -> Node {
        Node::constant(ResultType::Checkbox, "true")
    }

    pub fn r#false(&self) -> Node {
        Node::constant(ResultType::Checkbox, "false")
    }

    // === Control flow ===

    /// Switch between two values; typed after `when_true`
    pub fn r#if(
        &self,
        condition: impl Into<Expr>,
        when_true: impl Into<Expr>,
        when_false: impl Into<Expr>,
    ) -> Node {
        self.if_with(Conditional::new(condition, when_true, when_false))
    }

    /// Record form of [`Formula::r#if`]
    pub fn if_with(&self, conditional: Conditional) -> Node {
        let Conditional {
            condition,
            when_true,
            when_false,
        } = conditional;
        Node::function(
            when_true.result_type(),
            "if",
            vec![condition, when_true, when_false],
        )
    }

    // === Operators ===

    /// Sum of two numbers, or concatenation when the first argument is not a number
    pub fn add(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        let a = a.into();
        let result_type = match a.result_type() {
            Some(ResultType::Number) => ResultType::Number,
            _ => ResultType::Text,
        };
        call(result_type, "add", [a, b.into()])
    }

    pub fn subtract(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Number, "subtract", [a.into(), b.into()])
    }

    pub fn multiply(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Number, "multiply", [a.into(), b.into()])
    }

    pub fn divide(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Number, "divide", [a.into(), b.into()])
    }

    /// `base` raised to `exponent`
    pub fn pow(&self, base: impl Into<Expr>, exponent: impl Into<Expr>) -> Node {
        call(ResultType::Number, "pow", [base.into(), exponent.into()])
    }

    /// Remainder of `a / b`
    pub fn r#mod(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Number, "mod", [a.into(), b.into()])
    }

    pub fn unary_minus(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "unaryMinus", [a.into()])
    }

    /// Convert a number, checkbox or text into a number
    pub fn unary_plus(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "unaryPlus", [a.into()])
    }

    pub fn not(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "not", [a.into()])
    }

    pub fn and(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "and", [a.into(), b.into()])
    }

    pub fn or(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "or", [a.into(), b.into()])
    }

    pub fn equal(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "equal", [a.into(), b.into()])
    }

    pub fn unequal(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "unequal", [a.into(), b.into()])
    }

    pub fn larger(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "larger", [a.into(), b.into()])
    }

    pub fn larger_eq(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "largerEq", [a.into(), b.into()])
    }

    pub fn smaller(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "smaller", [a.into(), b.into()])
    }

    pub fn smaller_eq(&self, a: impl Into<Expr>, b: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "smallerEq", [a.into(), b.into()])
    }

    // === Text ===

    /// `concat("dog", "go") == "doggo"`
    pub fn concat<I>(&self, first: impl Into<Expr>, rest: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        variadic(ResultType::Text, "concat", first.into(), rest)
    }

    /// Inserts the first argument between the rest: `join("-", "a", "b") == "a-b"`
    pub fn join<I>(&self, separator: impl Into<Expr>, rest: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        variadic(ResultType::Text, "join", separator.into(), rest)
    }

    /// Substring from `start` to the end of the text
    pub fn slice(&self, text: impl Into<Expr>, start: impl Into<Expr>) -> Node {
        call(ResultType::Text, "slice", [text.into(), start.into()])
    }

    /// Substring from `start` (inclusive) to `end` (exclusive)
    pub fn slice_to(
        &self,
        text: impl Into<Expr>,
        start: impl Into<Expr>,
        end: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Text,
            "slice",
            [text.into(), start.into(), end.into()],
        )
    }

    pub fn length(&self, text: impl Into<Expr>) -> Node {
        call(ResultType::Number, "length", [text.into()])
    }

    pub fn format(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Text, "format", [a.into()])
    }

    pub fn to_number(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "toNumber", [a.into()])
    }

    pub fn contains(&self, text: impl Into<Expr>, search: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "contains", [text.into(), search.into()])
    }

    /// Replace the first regex match
    pub fn replace(
        &self,
        value: impl Into<Expr>,
        find: impl Into<Expr>,
        replace_with: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Text,
            "replace",
            [value.into(), find.into(), replace_with.into()],
        )
    }

    /// Replace every regex match
    pub fn replace_all(
        &self,
        value: impl Into<Expr>,
        find: impl Into<Expr>,
        replace_with: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Text,
            "replaceAll",
            [value.into(), find.into(), replace_with.into()],
        )
    }

    /// Whether `value` matches the regex `pattern`
    pub fn test(&self, value: impl Into<Expr>, pattern: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "test", [value.into(), pattern.into()])
    }

    pub fn empty(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Checkbox, "empty", [a.into()])
    }

    // === Math ===

    pub fn abs(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "abs", [a.into()])
    }

    pub fn cbrt(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "cbrt", [a.into()])
    }

    pub fn ceil(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "ceil", [a.into()])
    }

    pub fn exp(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "exp", [a.into()])
    }

    pub fn floor(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "floor", [a.into()])
    }

    pub fn ln(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "ln", [a.into()])
    }

    pub fn log10(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "log10", [a.into()])
    }

    pub fn log2(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "log2", [a.into()])
    }

    pub fn max<I>(&self, first: impl Into<Expr>, rest: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        variadic(ResultType::Number, "max", first.into(), rest)
    }

    pub fn min<I>(&self, first: impl Into<Expr>, rest: I) -> Node
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        variadic(ResultType::Number, "min", first.into(), rest)
    }

    pub fn round(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "round", [a.into()])
    }

    /// `1`, `-1` or `0` depending on the sign of the argument
    pub fn sign(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "sign", [a.into()])
    }

    pub fn sqrt(&self, a: impl Into<Expr>) -> Node {
        call(ResultType::Number, "sqrt", [a.into()])
    }

    // === Dates ===

    /// Start of a date range
    pub fn start(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Date, "start", [date.into()])
    }

    /// End of a date range
    pub fn end(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Date, "end", [date.into()])
    }

    pub fn now(&self) -> Node {
        call(ResultType::Date, "now", [])
    }

    /// Milliseconds since the Unix epoch
    pub fn timestamp(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "timestamp", [date.into()])
    }

    /// Date from milliseconds since the Unix epoch
    pub fn from_timestamp(&self, millis: impl Into<Expr>) -> Node {
        call(ResultType::Date, FROM_TIMESTAMP_FUNCTION, [millis.into()])
    }

    pub fn date_add(
        &self,
        date: impl Into<Expr>,
        amount: impl Into<Expr>,
        unit: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Number,
            "dateAdd",
            [date.into(), amount.into(), unit.into()],
        )
    }

    pub fn date_subtract(
        &self,
        date: impl Into<Expr>,
        amount: impl Into<Expr>,
        unit: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Number,
            "dateSubtract",
            [date.into(), amount.into(), unit.into()],
        )
    }

    /// Time between two dates in `unit`
    pub fn date_between(
        &self,
        a: impl Into<Expr>,
        b: impl Into<Expr>,
        unit: impl Into<Expr>,
    ) -> Node {
        call(
            ResultType::Number,
            "dateBetween",
            [a.into(), b.into(), unit.into()],
        )
    }

    /// Format a date with a Moment format string (`"YYYY/MM/DD, HH:mm"`)
    pub fn format_date(&self, date: impl Into<Expr>, format: impl Into<Expr>) -> Node {
        call(ResultType::Text, "formatDate", [date.into(), format.into()])
    }

    pub fn minute(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "minute", [date.into()])
    }

    pub fn hour(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "hour", [date.into()])
    }

    /// Day of the week, `0` for Sunday
    pub fn day(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "day", [date.into()])
    }

    /// Day of the month
    pub fn date(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "date", [date.into()])
    }

    /// Month, `0` for January
    pub fn month(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "month", [date.into()])
    }

    pub fn year(&self, date: impl Into<Expr>) -> Node {
        call(ResultType::Number, "year", [date.into()])
    }

    // === Misc ===

    /// Unique id of the current entry
    pub fn id(&self) -> Node {
        call(ResultType::Text, "id", [])
    }
}
