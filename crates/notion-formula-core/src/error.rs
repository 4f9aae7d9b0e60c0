//! Formula error types

use thiserror::Error;

/// Result type for formula operations
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Errors that can occur while turning an expression into formula text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// A date value that does not hold a valid calendar instant
    #[error("Invalid date!")]
    InvalidDate,

    /// A numeric value that is NaN
    #[error("Invalid number! NaN is not supported.")]
    InvalidNumber,

    /// Input that is neither a node nor a number, string, boolean or date
    #[error("Unreachable! Invalid property!")]
    UnreachableInvalidProperty,

    /// A typed tree entry whose kind tag (or shape) is not renderable
    #[error("Unreachable! Invalid property kind!")]
    UnreachableInvalidKind,

    /// Nesting exceeded the configured depth limit
    #[error("Expression is nested deeper than {limit} levels")]
    DepthLimitExceeded { limit: usize },
}
