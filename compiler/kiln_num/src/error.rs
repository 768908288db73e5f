//! Numeric error type.

use thiserror::Error;

/// Result alias for numeric operations.
pub type NumResult<T> = Result<T, NumError>;

/// Errors produced while parsing, converting, or folding numeric values.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NumError {
    /// Literal text does not follow the integer/fraction/exponent grammar.
    #[error("malformed number literal `{text}`: {reason}")]
    LiteralSyntax { text: String, reason: &'static str },

    /// A value does not fit the requested width.
    #[error("value {value} does not fit in {target}")]
    Overflow { value: String, target: String },

    /// Integer division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,

    /// Only bases 2, 10 and 16 are supported.
    #[error("unsupported base {0}")]
    InvalidRadix(u32),

    /// An integer-only operation received a float.
    #[error("{0} is not an integer")]
    NotInteger(String),
}

impl NumError {
    #[cold]
    pub(crate) fn syntax(text: &str, reason: &'static str) -> Self {
        NumError::LiteralSyntax {
            text: text.to_string(),
            reason,
        }
    }

    #[cold]
    pub(crate) fn overflow(value: impl Into<String>, target: impl Into<String>) -> Self {
        NumError::Overflow {
            value: value.into(),
            target: target.into(),
        }
    }
}
