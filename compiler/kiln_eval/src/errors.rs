//! Error types for compile-time evaluation.
//!
//! Every failure raised while executing compile-time code aborts the unit.
//! `EvalErrorKind` carries the structured category; factory functions fill
//! in both `kind` and `message`, and user-authored failure text is kept
//! verbatim as the message.

use std::fmt;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::Span;
use kiln_num::NumError;

/// Result of compile-time evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

pub(crate) const DEFAULT_ASSERT_MESSAGE: &str = "static assertion failed";
pub(crate) const DEFAULT_STATIC_ERROR_MESSAGE: &str = "static error!";

/// Typed error category for diagnostic conversion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalErrorKind {
    /// Malformed numeric literal text.
    LiteralSyntax { literal: String, reason: String },
    /// Narrowing or arithmetic lost magnitude.
    Overflow { value: String, target: String },
    /// A compile-time value has no AST form.
    UnconvertibleValue { type_name: String },
    /// Lookup miss, hygienic or otherwise.
    UndeclaredSymbol { name: String },
    /// `staticassert` with a false condition.
    StaticAssertion { message: String },
    /// `staticerror`.
    StaticError { message: String },
    /// Any other failure while executing compile-time code.
    CompileTimeExecution { message: String },
    /// A grammar error raised while re-parsing a quoted fragment.
    Syntax(Box<Diagnostic>),
}

impl fmt::Display for EvalErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LiteralSyntax { literal, reason } => {
                write!(f, "malformed number literal `{literal}`: {reason}")
            }
            Self::Overflow { value, target } => {
                write!(f, "value {value} does not fit in {target}")
            }
            Self::UnconvertibleValue { type_name } => {
                write!(f, "value of type `{type_name}` cannot be converted to AST")
            }
            Self::UndeclaredSymbol { name } => write!(f, "undeclared symbol `{name}`"),
            Self::StaticAssertion { message }
            | Self::StaticError { message }
            | Self::CompileTimeExecution { message } => f.write_str(message),
            Self::Syntax(diagnostic) => f.write_str(&diagnostic.message),
        }
    }
}

/// Compile-time evaluation error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// For factory-created errors, equals `kind.to_string()`.
    pub message: String,
    /// Innermost construct that failed, when known.
    pub span: Option<Span>,
}

impl EvalError {
    fn from_kind(kind: EvalErrorKind) -> Self {
        let message = kind.to_string();
        EvalError {
            kind,
            message,
            span: None,
        }
    }

    /// Attach a span unless a more precise one is already set.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() && span != Span::DUMMY {
            self.span = Some(span);
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        match &self.kind {
            EvalErrorKind::LiteralSyntax { .. } => ErrorCode::E0003,
            EvalErrorKind::Overflow { .. } => ErrorCode::E2001,
            EvalErrorKind::UndeclaredSymbol { .. } => ErrorCode::E2002,
            EvalErrorKind::StaticAssertion { .. } => ErrorCode::E6001,
            EvalErrorKind::StaticError { .. } => ErrorCode::E6002,
            EvalErrorKind::UnconvertibleValue { .. } => ErrorCode::E6003,
            EvalErrorKind::CompileTimeExecution { .. } => ErrorCode::E6004,
            EvalErrorKind::Syntax(diagnostic) => diagnostic.code,
        }
    }

    /// Convert to a diagnostic. The message is never rewrapped.
    pub fn to_diagnostic(&self) -> Diagnostic {
        if let EvalErrorKind::Syntax(diagnostic) = &self.kind {
            return (**diagnostic).clone();
        }
        let mut diag = Diagnostic::error(self.code()).with_message(self.message.clone());
        if let Some(span) = self.span {
            let label = match self.kind {
                EvalErrorKind::StaticAssertion { .. } => "assertion failed here",
                EvalErrorKind::StaticError { .. } => "raised here",
                EvalErrorKind::UndeclaredSymbol { .. } => "not found in this scope",
                EvalErrorKind::UnconvertibleValue { .. } => "spliced here",
                _ => "while evaluating this",
            };
            diag = diag.with_label(span, label);
        }
        diag
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for EvalError {}

impl From<NumError> for EvalError {
    fn from(err: NumError) -> Self {
        match err {
            NumError::LiteralSyntax { text, reason } => {
                EvalError::from_kind(EvalErrorKind::LiteralSyntax {
                    literal: text,
                    reason: reason.to_string(),
                })
            }
            NumError::Overflow { value, target } => {
                EvalError::from_kind(EvalErrorKind::Overflow { value, target })
            }
            other => execution(other.to_string()),
        }
    }
}

// Factory functions

#[cold]
pub fn static_assertion(message: Option<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StaticAssertion {
        message: message.unwrap_or_else(|| DEFAULT_ASSERT_MESSAGE.to_string()),
    })
}

#[cold]
pub fn static_error(message: Option<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::StaticError {
        message: message.unwrap_or_else(|| DEFAULT_STATIC_ERROR_MESSAGE.to_string()),
    })
}

#[cold]
pub fn undeclared_symbol(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndeclaredSymbol {
        name: name.to_string(),
    })
}

#[cold]
pub fn unconvertible_value(type_name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UnconvertibleValue {
        type_name: type_name.to_string(),
    })
}

#[cold]
pub fn execution(message: impl Into<String>) -> EvalError {
    EvalError::from_kind(EvalErrorKind::CompileTimeExecution {
        message: message.into(),
    })
}

#[cold]
pub fn not_callable(type_name: &str) -> EvalError {
    execution(format!("value of type `{type_name}` is not callable"))
}

#[cold]
pub fn arity_mismatch(name: &str, expected: usize, got: usize) -> EvalError {
    let arg_word = if expected == 1 {
        "argument"
    } else {
        "arguments"
    };
    execution(format!("{name} expects {expected} {arg_word}, got {got}"))
}

#[cold]
pub fn type_mismatch(context: &str, expected: &str, got: &str) -> EvalError {
    execution(format!("{context}: expected {expected}, got `{got}`"))
}

#[cold]
pub fn no_field(type_name: &str, field: &str) -> EvalError {
    execution(format!("no field `{field}` on value of type `{type_name}`"))
}

#[cold]
pub fn invalid_operands(op: &str, left: &str, right: &str) -> EvalError {
    execution(format!(
        "operator `{op}` cannot be applied to `{left}` and `{right}`"
    ))
}

#[cold]
pub fn immutable_binding(name: &str) -> EvalError {
    execution(format!("cannot assign to immutable binding `{name}`"))
}

#[cold]
pub fn recursion_limit(limit: usize) -> EvalError {
    execution(format!(
        "compile-time recursion limit of {limit} calls exceeded"
    ))
}

#[cold]
pub fn loop_limit(limit: usize) -> EvalError {
    execution(format!("compile-time loop exceeded {limit} iterations"))
}

#[cold]
pub fn unroll_limit(count: u128, limit: usize) -> EvalError {
    execution(format!(
        "unrolling {count} iterations exceeds the limit of {limit}"
    ))
}

#[cold]
pub fn syntax(diagnostic: Diagnostic) -> EvalError {
    EvalError::from_kind(EvalErrorKind::Syntax(Box::new(diagnostic)))
}

#[cfg(test)]
mod tests;
