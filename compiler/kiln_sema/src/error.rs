//! Analysis errors.

use std::fmt;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::Span;

/// A declaration or reference the analysis passes reject.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TypeCheckError {
    pub message: String,
    pub span: Span,
    pub code: ErrorCode,
}

impl TypeCheckError {
    #[cold]
    pub fn new(message: impl Into<String>, span: Span, code: ErrorCode) -> Self {
        TypeCheckError {
            message: message.into(),
            span,
            code,
        }
    }

    /// A literal or constant does not fit its declared width.
    #[cold]
    pub fn overflow(value: impl fmt::Display, target: impl fmt::Display, span: Span) -> Self {
        Self::new(
            format!("value {value} does not fit in {target}"),
            span,
            ErrorCode::E2001,
        )
    }

    #[cold]
    pub fn undeclared(name: &str, span: Span) -> Self {
        Self::new(
            format!("undeclared symbol `{name}`"),
            span,
            ErrorCode::E2002,
        )
    }

    #[cold]
    pub fn unknown_type(name: &str, span: Span) -> Self {
        Self::new(format!("unknown type `{name}`"), span, ErrorCode::E2003)
    }

    #[cold]
    pub fn mismatch(expected: impl fmt::Display, found: impl fmt::Display, span: Span) -> Self {
        Self::new(
            format!("type mismatch: expected `{expected}`, found `{found}`"),
            span,
            ErrorCode::E2004,
        )
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.code {
            ErrorCode::E2002 => "not found in this scope",
            ErrorCode::E2003 => "not a primitive type",
            _ => "declared here",
        };
        Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, label)
    }
}

impl fmt::Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for TypeCheckError {}
