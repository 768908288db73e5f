//! Parse errors.
//!
//! Parsing runs compile-time code as it goes, so a parse can fail either on
//! malformed syntax or with an error raised by the evaluator. Both lower to
//! a [`Diagnostic`].

use std::fmt;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_eval::EvalError;
use kiln_ir::Span;

/// Malformed input.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct SyntaxError {
    pub code: ErrorCode,
    pub message: String,
    pub span: Span,
    /// Suggestions shown as notes.
    pub help: Vec<String>,
}

/// Why a parse stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    Syntax(SyntaxError),
    /// Compile-time code run during the parse failed.
    Eval(EvalError),
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError::Syntax(SyntaxError {
            code,
            message: message.into(),
            span,
            help: Vec::new(),
        })
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        if let ParseError::Syntax(err) = &mut self {
            err.help.push(help.into());
        }
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ParseError::Syntax(err) => err.code,
            ParseError::Eval(err) => err.code(),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Syntax(err) => Some(err.span),
            ParseError::Eval(err) => err.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            ParseError::Syntax(err) => {
                let mut diag = Diagnostic::error(err.code)
                    .with_message(err.message.clone())
                    .with_label(err.span, "here");
                for help in &err.help {
                    diag = diag.with_note(help.clone());
                }
                diag
            }
            ParseError::Eval(err) => err.to_diagnostic(),
        }
    }

    /// Hand the error back to the evaluator, e.g. from a quoted fragment.
    pub fn into_eval(self) -> EvalError {
        match self {
            ParseError::Syntax(_) => kiln_eval::syntax(self.to_diagnostic()),
            ParseError::Eval(err) => err,
        }
    }
}

impl From<EvalError> for ParseError {
    fn from(err: EvalError) -> Self {
        ParseError::Eval(err)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Syntax(err) => write!(f, "[{}] {}", err.code, err.message),
            ParseError::Eval(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ParseError {}
