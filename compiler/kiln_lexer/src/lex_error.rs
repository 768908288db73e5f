//! Lexer error type.

use std::fmt;

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_ir::Span;

/// A lexer error: where, and what went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum LexErrorKind {
    /// Missing closing `"`.
    UnterminatedString,
    /// Byte sequence that starts no token.
    InvalidCharacter(char),
    /// Source longer than `u32::MAX` bytes.
    SourceTooLarge,
}

impl LexError {
    #[cold]
    pub(crate) fn new(span: Span, kind: LexErrorKind) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidCharacter(_) => ErrorCode::E0002,
            LexErrorKind::SourceTooLarge => ErrorCode::E9001,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = match self.kind {
            LexErrorKind::UnterminatedString => "string starts here",
            LexErrorKind::InvalidCharacter(_) => "not valid here",
            LexErrorKind::SourceTooLarge => "source ends past 4GiB",
        };
        Diagnostic::error(self.code())
            .with_message(self.to_string())
            .with_label(self.span, label)
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            LexErrorKind::UnterminatedString => f.write_str("unterminated string literal"),
            LexErrorKind::InvalidCharacter(c) => write!(f, "invalid character {c:?}"),
            LexErrorKind::SourceTooLarge => f.write_str("source file too large"),
        }
    }
}

impl std::error::Error for LexError {}
