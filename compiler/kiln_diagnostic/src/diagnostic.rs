use std::fmt;
use std::fmt::Write as _;

use kiln_ir::Span;

use crate::span_utils::LineOffsetTable;
use crate::ErrorCode;

/// A span inside the unit plus what to say about it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label {
    pub span: Span,
    pub text: String,
}

/// The error that ended a compilation unit.
///
/// Every diagnostic is fatal; the unit stops at the first one.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "a diagnostic ends the unit and must reach the caller"]
pub struct Diagnostic {
    pub code: ErrorCode,
    /// For user-raised compile-time failures this is the user's text,
    /// unmodified.
    pub message: String,
    /// The first label is where the error happened.
    pub labels: Vec<Label>,
    pub notes: Vec<String>,
}

impl Diagnostic {
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            labels: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_label(mut self, span: Span, text: impl Into<String>) -> Self {
        self.labels.push(Label {
            span,
            text: text.into(),
        });
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn primary_span(&self) -> Option<Span> {
        self.labels.first().map(|label| label.span)
    }

    /// Render against the unit's source, with `file:line:col` locations and
    /// the offending source line under each label.
    pub fn render(&self, file: &str, source: &str) -> String {
        let table = LineOffsetTable::build(source);
        let mut out = format!("error[{}]: {}", self.code, self.message);
        for (index, label) in self.labels.iter().enumerate() {
            let (line, column) = table.offset_to_line_col(source, label.span.start);
            let arrow = if index == 0 { "-->" } else { ":::" };
            let underline = "^".repeat(label.span.len().max(1) as usize);
            let _ = write!(
                out,
                "\n  {arrow} {file}:{line}:{column}\n   | {}\n   | {:>pad$}{underline} {}",
                table.line_text(source, line),
                "",
                label.text,
                pad = (column - 1) as usize,
            );
        }
        for note in &self.notes {
            let _ = write!(out, "\n   = note: {note}");
        }
        out
    }
}

/// Compact single-line-per-part form, spans shown as byte ranges.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;
        for label in &self.labels {
            write!(f, "\n  --> {:?}: {}", label.span, label.text)?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}
