//! Diagnostic system for compile errors.
//!
//! Every failure in a compilation unit ends up as one [`Diagnostic`]:
//! - an [`ErrorCode`] for searchability
//! - the message (verbatim for user-authored compile-time failures)
//! - labeled spans for where it went wrong
//! - notes for context
//!
//! Compilation of a unit stops at the first error, so there is no queue or
//! deduplication here; callers return the diagnostic and stop.

mod diagnostic;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label};
pub use error_code::ErrorCode;
