//! Kiln Sema - the analysis passes behind the compile-time core.
//!
//! Two passes run over a parsed unit, each followed by a phase signal the
//! driver forwards to the evaluator's hook scheduler:
//!
//! - [`infer_declarations`]: fix the type of every host declaration
//!   (after-type-inference hooks run next)
//! - [`resolve_names`]: check every identifier in the expanded AST
//!   (after-analysis hooks run next)
//!
//! [`ExprTyper`] answers `typeof` queries from compile-time code while
//! parsing is still in progress.

mod error;
mod infer;
pub mod operators;
mod resolve;
mod typer;

pub use error::TypeCheckError;
pub use infer::infer_declarations;
pub use resolve::resolve_names;
pub use typer::{literal_type, ExprTyper};

#[cfg(test)]
mod tests;
