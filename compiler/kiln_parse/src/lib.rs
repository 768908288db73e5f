//! Parser for Kiln.
//!
//! Parsing and compile-time evaluation are interleaved: the parser hands
//! each preprocessor construct to the [`Evaluator`] as soon as it has been
//! read, and the evaluator calls back into the parser (through
//! [`UnitFragments`]) whenever quoted code is evaluated. The result is the
//! unit's host AST with every directive already expanded.

mod cursor;
mod error;
mod fragments;
mod grammar;

use std::rc::Rc;

use kiln_eval::Evaluator;
use kiln_ir::{Stmt, TokenList};

pub use cursor::Cursor;
pub use error::{ParseError, SyntaxError};
pub use fragments::UnitFragments;

use grammar::{Mode, Parser};

/// Parse a whole unit, running its compile-time code along the way.
///
/// Host declarations are registered with `eval` as they are parsed, so
/// compile-time code sees every declaration that precedes it.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse_unit(tokens: Rc<TokenList>, eval: &mut Evaluator) -> Result<Vec<Stmt>, ParseError> {
    eval.set_fragment_parser(Rc::new(UnitFragments::new(Rc::clone(&tokens))));
    let range = tokens.full_range();
    let mut parser = Parser::new(tokens, range, eval, Mode::Host { declare: true });
    let stmts = parser.parse_all()?;
    tracing::debug!(stmts = stmts.len(), "parsed unit");
    Ok(stmts)
}

#[cfg(test)]
mod tests;
