//! Recursive descent grammar.
//!
//! The parser owns no AST store of its own: every statement it finishes is
//! emitted into a [`StmtBuffer`], and in host code also declared with the
//! evaluator so compile-time code that runs later in the same parse can see
//! it. Preprocessor constructs are executed the moment they are parsed.

mod directive;
mod expr;
mod stmt;

use std::rc::Rc;

use kiln_eval::Evaluator;
use kiln_ir::{Stmt, StmtBuffer, TokenKind, TokenList, TokenRange};

use crate::cursor::Cursor;
use crate::ParseError;

/// What kind of code is being parsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum Mode {
    /// Host code. `declare` registers finished declarations with the
    /// evaluator; quoted fragments parse with it off.
    Host { declare: bool },
    /// Compile-time code inside `#{ }`, `#[ ]#`, `#| |#` or a directive
    /// header. Preprocessor constructs are not allowed here.
    Comptime,
}

pub(crate) struct Parser<'e> {
    pub(crate) cursor: Cursor,
    pub(crate) eval: &'e mut Evaluator,
    pub(crate) mode: Mode,
}

impl<'e> Parser<'e> {
    pub(crate) fn new(
        tokens: Rc<TokenList>,
        range: TokenRange,
        eval: &'e mut Evaluator,
        mode: Mode,
    ) -> Self {
        Parser {
            cursor: Cursor::new(tokens, range),
            eval,
            mode,
        }
    }

    /// Parse every statement in the range.
    pub(crate) fn parse_all(&mut self) -> Result<Vec<Stmt>, ParseError> {
        let mut out = StmtBuffer::new();
        self.parse_stmts_into(&mut out, TokenKind::Eof)?;
        Ok(out.into_stmts())
    }

    /// Parse another range of the same unit into `out`, in the current mode.
    pub(crate) fn parse_range_into(
        &mut self,
        range: TokenRange,
        out: &mut StmtBuffer,
    ) -> Result<(), ParseError> {
        let tokens = Rc::clone(self.cursor.tokens());
        let mut sub = Parser::new(tokens, range, &mut *self.eval, self.mode);
        sub.parse_stmts_into(out, TokenKind::Eof)
    }

    pub(crate) fn is_host(&self) -> bool {
        matches!(self.mode, Mode::Host { .. })
    }

    fn declares(&self) -> bool {
        matches!(self.mode, Mode::Host { declare: true })
    }

    /// Run `f` with compile-time rules in force.
    pub(crate) fn in_comptime<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        let saved = std::mem::replace(&mut self.mode, Mode::Comptime);
        let result = f(self);
        self.mode = saved;
        result
    }

    /// Run `f` inside a fresh evaluator scope when parsing host code, so
    /// declarations in a host block stay local to it.
    pub(crate) fn in_host_scope<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, ParseError>,
    ) -> Result<T, ParseError> {
        if !self.is_host() {
            return f(self);
        }
        self.eval.symbols_mut().enter_scope();
        let result = f(self);
        self.eval.symbols_mut().leave_scope();
        result
    }

    /// Append a finished statement, declaring what it binds first.
    pub(crate) fn emit(&mut self, out: &mut StmtBuffer, stmt: Stmt) -> Result<(), ParseError> {
        if self.declares() {
            self.eval.declare_host(&stmt)?;
        }
        out.emit(stmt);
        Ok(())
    }
}
