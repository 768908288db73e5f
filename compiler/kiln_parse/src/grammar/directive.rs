//! Preprocessor constructs.
//!
//! Each construct is parsed and executed in one step: by the time the
//! parser moves past a `#{ }` block, a `#if` or a `#for`, the code it
//! produced is already in the output buffer and declared.

use kiln_diagnostic::ErrorCode;
use kiln_eval::Value;
use kiln_ir::{Block, Expr, Name, Span, Stmt, StmtBuffer, StmtKind, TokenKind};

use super::expr::continues_expr;
use super::Parser;
use crate::ParseError;

impl Parser<'_> {
    fn require_host(&self, construct: &str) -> Result<(), ParseError> {
        if self.is_host() {
            return Ok(());
        }
        Err(ParseError::new(
            ErrorCode::E1005,
            format!("{construct} is not allowed inside compile-time code"),
            self.cursor.current_span(),
        ))
    }

    /// `#{ stmts }`: run compile-time statements in the current scope.
    /// Anything they inject lands in `out` at this point.
    pub(crate) fn directive_block(&mut self, out: &mut StmtBuffer) -> Result<(), ParseError> {
        self.require_host("`#{`")?;
        let start = self.cursor.current_span();
        let block = self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashBrace)?;
            let mut body = StmtBuffer::new();
            p.parse_stmts_into(&mut body, TokenKind::RBrace)?;
            p.cursor.expect(TokenKind::RBrace)?;
            Ok(Block::new(body.into_stmts()))
        })?;
        let span = start.merge(self.cursor.previous_span());
        tracing::debug!(?span, stmts = block.stmts.len(), "run compile-time block");
        self.eval
            .exec_directive(&block, out)
            .map_err(|err| err.with_span(span))?;
        Ok(())
    }

    /// Evaluate `#[ expr ]#`.
    fn splice_value(&mut self) -> Result<(Value, Span), ParseError> {
        self.require_host("`#[`")?;
        let start = self.cursor.current_span();
        let expr = self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashBracket)?;
            let expr = p.parse_expr()?;
            p.cursor.expect(TokenKind::BracketHash)?;
            Ok(expr)
        })?;
        let span = start.merge(self.cursor.previous_span());
        let value = self.eval.eval(&expr).map_err(|err| err.with_span(span))?;
        Ok((value, span))
    }

    /// `#[ expr ]#` in expression position.
    pub(crate) fn splice_expr(&mut self) -> Result<Expr, ParseError> {
        let (value, span) = self.splice_value()?;
        let mut expr = self
            .eval
            .splice_expr(value)
            .map_err(|err| err.with_span(span))?;
        expr.span = span;
        Ok(expr)
    }

    /// `#[ expr ]#` at the start of a statement. Followed by an operator it
    /// starts an expression; otherwise the value is spliced as statements.
    pub(crate) fn splice_stmt(&mut self, out: &mut StmtBuffer) -> Result<(), ParseError> {
        let (value, span) = self.splice_value()?;
        if continues_expr(self.cursor.current_kind()) {
            let mut head = self
                .eval
                .splice_expr(value)
                .map_err(|err| err.with_span(span))?;
            head.span = span;
            let expr = self.parse_postfix_from(head)?;
            let expr = self.parse_binary_rest(expr, 0)?;
            let kind = self.finish_expr_stmt(expr)?;
            let stmt = Stmt::new(kind, span.merge(self.cursor.previous_span()));
            return self.emit(out, stmt);
        }
        self.cursor.eat(TokenKind::Semicolon);
        let stmts = self
            .eval
            .splice_stmts(value)
            .map_err(|err| err.with_span(span))?;
        for stmt in stmts {
            self.emit(out, stmt)?;
        }
        Ok(())
    }

    /// `#| expr |#`: a name computed at compile time.
    pub(crate) fn splice_ident(&mut self) -> Result<Name, ParseError> {
        self.require_host("`#|`")?;
        let start = self.cursor.current_span();
        let expr = self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashPipe)?;
            let expr = p.parse_expr()?;
            p.cursor.expect(TokenKind::PipeHash)?;
            Ok(expr)
        })?;
        let span = start.merge(self.cursor.previous_span());
        let value = self.eval.eval(&expr).map_err(|err| err.with_span(span))?;
        let name = self
            .eval
            .splice_ident(value)
            .map_err(|err| err.with_span(span))?;
        Ok(name)
    }

    /// `#if cond { .. } [#else #if .. | #else { .. }]`
    ///
    /// Only the selected branch is parsed, inline in the current scope.
    pub(crate) fn directive_if(&mut self, out: &mut StmtBuffer) -> Result<(), ParseError> {
        self.require_host("`#if`")?;
        let cond = self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashIf)?;
            p.parse_expr()
        })?;
        let taken = self
            .eval
            .eval(&cond)
            .map_err(|err| err.with_span(cond.span))?
            .is_truthy();
        let then_range = self.cursor.skip_group(TokenKind::LBrace)?;
        tracing::trace!(taken, "#if");
        if taken {
            self.parse_range_into(then_range, out)?;
        }

        if self.cursor.eat(TokenKind::HashElse) {
            if self.cursor.check(TokenKind::HashIf) {
                if taken {
                    self.skip_directive_if()?;
                } else {
                    self.directive_if(out)?;
                }
            } else {
                let else_range = self.cursor.skip_group(TokenKind::LBrace)?;
                if !taken {
                    self.parse_range_into(else_range, out)?;
                }
            }
        }
        Ok(())
    }

    /// Step over a `#if` chain whose condition must not run.
    fn skip_directive_if(&mut self) -> Result<(), ParseError> {
        self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashIf)?;
            p.parse_expr()
        })?;
        self.cursor.skip_group(TokenKind::LBrace)?;
        if self.cursor.eat(TokenKind::HashElse) {
            if self.cursor.check(TokenKind::HashIf) {
                self.skip_directive_if()?;
            } else {
                self.cursor.skip_group(TokenKind::LBrace)?;
            }
        }
        Ok(())
    }

    /// `#for name in iterable { body }`
    ///
    /// Emits one block per element. Each copy of the body is parsed afresh
    /// in its own scope with `name` bound to the element as a constant.
    pub(crate) fn directive_for(&mut self, out: &mut StmtBuffer) -> Result<(), ParseError> {
        self.require_host("`#for`")?;
        let start = self.cursor.current_span();
        let (var, iter) = self.in_comptime(|p| {
            p.cursor.expect(TokenKind::HashFor)?;
            let var = p.parse_name()?;
            p.cursor.expect(TokenKind::In)?;
            let iter = p.parse_expr()?;
            Ok((var, iter))
        })?;
        let body = self.cursor.skip_group(TokenKind::LBrace)?;
        let span = start.merge(self.cursor.previous_span());

        let iterable = self
            .eval
            .eval(&iter)
            .map_err(|err| err.with_span(iter.span))?;
        let items = self.eval.unroll_items(&iterable, span)?;
        tracing::debug!(iterations = items.len(), %body, "unroll #for");

        for item in items {
            let mut copy = StmtBuffer::new();
            self.in_host_scope(|p| {
                p.eval.bind_const(var, item, span);
                p.parse_range_into(body, &mut copy)
            })?;
            let block = Stmt::new(StmtKind::Block(Block::new(copy.into_stmts())), span);
            self.emit(out, block)?;
        }
        Ok(())
    }
}
