//! Statement parsing.

use kiln_diagnostic::ErrorCode;
use kiln_ir::{
    Block, DeclKind, Expr, ExprKind, FunctionDef, Name, Param, Stmt, StmtBuffer, StmtKind,
    TokenKind,
};

use super::Parser;
use crate::ParseError;

impl Parser<'_> {
    /// Parse statements into `out` until `close` (left unconsumed) or the
    /// end of the range.
    pub(crate) fn parse_stmts_into(
        &mut self,
        out: &mut StmtBuffer,
        close: TokenKind,
    ) -> Result<(), ParseError> {
        while !self.cursor.check(close) && !self.cursor.is_at_end() {
            self.parse_item(out)?;
        }
        Ok(())
    }

    /// One statement or preprocessor construct.
    fn parse_item(&mut self, out: &mut StmtBuffer) -> Result<(), ParseError> {
        match self.cursor.current_kind() {
            TokenKind::HashBrace => self.directive_block(out),
            TokenKind::HashIf => self.directive_if(out),
            TokenKind::HashFor => self.directive_for(out),
            TokenKind::HashBracket if self.is_host() => self.splice_stmt(out),
            TokenKind::HashElse => Err(ParseError::new(
                ErrorCode::E1001,
                "`#else` without a preceding `#if`",
                self.cursor.current_span(),
            )),
            _ => {
                let stmt = self.parse_stmt()?;
                self.emit(out, stmt)
            }
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Let => self.parse_binding(DeclKind::Let)?,
            TokenKind::Var => self.parse_binding(DeclKind::Var)?,
            TokenKind::Const => self.parse_binding(DeclKind::Const)?,
            TokenKind::Fn if self.cursor.peek_kind() != TokenKind::LParen => {
                self.parse_function()?
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.cursor.advance();
                let cond = self.parse_expr()?;
                let body = self.parse_block()?;
                StmtKind::While { cond, body }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Return => {
                self.cursor.advance();
                let value = if self.cursor.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.cursor.expect(TokenKind::Semicolon)?;
                StmtKind::Return(value)
            }
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            _ => {
                let expr = self.parse_expr()?;
                self.finish_expr_stmt(expr)?
            }
        };
        Ok(Stmt::new(kind, start.merge(self.cursor.previous_span())))
    }

    /// `let|var|const name[: T] = init;`
    fn parse_binding(&mut self, decl: DeclKind) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        let name = self.parse_name()?;
        let ty = if self.cursor.eat(TokenKind::Colon) {
            Some(self.parse_name()?)
        } else {
            None
        };
        self.cursor.expect(TokenKind::Eq)?;
        let init = self.parse_expr()?;
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(StmtKind::Let {
            name,
            decl,
            ty,
            init,
        })
    }

    /// `fn name(params) [-> T] { body }`
    fn parse_function(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        let name = self.parse_name()?;
        let params = self.parse_params()?;
        let ret = if self.cursor.eat(TokenKind::Arrow) {
            Some(self.parse_name()?)
        } else {
            None
        };
        let body = self.parse_fn_body(&params)?;
        Ok(StmtKind::Function(FunctionDef {
            name,
            params,
            ret,
            body,
        }))
    }

    pub(crate) fn parse_params(&mut self) -> Result<Vec<Param>, ParseError> {
        self.cursor.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            let name = self.parse_name()?;
            let ty = if self.cursor.eat(TokenKind::Colon) {
                Some(self.parse_name()?)
            } else {
                None
            };
            params.push(Param { name, ty });
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(params)
    }

    /// Body of a function or lambda; host parameters are visible inside.
    pub(crate) fn parse_fn_body(&mut self, params: &[Param]) -> Result<Block, ParseError> {
        let span = self.cursor.current_span();
        self.in_host_scope(|p| {
            if p.declares() {
                for param in params {
                    p.eval.declare_param(*param, span);
                }
            }
            p.parse_block_body()
        })
    }

    fn parse_if(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        let cond = self.parse_expr()?;
        let then_block = self.parse_block()?;
        let else_block = if !self.cursor.eat(TokenKind::Else) {
            None
        } else if self.cursor.check(TokenKind::If) {
            Some(Block::new(vec![self.parse_stmt()?]))
        } else {
            Some(self.parse_block()?)
        };
        Ok(StmtKind::If {
            cond,
            then_block,
            else_block,
        })
    }

    /// `for var in iter { body }`
    fn parse_for(&mut self) -> Result<StmtKind, ParseError> {
        self.cursor.advance();
        let var_span = self.cursor.current_span();
        let var = self.parse_name()?;
        self.cursor.expect(TokenKind::In)?;
        let iter = self.parse_expr()?;
        let body = self.in_host_scope(|p| {
            if p.declares() {
                p.eval.declare_param(Param { name: var, ty: None }, var_span);
            }
            p.parse_block_body()
        })?;
        Ok(StmtKind::For { var, iter, body })
    }

    pub(crate) fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.in_host_scope(Self::parse_block_body)
    }

    fn parse_block_body(&mut self) -> Result<Block, ParseError> {
        self.cursor.expect(TokenKind::LBrace)?;
        let mut out = StmtBuffer::new();
        self.parse_stmts_into(&mut out, TokenKind::RBrace)?;
        self.cursor.expect(TokenKind::RBrace)?;
        Ok(Block::new(out.into_stmts()))
    }

    /// Rest of a statement that began with `expr`: an assignment or a
    /// plain expression, then `;`.
    pub(crate) fn finish_expr_stmt(&mut self, expr: Expr) -> Result<StmtKind, ParseError> {
        if self.cursor.eat(TokenKind::Eq) {
            if !matches!(expr.kind, ExprKind::Ident(_) | ExprKind::Field { .. }) {
                return Err(ParseError::new(
                    ErrorCode::E1001,
                    "invalid assignment target",
                    expr.span,
                )
                .with_help("only names and fields can be assigned"));
            }
            let value = self.parse_expr()?;
            self.cursor.expect(TokenKind::Semicolon)?;
            return Ok(StmtKind::Assign {
                target: expr,
                value,
            });
        }
        self.cursor.expect(TokenKind::Semicolon)?;
        Ok(StmtKind::Expr(expr))
    }

    /// Identifier, or `#| expr |#` in host code.
    pub(crate) fn parse_name(&mut self) -> Result<Name, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(name)
            }
            TokenKind::HashPipe => self.splice_ident(),
            other => Err(ParseError::new(
                ErrorCode::E1004,
                format!("expected identifier, found {}", other.display_name()),
                self.cursor.current_span(),
            )),
        }
    }
}
