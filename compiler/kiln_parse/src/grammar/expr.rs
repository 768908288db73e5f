//! Expression parsing (precedence climbing over `BinaryOp::precedence`).

use kiln_diagnostic::ErrorCode;
use kiln_eval::EvalError;
use kiln_ir::{BinaryOp, Expr, ExprKind, Quote, QuoteKind, Span, TokenKind, UnaryOp};
use kiln_num::Numeric;
use kiln_stack::ensure_sufficient_stack;

use super::Parser;
use crate::ParseError;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_binary(0))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;
        self.parse_binary_rest(left, min_prec)
    }

    /// Continue a binary expression whose left operand is already parsed.
    pub(crate) fn parse_binary_rest(
        &mut self,
        mut left: Expr,
        min_prec: u8,
    ) -> Result<Expr, ParseError> {
        while let Some(op) = binary_op(self.cursor.current_kind()) {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = self.parse_binary(prec + 1)?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.current_span();
        let op = match self.cursor.current_kind() {
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Not => UnaryOp::Not,
            _ => return self.parse_postfix(),
        };
        self.cursor.advance();

        // `-128` is one literal, so it can reach the most negative value
        if op == UnaryOp::Neg {
            if let TokenKind::Number(text) = self.cursor.current_kind() {
                let token = self.cursor.advance();
                let value = self.number(text, token.span)?.negate();
                let literal = Expr::new(ExprKind::Number(value), start.merge(token.span));
                return self.parse_postfix_from(literal);
            }
        }

        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let primary = self.parse_primary()?;
        self.parse_postfix_from(primary)
    }

    /// Apply calls and field accesses to an already parsed operand.
    pub(crate) fn parse_postfix_from(&mut self, mut expr: Expr) -> Result<Expr, ParseError> {
        loop {
            match self.cursor.current_kind() {
                TokenKind::LParen => {
                    self.cursor.advance();
                    let args = self.parse_comma_list(TokenKind::RParen)?;
                    let span = expr.span.merge(self.cursor.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.cursor.advance();
                    let field = self.parse_name()?;
                    let span = expr.span.merge(self.cursor.previous_span());
                    expr = Expr::new(
                        ExprKind::Field {
                            receiver: Box::new(expr),
                            field,
                        },
                        span,
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.current();
        let kind = match token.kind {
            TokenKind::Number(text) => {
                self.cursor.advance();
                ExprKind::Number(self.number(text, token.span)?)
            }
            TokenKind::Str(name) => {
                self.cursor.advance();
                ExprKind::Str(name)
            }
            TokenKind::True | TokenKind::False => {
                self.cursor.advance();
                ExprKind::Bool(token.kind == TokenKind::True)
            }
            TokenKind::Nil => {
                self.cursor.advance();
                ExprKind::Nil
            }
            TokenKind::Ident(name) => {
                self.cursor.advance();
                ExprKind::Ident(name)
            }
            TokenKind::HashPipe => ExprKind::Ident(self.splice_ident()?),
            TokenKind::HashBracket => return self.splice_expr(),
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                self.cursor.expect(TokenKind::RParen)?;
                inner.kind
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                ExprKind::List(self.parse_comma_list(TokenKind::RBracket)?)
            }
            TokenKind::Fn => {
                self.cursor.advance();
                let params = self.parse_params()?;
                let body = self.parse_fn_body(&params)?;
                ExprKind::Lambda { params, body }
            }
            TokenKind::Quote => self.parse_quote()?,
            TokenKind::HashBrace | TokenKind::HashIf | TokenKind::HashFor | TokenKind::HashElse => {
                return Err(ParseError::new(
                    ErrorCode::E1005,
                    format!(
                        "{} is a statement and cannot be used as a value",
                        token.kind.display_name()
                    ),
                    token.span,
                ));
            }
            other => {
                return Err(ParseError::new(
                    ErrorCode::E1002,
                    format!("expected expression, found {}", other.display_name()),
                    token.span,
                ));
            }
        };
        Ok(Expr::new(kind, token.span.merge(self.cursor.previous_span())))
    }

    /// Comma separated expressions up to and including `close`.
    fn parse_comma_list(&mut self, close: TokenKind) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while !self.cursor.check(close) {
            items.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(close)?;
        Ok(items)
    }

    /// `quote { stmts }` or `quote(expr)`: capture the tokens unparsed.
    fn parse_quote(&mut self) -> Result<ExprKind, ParseError> {
        let token = self.cursor.advance();
        if self.is_host() {
            return Err(ParseError::new(
                ErrorCode::E1005,
                "`quote` is only valid in compile-time code",
                token.span,
            )
            .with_help("wrap the code in `#{ }` or `#[ ]#`"));
        }
        let (open, kind) = match self.cursor.current_kind() {
            TokenKind::LBrace => (TokenKind::LBrace, QuoteKind::Block),
            TokenKind::LParen => (TokenKind::LParen, QuoteKind::Expr),
            _ => return Err(self.cursor.unexpected("`{` or `(` after `quote`")),
        };
        let range = self.cursor.skip_group(open)?;
        Ok(ExprKind::Quote(Quote { range, kind }))
    }

    fn number(&self, text: kiln_ir::Name, span: Span) -> Result<Numeric, ParseError> {
        kiln_num::parse_literal(self.eval.interner().lookup(text))
            .map_err(|err| EvalError::from(err).with_span(span).into())
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Mod,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::NotEq => BinaryOp::NotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::DotDot => BinaryOp::Range,
        _ => return None,
    })
}

/// Whether `kind` can continue an expression already parsed.
pub(crate) fn continues_expr(kind: TokenKind) -> bool {
    binary_op(kind).is_some() || matches!(kind, TokenKind::Dot | TokenKind::LParen | TokenKind::Eq)
}
