//! Re-parsing of quoted code.

use std::rc::Rc;

use kiln_eval::{EvalResult, Evaluator, FragmentParser};
use kiln_ir::{AstFragment, Quote, QuoteKind, TokenKind, TokenList};

use crate::grammar::{Mode, Parser};

/// Parses `quote` ranges of one unit's tokens.
///
/// Quoted code is host code, but it is not declared where it is parsed:
/// its bindings belong to wherever it is eventually injected.
pub struct UnitFragments {
    tokens: Rc<TokenList>,
}

impl UnitFragments {
    pub fn new(tokens: Rc<TokenList>) -> Self {
        UnitFragments { tokens }
    }
}

impl FragmentParser for UnitFragments {
    fn parse_fragment(&self, quote: &Quote, eval: &mut Evaluator) -> EvalResult<AstFragment> {
        tracing::trace!(range = %quote.range, kind = ?quote.kind, "parse quoted fragment");
        let mut parser = Parser::new(
            Rc::clone(&self.tokens),
            quote.range,
            eval,
            Mode::Host { declare: false },
        );
        let fragment = match quote.kind {
            QuoteKind::Block => parser.parse_all().map(AstFragment::Stmts),
            QuoteKind::Expr => parser.parse_expr().and_then(|expr| {
                parser.cursor.expect(TokenKind::Eof)?;
                Ok(AstFragment::Expr(expr))
            }),
        };
        fragment.map_err(crate::ParseError::into_eval)
    }
}
