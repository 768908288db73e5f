//! Cursor for navigating a bounded range of the unit's tokens.
//!
//! Every parse of the unit, a `#if` branch, an unrolled `#for` body or a
//! quoted fragment, walks the same shared [`TokenList`] through its own
//! `Cursor` limited to a [`TokenRange`]. Past the end of its range the
//! cursor reports `Eof`.

use std::rc::Rc;

use kiln_diagnostic::ErrorCode;
use kiln_ir::{Span, Token, TokenKind, TokenList, TokenRange};
use smallvec::SmallVec;

use crate::ParseError;

pub struct Cursor {
    tokens: Rc<TokenList>,
    pos: usize,
    end: usize,
}

impl Cursor {
    pub fn new(tokens: Rc<TokenList>, range: TokenRange) -> Self {
        let end = (range.end as usize).min(tokens.len());
        Cursor {
            tokens,
            pos: range.start as usize,
            end,
        }
    }

    pub fn tokens(&self) -> &Rc<TokenList> {
        &self.tokens
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Current token, or an `Eof` at the range boundary.
    #[inline]
    pub fn current(&self) -> Token {
        match self.tokens.get(self.pos) {
            Some(token) if self.pos < self.end => *token,
            _ => Token::new(TokenKind::Eof, self.tokens.span_at(self.pos)),
        }
    }

    #[inline]
    pub fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    #[inline]
    pub fn current_span(&self) -> Span {
        self.current().span
    }

    /// Token after the current one, still bounded by the range.
    pub fn peek_kind(&self) -> TokenKind {
        match self.tokens.get(self.pos + 1) {
            Some(token) if self.pos + 1 < self.end => token.kind,
            _ => TokenKind::Eof,
        }
    }

    /// Span of the most recently consumed token.
    pub fn previous_span(&self) -> Span {
        if self.pos == 0 {
            return Span::DUMMY;
        }
        self.tokens.span_at(self.pos - 1)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.end
    }

    #[inline]
    pub fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Advance and return the consumed token.
    pub fn advance(&mut self) -> Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume the current token if it matches `kind`.
    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Expect a specific token kind and advance.
    pub fn expect(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(kind.display_name()))
        }
    }

    #[cold]
    pub fn unexpected(&self, expected: &str) -> ParseError {
        let found = self.current();
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", found.kind.display_name()),
            found.span,
        )
    }

    /// Skip a delimited group starting at the current `open` token and
    /// return the range strictly inside it. Nested delimiters must match.
    pub fn skip_group(&mut self, open: TokenKind) -> Result<TokenRange, ParseError> {
        let opener = self.expect(open)?;
        let Some(close) = closer_of(open) else {
            return Err(ParseError::new(
                ErrorCode::E9001,
                format!("{} does not open a group", open.display_name()),
                opener.span,
            ));
        };
        let start = self.pos;
        let mut pending: SmallVec<[TokenKind; 8]> = SmallVec::new();
        loop {
            let token = self.current();
            if self.is_at_end() {
                return Err(ParseError::new(
                    ErrorCode::E1003,
                    format!("unclosed {}", open.display_name()),
                    opener.span,
                )
                .with_help(format!("expected {} before {}", close.display_name(), token.kind.display_name())));
            }
            if let Some(inner) = closer_of(token.kind) {
                pending.push(inner);
            } else if is_closer(token.kind) {
                match pending.pop() {
                    Some(expected) if expected == token.kind => {}
                    Some(expected) => {
                        return Err(ParseError::new(
                            ErrorCode::E1003,
                            format!(
                                "mismatched {}, expected {}",
                                token.kind.display_name(),
                                expected.display_name()
                            ),
                            token.span,
                        ));
                    }
                    None if token.kind == close => {
                        let range = TokenRange::new(to_u32(start), to_u32(self.pos));
                        self.advance();
                        return Ok(range);
                    }
                    None => {
                        return Err(ParseError::new(
                            ErrorCode::E1003,
                            format!(
                                "mismatched {}, expected {}",
                                token.kind.display_name(),
                                close.display_name()
                            ),
                            token.span,
                        ));
                    }
                }
            }
            self.advance();
        }
    }
}

fn closer_of(kind: TokenKind) -> Option<TokenKind> {
    match kind {
        TokenKind::LBrace | TokenKind::HashBrace => Some(TokenKind::RBrace),
        TokenKind::LParen => Some(TokenKind::RParen),
        TokenKind::LBracket => Some(TokenKind::RBracket),
        TokenKind::HashBracket => Some(TokenKind::BracketHash),
        TokenKind::HashPipe => Some(TokenKind::PipeHash),
        _ => None,
    }
}

fn is_closer(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RBrace
            | TokenKind::RParen
            | TokenKind::RBracket
            | TokenKind::BracketHash
            | TokenKind::PipeHash
    )
}

fn to_u32(index: usize) -> u32 {
    u32::try_from(index).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests;
