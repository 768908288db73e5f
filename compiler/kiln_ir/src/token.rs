//! Token types for the Kiln lexer.

use std::fmt;

use super::{Name, Span};

/// A token with its span in the source.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {}", self.kind, self.span)
    }
}

/// Token kinds for Kiln.
///
/// Numeric literals keep their raw text: turning the text into a value is
/// the literal parser's job, and it may fail with a literal-syntax error
/// that should be reported where the literal is used.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// Number literal text: `42`, `0xFF`, `1.5e2`, `0b1.1p3`
    Number(Name),
    /// String literal (unescaped, interned)
    Str(Name),
    /// Identifier (interned)
    Ident(Name),

    // Keywords
    Let,
    Var,
    Const,
    Fn,
    If,
    Else,
    While,
    For,
    In,
    Return,
    True,
    False,
    Nil,
    Quote,
    And,
    Or,
    Not,

    // Punctuation
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
    DotDot,
    Arrow,
    Eq,
    EqEq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // Preprocessor delimiters
    /// `#{` opens a compile-time statement block
    HashBrace,
    /// `#[` opens an expression splice
    HashBracket,
    /// `]#` closes an expression splice
    BracketHash,
    /// `#|` opens an identifier splice
    HashPipe,
    /// `|#` closes an identifier splice
    PipeHash,
    /// `#if`
    HashIf,
    /// `#else`
    HashElse,
    /// `#for`
    HashFor,

    /// Unrecognized input
    Error,
    Eof,
}

impl TokenKind {
    /// Human-readable name for diagnostics.
    pub fn display_name(&self) -> &'static str {
        match self {
            TokenKind::Number(_) => "number",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::Let => "`let`",
            TokenKind::Var => "`var`",
            TokenKind::Const => "`const`",
            TokenKind::Fn => "`fn`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::For => "`for`",
            TokenKind::In => "`in`",
            TokenKind::Return => "`return`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Nil => "`nil`",
            TokenKind::Quote => "`quote`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Not => "`not`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDot => "`..`",
            TokenKind::Arrow => "`->`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::NotEq => "`!=`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::HashBrace => "`#{`",
            TokenKind::HashBracket => "`#[`",
            TokenKind::BracketHash => "`]#`",
            TokenKind::HashPipe => "`#|`",
            TokenKind::PipeHash => "`|#`",
            TokenKind::HashIf => "`#if`",
            TokenKind::HashElse => "`#else`",
            TokenKind::HashFor => "`#for`",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of file",
        }
    }
}

/// Half-open range of token indices into a unit's [`TokenList`].
///
/// Used to re-parse a bounded region on demand (branches, unrolled bodies,
/// quoted fragments).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Default)]
pub struct TokenRange {
    pub start: u32,
    pub end: u32,
}

impl TokenRange {
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        TokenRange { start, end }
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

impl fmt::Display for TokenRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tokens[{}..{}]", self.start, self.end)
    }
}

/// Lexer output: every token of a unit, always terminated by `Eof`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        TokenList { tokens: Vec::new() }
    }

    #[inline]
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Range covering every token before the trailing `Eof`.
    pub fn full_range(&self) -> TokenRange {
        let end = self
            .tokens
            .iter()
            .rposition(|t| t.kind != TokenKind::Eof)
            .map_or(0, |last| last + 1);
        TokenRange::new(0, u32::try_from(end).unwrap_or(u32::MAX))
    }

    /// Span of the token at `index`, or of the final token when out of range.
    pub fn span_at(&self, index: usize) -> Span {
        self.tokens
            .get(index)
            .or_else(|| self.tokens.last())
            .map_or(Span::DUMMY, |t| t.span)
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}

#[cfg(test)]
mod tests;
