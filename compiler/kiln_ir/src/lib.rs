//! Kiln IR - shared compiler data structures.
//!
//! This crate contains the structures every later phase agrees on:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens, `TokenList` and bounded `TokenRange`s for re-parsing
//! - AST nodes (Expr, Stmt, Block) and the cursor-addressed `StmtBuffer`
//! - Primitive type descriptors
//!
//! # Design Philosophy
//!
//! - **Intern identifiers**: strings become `Name(u32)`, compared in O(1)
//! - **Owned trees**: AST children are owned (`Box`/`Vec`), so `Clone` is a
//!   deep copy and two clones never share a node
//! - **Structural identity**: AST equality ignores spans; two trees are equal
//!   iff their tagged structure is equal

pub mod ast;
mod interner;
mod name;
mod span;
mod token;
mod ty;

pub use ast::{
    AstFragment, BinaryOp, Block, CursorError, DeclKind, Expr, ExprKind, FunctionDef, Param,
    Quote, QuoteKind, Stmt, StmtBuffer, StmtKind, UnaryOp,
};
pub use interner::{InternError, SharedInterner, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList, TokenRange};
pub use ty::{PrimitiveType, Type};
