//! AST node store.
//!
//! Host code and compile-time code share one tree shape. Children are owned,
//! so `Clone` is a deep copy: a macro body cloned per invocation never
//! shares a node with another invocation. Equality is structural and ignores
//! spans.

mod buffer;

use std::fmt;

use kiln_num::Numeric;

use crate::{Name, Span, TokenRange};

pub use buffer::{CursorError, StmtBuffer};

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    /// `a..b`, half-open
    Range,
}

impl BinaryOp {
    pub fn as_symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::And => "and",
            BinaryOp::Or => "or",
            BinaryOp::Range => "..",
        }
    }

    /// Binding power; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => 4,
            BinaryOp::Range => 5,
            BinaryOp::Add | BinaryOp::Sub => 6,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => 7,
        }
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    Neg,
    Not,
}

/// Which declaration keyword introduced a binding.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum DeclKind {
    Let,
    Var,
    /// Evaluated at compile time; the symbol carries the value.
    Const,
}

impl DeclKind {
    pub fn keyword(self) -> &'static str {
        match self {
            DeclKind::Let => "let",
            DeclKind::Var => "var",
            DeclKind::Const => "const",
        }
    }
}

/// What a `quote` re-parses its token range as.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum QuoteKind {
    /// `quote { stmts }`
    Block,
    /// `quote(expr)`
    Expr,
}

/// Unparsed code captured as a token range.
///
/// Evaluating a quote parses the range afresh, so every evaluation yields
/// an independent tree.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Quote {
    pub range: TokenRange,
    pub kind: QuoteKind,
}

/// Function or lambda parameter.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub ty: Option<Name>,
}

/// Expression node.
#[derive(Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    /// Node without a source position, for code built by compile-time calls.
    pub fn synthetic(kind: ExprKind) -> Self {
        Expr {
            kind,
            span: Span::DUMMY,
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Expression kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum ExprKind {
    Number(Numeric),
    Str(Name),
    Bool(bool),
    Nil,
    Ident(Name),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Field {
        receiver: Box<Expr>,
        field: Name,
    },
    List(Vec<Expr>),
    /// `fn(a, b) { ... }`
    Lambda {
        params: Vec<Param>,
        body: Block,
    },
    Quote(Quote),
}

/// Ordered statement sequence with its own lexical scope.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Block { stmts }
    }
}

/// Named function declaration.
#[derive(Clone, PartialEq, Debug)]
pub struct FunctionDef {
    pub name: Name,
    pub params: Vec<Param>,
    pub ret: Option<Name>,
    pub body: Block,
}

/// Statement node.
#[derive(Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }

    pub fn synthetic(kind: StmtKind) -> Self {
        Stmt {
            kind,
            span: Span::DUMMY,
        }
    }

    /// Name this statement binds in its enclosing scope, if any.
    pub fn declared_name(&self) -> Option<Name> {
        match &self.kind {
            StmtKind::Let { name, .. } => Some(*name),
            StmtKind::Function(def) => Some(def.name),
            _ => None,
        }
    }
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

/// Statement kinds.
#[derive(Clone, PartialEq, Debug)]
pub enum StmtKind {
    /// `let|var|const name[: T] = init;`
    Let {
        name: Name,
        decl: DeclKind,
        ty: Option<Name>,
        init: Expr,
    },
    /// `target = value;` where target is a name or a field
    Assign { target: Expr, value: Expr },
    Function(FunctionDef),
    If {
        cond: Expr,
        then_block: Block,
        else_block: Option<Block>,
    },
    While { cond: Expr, body: Block },
    /// `for var in iter { body }`
    For { var: Name, iter: Expr, body: Block },
    Return(Option<Expr>),
    Block(Block),
    Expr(Expr),
}

/// A piece of AST produced or consumed by compile-time code.
#[derive(Clone, PartialEq, Debug)]
pub enum AstFragment {
    Expr(Expr),
    Stmts(Vec<Stmt>),
}

impl AstFragment {
    /// Number of statements [`AstFragment::into_stmts`] yields.
    pub fn stmt_count(&self) -> usize {
        match self {
            AstFragment::Expr(_) => 1,
            AstFragment::Stmts(stmts) => stmts.len(),
        }
    }

    /// Statement form: an expression becomes an expression statement.
    pub fn into_stmts(self) -> Vec<Stmt> {
        match self {
            AstFragment::Expr(expr) => {
                let span = expr.span;
                vec![Stmt::new(StmtKind::Expr(expr), span)]
            }
            AstFragment::Stmts(stmts) => stmts,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AstFragment::Expr(_) => "expression",
            AstFragment::Stmts(_) => "statements",
        }
    }
}
