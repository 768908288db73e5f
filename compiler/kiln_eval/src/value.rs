//! Compile-time values.
//!
//! One closed sum type covers everything compile-time code can hold:
//! numbers, strings, code (`Ast`), handles into the symbol table, types
//! and callables. Callables close over a `ScopeId`, never over the scope
//! itself, so captured scopes stay in the unit's arena.

use std::fmt;
use std::rc::Rc;

use kiln_ir::{AstFragment, Block, Name, Param, Type};
use kiln_num::Numeric;

use crate::builtins::{Builtin, Namespace};
use crate::symbols::{ScopeId, SymbolId};

/// A compile-time value.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(Numeric),
    Str(Rc<str>),
    List(Rc<Vec<Value>>),
    /// Half-open integer range `start..end`.
    Range {
        start: i64,
        end: i64,
    },
    Function(Rc<Closure>),
    Macro(Rc<Macro>),
    Builtin(Builtin),
    /// A builtin with its receiver already bound, e.g. `scope.lookup`.
    Method(Rc<BoundMethod>),
    /// Code as data. Each evaluation of a quote or constructor yields a
    /// fresh fragment.
    Ast(Rc<AstFragment>),
    Symbol(SymbolId),
    Scope(ScopeId),
    Type(Type),
    Namespace(Namespace),
}

impl Value {
    pub fn str(s: &str) -> Self {
        Value::Str(Rc::from(s))
    }

    pub fn int(n: i64) -> Self {
        Value::Number(Numeric::Int(n))
    }

    pub fn ast(fragment: AstFragment) -> Self {
        Value::Ast(Rc::new(fragment))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(items))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "boolean",
            Value::Number(n) if n.is_integer() => "integer",
            Value::Number(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Range { .. } => "range",
            Value::Function(_) => "function",
            Value::Macro(_) => "macro",
            Value::Builtin(_) | Value::Method(_) => "builtin function",
            Value::Ast(_) => "ast",
            Value::Symbol(_) => "symbol",
            Value::Scope(_) => "scope",
            Value::Type(_) => "type",
            Value::Namespace(_) => "namespace",
        }
    }

    /// `nil` and `false` are falsy; everything else is truthy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_number(&self) -> Option<Numeric> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(
            self,
            Value::Function(_) | Value::Macro(_) | Value::Builtin(_) | Value::Method(_)
        )
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.value_eq(b),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (
                Value::Range { start, end },
                Value::Range {
                    start: s2,
                    end: e2,
                },
            ) => start == s2 && end == e2,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Macro(a), Value::Macro(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Method(a), Value::Method(b)) => Rc::ptr_eq(a, b),
            // Structural: spans and node addresses do not matter.
            (Value::Ast(a), Value::Ast(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Scope(a), Value::Scope(b)) => a == b,
            (Value::Type(a), Value::Type(b)) => a == b,
            (Value::Namespace(a), Value::Namespace(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Numeric> for Value {
    fn from(n: Numeric) -> Self {
        Value::Number(n)
    }
}

impl From<Type> for Value {
    fn from(ty: Type) -> Self {
        Value::Type(ty)
    }
}

/// A function value: parameters, body and the scope it was created in.
#[derive(Debug)]
pub struct Closure {
    pub name: Option<Name>,
    pub params: Vec<Param>,
    /// Never executed in place; each call runs a deep copy.
    pub body: Rc<Block>,
    pub scope: ScopeId,
}

/// A macro wraps a function and decides where its free names resolve.
#[derive(Debug)]
pub struct Macro {
    pub function: Rc<Closure>,
    /// Definition scope for hygienic macros; `None` resolves at the call site.
    pub captured: Option<ScopeId>,
}

impl Macro {
    pub fn is_hygienic(&self) -> bool {
        self.captured.is_some()
    }
}

#[derive(Debug)]
pub struct BoundMethod {
    pub receiver: Value,
    pub builtin: Builtin,
}

impl fmt::Display for Value {
    /// Rendering that needs no interner or symbol table.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Str(s) => f.write_str(s),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Range { start, end } => write!(f, "{start}..{end}"),
            Value::Ast(fragment) => write!(f, "<ast {}>", fragment.kind_name()),
            Value::Type(ty) => write!(f, "{ty}"),
            other => write!(f, "<{}>", other.type_name()),
        }
    }
}
