//! Value to AST conversion for splices, and value rendering.
//!
//! Numbers, strings, booleans and `nil` become literal nodes, symbols become
//! identifiers, lists become list literals and `Ast` values are spliced
//! verbatim. Anything else is an [`UnconvertibleValue`] error naming the
//! value's type.
//!
//! [`UnconvertibleValue`]: crate::EvalErrorKind::UnconvertibleValue

use kiln_ir::{AstFragment, Expr, ExprKind, Name, Stmt, StmtKind, Type};

use crate::errors::{self, EvalResult};
use crate::{Evaluator, Value};

impl Evaluator {
    /// Convert a value for an expression splice (`#[ expr ]#`).
    pub fn splice_expr(&self, value: Value) -> EvalResult<Expr> {
        let kind = match value {
            Value::Number(n) => ExprKind::Number(n),
            Value::Str(s) => ExprKind::Str(self.interner.intern(&s)),
            Value::Bool(b) => ExprKind::Bool(b),
            Value::Nil => ExprKind::Nil,
            Value::Symbol(id) => ExprKind::Ident(self.symbols.symbol(id).name),
            Value::List(items) => ExprKind::List(
                items
                    .iter()
                    .map(|item| self.splice_expr(item.clone()))
                    .collect::<EvalResult<Vec<_>>>()?,
            ),
            Value::Ast(fragment) => match AstFragment::clone(&fragment) {
                AstFragment::Expr(expr) => return Ok(expr),
                AstFragment::Stmts(stmts) => match <[Stmt; 1]>::try_from(stmts) {
                    Ok([Stmt {
                        kind: StmtKind::Expr(expr),
                        ..
                    }]) => return Ok(expr),
                    _ => return Err(errors::unconvertible_value("statements")),
                },
            },
            other => return Err(errors::unconvertible_value(other.type_name())),
        };
        Ok(Expr::synthetic(kind))
    }

    /// Convert a value for a statement-position splice or `inject`.
    pub fn splice_stmts(&self, value: Value) -> EvalResult<Vec<Stmt>> {
        match value {
            Value::Ast(fragment) => Ok(AstFragment::clone(&fragment).into_stmts()),
            Value::List(items) => {
                let mut stmts = Vec::new();
                for item in items.iter() {
                    stmts.extend(self.splice_stmts(item.clone())?);
                }
                Ok(stmts)
            }
            Value::Nil => Ok(Vec::new()),
            other => Ok(AstFragment::Expr(self.splice_expr(other)?).into_stmts()),
        }
    }

    /// Convert a value for an identifier splice (`#| expr |#`).
    pub fn splice_ident(&self, value: Value) -> EvalResult<Name> {
        let text = match &value {
            Value::Str(s) => s.to_string(),
            Value::Symbol(id) => return Ok(self.symbols.symbol(*id).name),
            Value::Ast(fragment) => match fragment.as_ref() {
                AstFragment::Expr(Expr {
                    kind: ExprKind::Ident(name),
                    ..
                }) => return Ok(*name),
                _ => return Err(errors::unconvertible_value("non-identifier ast")),
            },
            other => return Err(errors::unconvertible_value(other.type_name())),
        };
        if !is_identifier(&text) {
            return Err(errors::execution(format!(
                "`{text}` is not a valid identifier"
            )));
        }
        Ok(self.interner.intern(&text))
    }

    /// Callee position: a string names a function, anything else converts
    /// as an expression.
    pub(crate) fn splice_callee(&self, value: Value) -> EvalResult<Expr> {
        match value {
            Value::Str(_) => Ok(Expr::synthetic(ExprKind::Ident(self.splice_ident(value)?))),
            other => self.splice_expr(other),
        }
    }

    /// Human-readable rendering used by `tostring`, `print` and messages.
    pub fn render(&self, value: &Value) -> String {
        match value {
            Value::Symbol(id) => self.name_str(self.symbols.symbol(*id).name).to_string(),
            Value::Function(closure) => match closure.name {
                Some(name) => format!("<function {}>", self.name_str(name)),
                None => "<function>".to_string(),
            },
            Value::Builtin(builtin) => format!("<builtin {}>", builtin.name()),
            Value::List(items) => {
                let inner: Vec<_> = items.iter().map(|item| self.render(item)).collect();
                format!("[{}]", inner.join(", "))
            }
            other => other.to_string(),
        }
    }

    /// `typeof`: declarations report their inferred type, code asks the
    /// analysis oracle, plain values report their literal type.
    pub(crate) fn type_of(&self, value: &Value) -> Type {
        let scope = self.symbols.current();
        match value {
            Value::Ast(fragment) => match fragment.as_ref() {
                AstFragment::Expr(expr) => {
                    self.oracle.type_of(expr, scope, &self.symbols, &self.interner)
                }
                AstFragment::Stmts(stmts) => match stmts.as_slice() {
                    [Stmt {
                        kind: StmtKind::Expr(expr),
                        ..
                    }] => self.oracle.type_of(expr, scope, &self.symbols, &self.interner),
                    [stmt] => stmt
                        .declared_name()
                        .and_then(|name| self.symbols.lookup(name))
                        .map_or(Type::Unresolved, |id| self.symbols.symbol(id).ty.clone()),
                    _ => Type::Unresolved,
                },
            },
            other => self.type_of_value(other),
        }
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests;
