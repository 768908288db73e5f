//! Statement execution.

use kiln_ir::{Block, DeclKind, Expr, ExprKind, Name, Stmt, StmtKind};
use kiln_num::NarrowMode;

use crate::errors::{self, EvalError, EvalResult};
use crate::symbols::{AssignError, Symbol, SymbolFlags};
use crate::Value;

use super::Evaluator;

/// How a statement sequence finished.
#[derive(Clone, Debug)]
pub(crate) enum Flow {
    Normal,
    Return(Value),
}

impl Evaluator {
    /// Run statements in the current scope.
    pub(crate) fn exec_stmts(&mut self, stmts: &[Stmt]) -> EvalResult<Flow> {
        for stmt in stmts {
            if let Flow::Return(value) = self.exec_stmt(stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    /// Run a block in a fresh child scope.
    pub(crate) fn exec_block(&mut self, block: &Block) -> EvalResult<Flow> {
        self.symbols.enter_scope();
        let flow = self.exec_stmts(&block.stmts);
        self.symbols.leave_scope();
        flow
    }

    fn exec_stmt(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        kiln_stack::ensure_sufficient_stack(|| self.exec_stmt_inner(stmt))
            .map_err(|e| e.with_span(stmt.span))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt) -> EvalResult<Flow> {
        match &stmt.kind {
            StmtKind::Let {
                name,
                decl,
                ty,
                init,
            } => {
                let value = self.eval_expr(init)?;
                let value = self.coerce_to_annotation(value, *ty)?;
                let flags = match decl {
                    DeclKind::Let => SymbolFlags::empty(),
                    DeclKind::Var => SymbolFlags::MUTABLE,
                    DeclKind::Const => SymbolFlags::CONST,
                };
                let ty = match ty {
                    Some(ty) => self.annotation_type(*ty)?,
                    None => self.type_of_value(&value),
                };
                let symbol = Symbol::new(*name, flags, stmt.span)
                    .with_value(value)
                    .with_type(ty);
                self.symbols.declare(symbol);
                Ok(Flow::Normal)
            }
            StmtKind::Assign { target, value } => {
                let value = self.eval_expr(value)?;
                self.assign(target, value)?;
                Ok(Flow::Normal)
            }
            StmtKind::Function(def) => {
                let closure = self.make_closure(Some(def.name), &def.params, &def.body);
                let symbol = Symbol::new(def.name, SymbolFlags::FUNCTION, stmt.span)
                    .with_value(closure);
                self.symbols.declare(symbol);
                Ok(Flow::Normal)
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                if self.eval_expr(cond)?.is_truthy() {
                    self.exec_block(then_block)
                } else if let Some(else_block) = else_block {
                    self.exec_block(else_block)
                } else {
                    Ok(Flow::Normal)
                }
            }
            StmtKind::While { cond, body } => {
                let mut iterations = 0usize;
                while self.eval_expr(cond)?.is_truthy() {
                    iterations += 1;
                    if iterations > self.config.max_iterations {
                        return Err(errors::loop_limit(self.config.max_iterations));
                    }
                    if let Flow::Return(value) = self.exec_block(body)? {
                        return Ok(Flow::Return(value));
                    }
                }
                Ok(Flow::Normal)
            }
            StmtKind::For { var, iter, body } => {
                let iterable = self.eval_expr(iter)?;
                self.exec_for(*var, &iterable, body, stmt)
            }
            StmtKind::Return(value) => {
                let value = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Ok(Flow::Return(value))
            }
            StmtKind::Block(block) => self.exec_block(block),
            StmtKind::Expr(expr) => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            }
        }
    }

    /// Ranges are walked lazily; every loop counts against the iteration
    /// limit as it runs.
    fn exec_for(
        &mut self,
        var: Name,
        iterable: &Value,
        body: &Block,
        stmt: &Stmt,
    ) -> EvalResult<Flow> {
        let limit = self.config.max_iterations;
        let items: Box<dyn Iterator<Item = Value>> = match iterable {
            Value::Range { start, end } => Box::new((*start..*end).map(Value::int)),
            other => {
                let items = self.iterate(other, usize::MAX, |_| errors::loop_limit(limit))?;
                Box::new(items.into_iter())
            }
        };
        for (index, item) in items.enumerate() {
            if index >= limit {
                return Err(errors::loop_limit(limit));
            }
            if let Flow::Return(value) = self.exec_loop_body(var, item, body, stmt)? {
                return Ok(Flow::Return(value));
            }
        }
        Ok(Flow::Normal)
    }

    fn exec_loop_body(
        &mut self,
        var: Name,
        item: Value,
        body: &Block,
        stmt: &Stmt,
    ) -> EvalResult<Flow> {
        self.symbols.enter_scope();
        let ty = self.type_of_value(&item);
        self.symbols.declare(
            Symbol::new(var, SymbolFlags::empty(), stmt.span)
                .with_value(item)
                .with_type(ty),
        );
        let flow = self.exec_stmts(&body.stmts);
        self.symbols.leave_scope();
        flow
    }

    fn assign(&mut self, target: &Expr, value: Value) -> EvalResult<()> {
        match &target.kind {
            ExprKind::Ident(name) => match self.symbols.assign(*name, value) {
                Ok(_) => Ok(()),
                Err(AssignError::Immutable) => {
                    Err(errors::immutable_binding(self.name_str(*name)))
                }
                Err(AssignError::Undefined) => Err(errors::undeclared_symbol(self.name_str(*name))),
            },
            ExprKind::Field { receiver, field } => {
                let receiver = self.eval_expr(receiver)?;
                if let Value::Namespace(crate::builtins::Namespace::Config) = receiver {
                    self.config.set(self.name_str(*field), value);
                    Ok(())
                } else {
                    Err(errors::execution(format!(
                        "cannot assign to field `{}` of a {}",
                        self.name_str(*field),
                        receiver.type_name()
                    )))
                }
            }
            _ => Err(errors::execution("invalid assignment target")),
        }
    }

    /// Values a `for` or `#for` walks over.
    ///
    /// The element count is checked against `limit` before anything is
    /// materialised; `exceeded` builds the error from the count.
    pub(crate) fn iterate(
        &self,
        iterable: &Value,
        limit: usize,
        exceeded: impl FnOnce(u128) -> EvalError,
    ) -> EvalResult<Vec<Value>> {
        let count = match iterable {
            Value::Range { start, end } => range_len(*start, *end),
            Value::List(items) => items.len() as u128,
            Value::Str(s) => s.chars().count() as u128,
            Value::Scope(scope) => self.symbols.scope_symbols(*scope).count() as u128,
            Value::Ast(fragment) => fragment.stmt_count() as u128,
            other => {
                return Err(errors::type_mismatch(
                    "cannot iterate",
                    "a range, list, string, scope or ast",
                    other.type_name(),
                ))
            }
        };
        if count > limit as u128 {
            return Err(exceeded(count));
        }
        Ok(match iterable {
            Value::Range { start, end } => (*start..*end).map(Value::int).collect(),
            Value::List(items) => items.as_ref().clone(),
            Value::Str(s) => s.chars().map(|c| Value::str(c.encode_utf8(&mut [0; 4]))).collect(),
            Value::Scope(scope) => self.symbols.scope_symbols(*scope).map(Value::Symbol).collect(),
            Value::Ast(fragment) => fragment
                .as_ref()
                .clone()
                .into_stmts()
                .into_iter()
                .map(|stmt| Value::ast(kiln_ir::AstFragment::Stmts(vec![stmt])))
                .collect(),
            _ => Vec::new(),
        })
    }

    /// Resolve a type annotation name.
    pub(crate) fn annotation_type(&self, name: Name) -> EvalResult<kiln_ir::Type> {
        let text = self.name_str(name);
        self.oracle
            .primitive_type(text)
            .ok_or_else(|| errors::execution(format!("unknown type `{text}`")))
    }

    /// Checked narrowing of an integer into an annotated integer type.
    pub(crate) fn coerce_to_annotation(&self, value: Value, ty: Option<Name>) -> EvalResult<Value> {
        let Some(ty) = ty else {
            return Ok(value);
        };
        let width = self
            .annotation_type(ty)?
            .as_primitive()
            .and_then(kiln_ir::PrimitiveType::int_width);
        match (value, width) {
            (Value::Number(n), Some(width)) if n.is_integer() => {
                Ok(Value::Number(n.narrow(width, NarrowMode::Checked)?))
            }
            (value, _) => Ok(value),
        }
    }
}

/// Elements in `start..end`, zero when empty.
fn range_len(start: i64, end: i64) -> u128 {
    u128::try_from(i128::from(end) - i128::from(start)).unwrap_or(0)
}
