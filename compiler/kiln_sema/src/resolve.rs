//! Name resolution over the expanded host AST.

use kiln_eval::Evaluator;
use kiln_ir::{Expr, ExprKind, Name, Param, Stmt, StmtKind, StringInterner};
use kiln_stack::ensure_sufficient_stack;
use rustc_hash::FxHashSet;

use crate::TypeCheckError;

/// Check that every identifier in `stmts` refers to a binding.
///
/// Bindings are the host declarations in scope lexically, plus whatever
/// compile-time code left in the unit's root scope.
#[tracing::instrument(level = "debug", skip_all, fields(stmts = stmts.len()))]
pub fn resolve_names(stmts: &[Stmt], eval: &Evaluator) -> Result<(), TypeCheckError> {
    let symbols = eval.symbols();
    let globals = symbols
        .scope_symbols(symbols.root())
        .map(|id| symbols.symbol(id).name)
        .collect();
    let mut resolver = Resolver {
        scopes: vec![globals],
        interner: eval.interner(),
    };
    resolver.block(stmts, &[])
}

struct Resolver<'a> {
    scopes: Vec<FxHashSet<Name>>,
    interner: &'a StringInterner,
}

impl Resolver<'_> {
    fn is_bound(&self, name: Name) -> bool {
        self.scopes.iter().rev().any(|scope| scope.contains(&name))
    }

    fn bind(&mut self, name: Name) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name);
        }
    }

    /// Functions are visible throughout their block.
    fn block(&mut self, stmts: &[Stmt], params: &[Param]) -> Result<(), TypeCheckError> {
        let mut scope: FxHashSet<Name> = params.iter().map(|p| p.name).collect();
        scope.extend(stmts.iter().filter_map(|stmt| match &stmt.kind {
            StmtKind::Function(def) => Some(def.name),
            _ => None,
        }));
        self.scopes.push(scope);
        for stmt in stmts {
            self.stmt(stmt)?;
        }
        self.scopes.pop();
        Ok(())
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), TypeCheckError> {
        match &stmt.kind {
            StmtKind::Let { name, init, .. } => {
                self.expr(init)?;
                self.bind(*name);
            }
            StmtKind::Assign { target, value } => {
                self.expr(target)?;
                self.expr(value)?;
            }
            StmtKind::Function(def) => {
                ensure_sufficient_stack(|| self.block(&def.body.stmts, &def.params))?;
            }
            StmtKind::If {
                cond,
                then_block,
                else_block,
            } => {
                self.expr(cond)?;
                self.block(&then_block.stmts, &[])?;
                if let Some(block) = else_block {
                    self.block(&block.stmts, &[])?;
                }
            }
            StmtKind::While { cond, body } => {
                self.expr(cond)?;
                self.block(&body.stmts, &[])?;
            }
            StmtKind::For { var, iter, body } => {
                self.expr(iter)?;
                let param = Param {
                    name: *var,
                    ty: None,
                };
                self.block(&body.stmts, &[param])?;
            }
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.expr(value)?;
                }
            }
            StmtKind::Block(block) => ensure_sufficient_stack(|| self.block(&block.stmts, &[]))?,
            StmtKind::Expr(expr) => self.expr(expr)?,
        }
        Ok(())
    }

    fn expr(&mut self, expr: &Expr) -> Result<(), TypeCheckError> {
        match &expr.kind {
            ExprKind::Ident(name) => {
                if !self.is_bound(*name) {
                    return Err(TypeCheckError::undeclared(
                        self.interner.lookup(*name),
                        expr.span,
                    ));
                }
            }
            ExprKind::Unary { operand, .. } => self.expr(operand)?,
            ExprKind::Binary { left, right, .. } => {
                ensure_sufficient_stack(|| self.expr(left))?;
                self.expr(right)?;
            }
            ExprKind::Call { callee, args } => {
                self.expr(callee)?;
                for arg in args {
                    self.expr(arg)?;
                }
            }
            ExprKind::Field { receiver, .. } => self.expr(receiver)?,
            ExprKind::List(items) => {
                for item in items {
                    self.expr(item)?;
                }
            }
            ExprKind::Lambda { params, body } => self.block(&body.stmts, params)?,
            ExprKind::Number(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::Nil
            | ExprKind::Quote(_) => {}
        }
        Ok(())
    }
}
