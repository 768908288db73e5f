//! Compile-time evaluator.
//!
//! The parser drives the evaluator: a compile-time block runs to completion
//! (declarations, injections and config writes all visible) before the
//! parser consumes the next token. The evaluator in turn calls back into
//! the parser through [`FragmentParser`] whenever a quote is evaluated.
//!
//! Execution state is owned here and lives for one compilation unit:
//! the symbol arena, the hook queues, the config table and the stack of
//! statement buffers that `inject` and `context.*` write into.

mod call;
mod exec;
mod expr;

use std::rc::Rc;

use kiln_ir::{
    Block, DeclKind, Expr, Name, Param, SharedInterner, Span, Stmt, StmtBuffer, StmtKind, Type,
};
use kiln_stack::DepthCounter;

use crate::config::CompileTimeConfig;
use crate::errors::{self, EvalResult};
use crate::hooks::{HookPhase, HookScheduler};
use crate::oracle::{FragmentParser, PrimitivesOnly, TypeOracle};
use crate::symbols::{ScopeId, Symbol, SymbolFlags, SymbolId, SymbolTable};
use crate::value::{Closure, Value};

pub(crate) use exec::Flow;

/// A host declaration recorded for the analysis passes.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub symbol: SymbolId,
    pub kind: DeclarationKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum DeclarationKind {
    /// `let`/`var`/`const` or a parameter.
    Binding {
        decl: Option<DeclKind>,
        annotation: Option<Name>,
        init: Option<Expr>,
    },
    Function {
        params: Vec<Param>,
        ret: Option<Name>,
    },
}

/// Evaluates compile-time code for one compilation unit.
pub struct Evaluator {
    pub(crate) interner: SharedInterner,
    pub(crate) symbols: SymbolTable,
    pub(crate) hooks: HookScheduler,
    pub(crate) config: CompileTimeConfig,
    pub(crate) oracle: Box<dyn TypeOracle>,
    pub(crate) fragments: Option<Rc<dyn FragmentParser>>,
    /// Output buffers of the compile-time blocks being executed, innermost
    /// last. `inject` and `context.*` address the innermost one.
    pub(crate) frames: Vec<StmtBuffer>,
    pub(crate) declarations: Vec<Declaration>,
    pub(crate) calls: DepthCounter,
    gensym_counter: u32,
}

impl Evaluator {
    pub fn new(interner: SharedInterner, config: CompileTimeConfig) -> Self {
        let calls = DepthCounter::new(config.max_call_depth);
        Evaluator {
            interner,
            symbols: SymbolTable::new(),
            hooks: HookScheduler::new(),
            config,
            oracle: Box::new(PrimitivesOnly),
            fragments: None,
            frames: Vec::new(),
            declarations: Vec::new(),
            calls,
            gensym_counter: 0,
        }
    }

    #[must_use]
    pub fn with_oracle(mut self, oracle: Box<dyn TypeOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    pub fn set_fragment_parser(&mut self, parser: Rc<dyn FragmentParser>) {
        self.fragments = Some(parser);
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn hooks(&self) -> &HookScheduler {
        &self.hooks
    }

    pub fn config(&self) -> &CompileTimeConfig {
        &self.config
    }

    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Execute a `#{ ... }` block in the current scope, writing injected
    /// statements into `out` after whatever it already holds.
    #[tracing::instrument(level = "debug", skip_all, fields(stmts = block.stmts.len()))]
    pub fn exec_directive(&mut self, block: &Block, out: &mut StmtBuffer) -> EvalResult<()> {
        self.frames.push(std::mem::take(out));
        let result = self.exec_stmts(&block.stmts);
        if let Some(buffer) = self.frames.pop() {
            *out = buffer;
        }
        result.map(|_| ())
    }

    /// Evaluate a compile-time expression in the current scope.
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        self.eval_expr(expr)
    }

    /// Register a host statement's binding in the current scope.
    ///
    /// A `const` initializer is evaluated now and its value attached to the
    /// symbol; other bindings are declared with an unresolved type for the
    /// inference pass.
    pub fn declare_host(&mut self, stmt: &Stmt) -> EvalResult<()> {
        match &stmt.kind {
            StmtKind::Let {
                name,
                decl,
                ty,
                init,
            } => {
                let mut flags = SymbolFlags::HOST;
                match decl {
                    DeclKind::Let => {}
                    DeclKind::Var => flags |= SymbolFlags::MUTABLE,
                    DeclKind::Const => flags |= SymbolFlags::CONST,
                }
                let mut symbol = Symbol::new(*name, flags, stmt.span);
                if *decl == DeclKind::Const {
                    let value = self.eval_expr(init)?;
                    let value = self.coerce_to_annotation(value, *ty)?;
                    symbol = symbol.with_value(value);
                }
                let id = self.symbols.declare(symbol);
                self.declarations.push(Declaration {
                    symbol: id,
                    kind: DeclarationKind::Binding {
                        decl: Some(*decl),
                        annotation: *ty,
                        init: Some(init.clone()),
                    },
                    span: stmt.span,
                });
            }
            StmtKind::Function(def) => {
                let symbol = Symbol::new(def.name, SymbolFlags::HOST | SymbolFlags::FUNCTION, stmt.span);
                let id = self.symbols.declare(symbol);
                self.declarations.push(Declaration {
                    symbol: id,
                    kind: DeclarationKind::Function {
                        params: def.params.clone(),
                        ret: def.ret,
                    },
                    span: stmt.span,
                });
            }
            _ => {}
        }
        Ok(())
    }

    /// Declare a host function parameter in the current scope.
    pub fn declare_param(&mut self, param: Param, span: Span) {
        let symbol = Symbol::new(param.name, SymbolFlags::HOST | SymbolFlags::PARAM, span);
        let id = self.symbols.declare(symbol);
        self.declarations.push(Declaration {
            symbol: id,
            kind: DeclarationKind::Binding {
                decl: None,
                annotation: param.ty,
                init: None,
            },
            span,
        });
    }

    /// Bind `name` to a compile-time constant in the current scope.
    pub fn bind_const(&mut self, name: Name, value: Value, span: Span) -> SymbolId {
        let ty = self.type_of_value(&value);
        let symbol = Symbol::new(name, SymbolFlags::CONST, span)
            .with_value(value)
            .with_type(ty);
        self.symbols.declare(symbol)
    }

    /// Signal that `phase` completed and run every hook waiting on it, in
    /// registration order. The first failing hook aborts with its error.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn signal_phase(&mut self, phase: HookPhase) -> EvalResult<()> {
        self.hooks.mark_complete(phase);
        while let Some(hook) = self.hooks.take_ready() {
            tracing::debug!(phase = %hook.phase, "run deferred hook");
            self.call_value(&hook.callback, Vec::new(), hook.span)?;
        }
        Ok(())
    }

    /// Elements a `#for` iterates over, bounded by the unroll limit.
    pub fn unroll_items(&mut self, iterable: &Value, span: Span) -> EvalResult<Vec<Value>> {
        let limit = self.config.max_unroll;
        self.iterate(iterable, limit, |count| {
            errors::unroll_limit(count, limit).with_span(span)
        })
    }

    pub(crate) fn name_str(&self, name: Name) -> &'static str {
        self.interner.lookup(name)
    }

    pub(crate) fn fresh_name(&mut self, prefix: &str) -> Name {
        self.gensym_counter += 1;
        self.interner
            .intern(&format!("__{prefix}_{}", self.gensym_counter))
    }

    pub(crate) fn make_closure(&self, name: Option<Name>, params: &[Param], body: &Block) -> Value {
        Value::Function(Rc::new(Closure {
            name,
            params: params.to_vec(),
            body: Rc::new(body.clone()),
            scope: self.symbols.current(),
        }))
    }

    /// Type of a compile-time value, without consulting the oracle.
    pub(crate) fn type_of_value(&self, value: &Value) -> Type {
        use kiln_ir::PrimitiveType;
        match value {
            Value::Nil => Type::Nil,
            Value::Bool(_) => PrimitiveType::Boolean.into(),
            Value::Str(_) => PrimitiveType::String.into(),
            Value::Number(n) if n.is_integer() => n
                .literal_width()
                .and_then(PrimitiveType::from_int_width)
                .map_or(Type::Unresolved, Type::Primitive),
            Value::Number(_) => PrimitiveType::Float64.into(),
            Value::List(_) | Value::Range { .. } => Type::List,
            Value::Function(closure) => Type::Function {
                params: vec![Type::Unresolved; closure.params.len()],
                ret: Box::new(Type::Unresolved),
            },
            Value::Symbol(id) => self.symbols.symbol(*id).ty.clone(),
            _ => Type::Unresolved,
        }
    }

    pub(crate) fn current_scope(&self) -> ScopeId {
        self.symbols.current()
    }
}

#[cfg(test)]
mod tests;
