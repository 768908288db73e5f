//! Calls: closures, macros and builtins.
//!
//! Every call runs a deep copy of the callee's body in a fresh scope. The
//! parent of that scope is what separates the three callables:
//!
//! | callee               | parent scope                      |
//! |----------------------|-----------------------------------|
//! | function             | scope the function was created in |
//! | macro                | caller's current scope            |
//! | hygienic macro       | scope captured by `hygienize`     |

use std::rc::Rc;

use kiln_ir::{AstFragment, Block, Span};
use kiln_stack::DepthCounter;

use crate::errors::{self, EvalResult};
use crate::symbols::{ScopeId, Symbol, SymbolFlags};
use crate::value::{Closure, Macro};
use crate::Value;

use super::{Evaluator, Flow};

impl Evaluator {
    /// The single entry point for invoking compile-time code as a value.
    pub fn call_value(&mut self, callee: &Value, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        match callee {
            Value::Function(closure) => {
                let parent = closure.scope;
                self.call_closure(closure, args, parent, span)
            }
            Value::Macro(mac) => self.invoke_macro(mac, args, span),
            Value::Builtin(builtin) => self.call_builtin(*builtin, args, span),
            Value::Method(method) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(method.receiver.clone());
                full.extend(args);
                self.call_builtin(method.builtin, full, span)
            }
            other => Err(errors::not_callable(other.type_name()).with_span(span)),
        }
    }

    fn invoke_macro(&mut self, mac: &Macro, args: Vec<Value>, span: Span) -> EvalResult<Value> {
        let parent = mac.captured.unwrap_or_else(|| self.symbols.current());
        tracing::debug!(
            hygienic = mac.is_hygienic(),
            args = args.len(),
            "expand macro"
        );
        let result = self.call_closure(&mac.function, args, parent, span)?;
        Ok(detach(result))
    }

    fn call_closure(
        &mut self,
        closure: &Closure,
        args: Vec<Value>,
        parent: ScopeId,
        span: Span,
    ) -> EvalResult<Value> {
        if args.len() != closure.params.len() {
            let name = closure.name.map_or("function", |name| self.name_str(name));
            return Err(errors::arity_mismatch(name, closure.params.len(), args.len()).with_span(span));
        }
        let body = Block::clone(&closure.body);
        let flow = DepthCounter::nested(
            self,
            |eval| &mut eval.calls,
            |eval| eval.run_body(closure, &body, args, parent, span),
        )
        .map_err(|exceeded| errors::recursion_limit(exceeded.limit).with_span(span))??;
        Ok(match flow {
            Flow::Return(value) => value,
            Flow::Normal => Value::Nil,
        })
    }

    fn run_body(
        &mut self,
        closure: &Closure,
        body: &Block,
        args: Vec<Value>,
        parent: ScopeId,
        span: Span,
    ) -> EvalResult<Flow> {
        self.symbols.enter_detached(parent);
        let flow = self.bind_params(closure, args, span).and_then(|()| self.exec_stmts(&body.stmts));
        self.symbols.leave_scope();
        flow
    }

    fn bind_params(&mut self, closure: &Closure, args: Vec<Value>, span: Span) -> EvalResult<()> {
        for (param, arg) in closure.params.iter().zip(args) {
            let arg = self.coerce_to_annotation(arg, param.ty)?;
            let ty = self.type_of_value(&arg);
            self.symbols.declare(
                Symbol::new(param.name, SymbolFlags::PARAM, span)
                    .with_value(arg)
                    .with_type(ty),
            );
        }
        Ok(())
    }
}

/// Give an expansion result its own tree, so no two expansions share nodes.
fn detach(value: Value) -> Value {
    match value {
        Value::Ast(fragment) => Value::Ast(Rc::new(AstFragment::clone(&fragment))),
        other => other,
    }
}
