//! Expression evaluation and operators.

use std::cmp::Ordering;
use std::rc::Rc;

use kiln_ir::{BinaryOp, Expr, ExprKind, Name, UnaryOp};
use kiln_num::Numeric;

use crate::builtins::{self, Builtin, Namespace};
use crate::errors::{self, EvalResult};
use crate::value::BoundMethod;
use crate::Value;

use super::Evaluator;

impl Evaluator {
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        kiln_stack::ensure_sufficient_stack(|| self.eval_expr_inner(expr))
            .map_err(|e| e.with_span(expr.span))
    }

    fn eval_expr_inner(&mut self, expr: &Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::Number(n) => Ok(Value::Number(*n)),
            ExprKind::Str(s) => Ok(Value::str(self.name_str(*s))),
            ExprKind::Bool(b) => Ok(Value::Bool(*b)),
            ExprKind::Nil => Ok(Value::Nil),
            ExprKind::Ident(name) => self.lookup_value(*name),
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                match (op, value) {
                    (UnaryOp::Neg, Value::Number(n)) => Ok(Value::Number(n.negate())),
                    (UnaryOp::Not, value) => Ok(Value::Bool(!value.is_truthy())),
                    (UnaryOp::Neg, other) => Err(errors::type_mismatch(
                        "cannot negate",
                        "a number",
                        other.type_name(),
                    )),
                }
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
            ExprKind::Call { callee, args } => {
                let callee = self.eval_expr(callee)?;
                let args = args
                    .iter()
                    .map(|arg| self.eval_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                self.call_value(&callee, args, expr.span)
            }
            ExprKind::Field { receiver, field } => {
                let receiver = self.eval_expr(receiver)?;
                self.field(&receiver, *field)
            }
            ExprKind::List(items) => {
                let items = items
                    .iter()
                    .map(|item| self.eval_expr(item))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::list(items))
            }
            ExprKind::Lambda { params, body } => Ok(self.make_closure(None, params, body)),
            ExprKind::Quote(quote) => {
                let Some(parser) = self.fragments.clone() else {
                    return Err(errors::execution("quoted code cannot be parsed here"));
                };
                let fragment = parser.parse_fragment(quote, self)?;
                Ok(Value::ast(fragment))
            }
        }
    }

    /// Resolve a name: nearest symbol first, then the builtin library.
    ///
    /// A symbol without a compile-time value evaluates to a handle on the
    /// symbol itself, which `typeof` and splices understand.
    pub(crate) fn lookup_value(&self, name: Name) -> EvalResult<Value> {
        if let Some(id) = self.symbols.lookup(name) {
            let symbol = self.symbols.symbol(id);
            return Ok(symbol.value.clone().unwrap_or(Value::Symbol(id)));
        }
        let text = self.name_str(name);
        builtins::global(text).ok_or_else(|| errors::undeclared_symbol(text))
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> EvalResult<Value> {
        match op {
            BinaryOp::And => {
                let left = self.eval_expr(left)?;
                if !left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(right)
            }
            BinaryOp::Or => {
                let left = self.eval_expr(left)?;
                if left.is_truthy() {
                    return Ok(left);
                }
                self.eval_expr(right)
            }
            _ => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                self.binary_values(op, &left, &right)
            }
        }
    }

    pub(crate) fn binary_values(
        &self,
        op: BinaryOp,
        left: &Value,
        right: &Value,
    ) -> EvalResult<Value> {
        match (op, left, right) {
            (BinaryOp::Eq, l, r) => Ok(Value::Bool(l == r)),
            (BinaryOp::NotEq, l, r) => Ok(Value::Bool(l != r)),
            (_, Value::Number(a), Value::Number(b)) => numeric_binary(op, *a, *b),
            (BinaryOp::Add, Value::Str(a), r) => {
                let mut out = a.to_string();
                out.push_str(&self.render(r));
                Ok(Value::Str(Rc::from(out)))
            }
            (BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq, Value::Str(a), Value::Str(b)) => {
                Ok(Value::Bool(compare(op, a.as_ref().cmp(b.as_ref()))))
            }
            (_, l, r) => Err(errors::invalid_operands(
                op.as_symbol(),
                l.type_name(),
                r.type_name(),
            )),
        }
    }

    /// Field access on namespaces, handles and types.
    pub(crate) fn field(&self, receiver: &Value, field: Name) -> EvalResult<Value> {
        let text = self.name_str(field);
        let value = match receiver {
            Value::Namespace(ns) => self.namespace_field(*ns, text),
            Value::Scope(scope) => match text {
                "symbols" => Some(Value::list(
                    self.symbols.scope_symbols(*scope).map(Value::Symbol).collect(),
                )),
                "lookup" => Some(Value::Method(Rc::new(BoundMethod {
                    receiver: receiver.clone(),
                    builtin: Builtin::ScopeLookup,
                }))),
                "parent" => Some(
                    self.symbols
                        .parent(*scope)
                        .map_or(Value::Nil, Value::Scope),
                ),
                _ => None,
            },
            Value::Symbol(id) => {
                let symbol = self.symbols.symbol(*id);
                match text {
                    "name" => Some(Value::str(self.name_str(symbol.name))),
                    "type" => Some(Value::Type(symbol.ty.clone())),
                    "value" => Some(symbol.value.clone().unwrap_or(Value::Nil)),
                    "comptime" => Some(Value::Bool(symbol.is_comptime())),
                    "mutable" => Some(Value::Bool(symbol.is_mutable())),
                    "scope" => Some(Value::Scope(symbol.scope)),
                    _ => None,
                }
            }
            Value::Type(ty) => builtins::type_field(ty, text),
            Value::Ast(fragment) => match text {
                "kind" => Some(Value::str(builtins::fragment_kind(fragment))),
                _ => None,
            },
            _ => None,
        };
        value.ok_or_else(|| errors::no_field(receiver.type_name(), text))
    }

    fn namespace_field(&self, ns: Namespace, field: &str) -> Option<Value> {
        match ns {
            Namespace::Config => Some(self.config.get(field)),
            Namespace::PrimTypes => self.oracle.primitive_type(field).map(Value::Type),
            Namespace::Context => match field {
                "scope" => Some(Value::Scope(self.symbols.current())),
                "root" => Some(Value::Scope(self.symbols.root())),
                _ => Builtin::context_member(field).map(Value::Builtin),
            },
            Namespace::Ast => Builtin::ast_constructor(field).map(Value::Builtin),
        }
    }
}

fn compare(op: BinaryOp, ordering: Ordering) -> bool {
    match op {
        BinaryOp::Lt => ordering == Ordering::Less,
        BinaryOp::LtEq => ordering != Ordering::Greater,
        BinaryOp::Gt => ordering == Ordering::Greater,
        BinaryOp::GtEq => ordering != Ordering::Less,
        _ => false,
    }
}

fn numeric_binary(op: BinaryOp, a: Numeric, b: Numeric) -> EvalResult<Value> {
    let value = match op {
        BinaryOp::Add => a.add(b)?,
        BinaryOp::Sub => a.sub(b)?,
        BinaryOp::Mul => a.mul(b)?,
        BinaryOp::Div => a.div(b)?,
        BinaryOp::Mod => a.rem(b)?,
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            // NaN compares false against everything.
            return Ok(Value::Bool(
                a.cmp_value(&b).is_some_and(|ordering| compare(op, ordering)),
            ));
        }
        BinaryOp::Range => {
            let bound = |n: Numeric| {
                n.to_i64().ok_or_else(|| {
                    errors::type_mismatch("range bound", "an integer within int64", &n.to_string())
                })
            };
            return Ok(Value::Range {
                start: bound(a)?,
                end: bound(b)?,
            });
        }
        BinaryOp::Eq | BinaryOp::NotEq | BinaryOp::And | BinaryOp::Or => {
            return Err(errors::invalid_operands(op.as_symbol(), "number", "number"));
        }
    };
    Ok(Value::Number(value))
}
