//! The library exposed to compile-time code.
//!
//! Globals (`staticassert`, `typeof`, ...) resolve after every symbol, so
//! user declarations shadow them. Namespaces (`ast`, `context`,
//! `primtypes`, `config`) are values whose fields are looked up on access.

use std::rc::Rc;

use kiln_ir::{
    AstFragment, BinaryOp, Block, DeclKind, Expr, ExprKind, FunctionDef, Param, Span, Stmt,
    StmtKind, Type, UnaryOp,
};
use kiln_num::{IntWidth, NarrowMode, Numeric, Radix};

use crate::errors::{self, EvalResult};
use crate::hooks::HookPhase;
use crate::value::Macro;
use crate::{Evaluator, Value};

/// Namespaces reachable by name from compile-time code.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Namespace {
    Ast,
    Context,
    PrimTypes,
    Config,
}

/// Every native function.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Builtin {
    StaticAssert,
    StaticError,
    AfterInfer,
    AfterAnalyze,
    Inject,
    Hygienize,
    Macro,
    TypeOf,
    ToString,
    ToHex,
    ToBin,
    Wrap,
    Narrow,
    Len,
    Print,
    Gensym,

    AstBlock,
    AstCall,
    AstIdentifier,
    AstString,
    AstNumber,
    AstBoolean,
    AstNil,
    AstLet,
    AstVar,
    AstConst,
    AstReturn,
    AstExprStmt,
    AstBinary,
    AstUnary,
    AstField,
    AstList,
    AstIf,
    AstWhile,
    AstAssign,
    AstFunction,

    ContextLast,
    ContextReplaceLast,
    ContextRemoveLast,
    ContextInsertBefore,
    ContextInsertAfter,

    /// `scope.lookup(name)`, receiver first.
    ScopeLookup,
}

const VARIADIC: usize = usize::MAX;

impl Builtin {
    pub fn name(self) -> &'static str {
        match self {
            Builtin::StaticAssert => "staticassert",
            Builtin::StaticError => "staticerror",
            Builtin::AfterInfer => "afterinfer",
            Builtin::AfterAnalyze => "afteranalyze",
            Builtin::Inject => "inject",
            Builtin::Hygienize => "hygienize",
            Builtin::Macro => "macro",
            Builtin::TypeOf => "typeof",
            Builtin::ToString => "tostring",
            Builtin::ToHex => "tohex",
            Builtin::ToBin => "tobin",
            Builtin::Wrap => "wrap",
            Builtin::Narrow => "narrow",
            Builtin::Len => "len",
            Builtin::Print => "print",
            Builtin::Gensym => "gensym",
            Builtin::AstBlock => "ast.Block",
            Builtin::AstCall => "ast.Call",
            Builtin::AstIdentifier => "ast.Identifier",
            Builtin::AstString => "ast.String",
            Builtin::AstNumber => "ast.Number",
            Builtin::AstBoolean => "ast.Boolean",
            Builtin::AstNil => "ast.Nil",
            Builtin::AstLet => "ast.Let",
            Builtin::AstVar => "ast.Var",
            Builtin::AstConst => "ast.Const",
            Builtin::AstReturn => "ast.Return",
            Builtin::AstExprStmt => "ast.ExprStmt",
            Builtin::AstBinary => "ast.Binary",
            Builtin::AstUnary => "ast.Unary",
            Builtin::AstField => "ast.Field",
            Builtin::AstList => "ast.List",
            Builtin::AstIf => "ast.If",
            Builtin::AstWhile => "ast.While",
            Builtin::AstAssign => "ast.Assign",
            Builtin::AstFunction => "ast.Function",
            Builtin::ContextLast => "context.last",
            Builtin::ContextReplaceLast => "context.replace_last",
            Builtin::ContextRemoveLast => "context.remove_last",
            Builtin::ContextInsertBefore => "context.insert_before",
            Builtin::ContextInsertAfter => "context.insert_after",
            Builtin::ScopeLookup => "scope.lookup",
        }
    }

    /// Accepted argument counts, inclusive.
    fn arity(self) -> (usize, usize) {
        match self {
            Builtin::StaticAssert | Builtin::ToHex | Builtin::ToBin => (1, 2),
            Builtin::StaticError | Builtin::Gensym | Builtin::AstReturn => (0, 1),
            Builtin::AfterInfer
            | Builtin::AfterAnalyze
            | Builtin::Hygienize
            | Builtin::Macro
            | Builtin::TypeOf
            | Builtin::ToString
            | Builtin::Len
            | Builtin::AstIdentifier
            | Builtin::AstString
            | Builtin::AstNumber
            | Builtin::AstBoolean
            | Builtin::AstExprStmt
            | Builtin::ContextReplaceLast
            | Builtin::ContextInsertBefore
            | Builtin::ContextInsertAfter => (1, 1),
            Builtin::Wrap
            | Builtin::Narrow
            | Builtin::AstUnary
            | Builtin::AstField
            | Builtin::AstWhile
            | Builtin::AstAssign
            | Builtin::ScopeLookup => (2, 2),
            Builtin::AstLet | Builtin::AstVar | Builtin::AstConst | Builtin::AstIf => (2, 3),
            Builtin::AstBinary => (3, 3),
            Builtin::AstNil | Builtin::ContextLast | Builtin::ContextRemoveLast => (0, 0),
            Builtin::Inject | Builtin::Print | Builtin::AstBlock | Builtin::AstList => (0, VARIADIC),
            Builtin::AstCall => (1, VARIADIC),
            Builtin::AstFunction => (2, VARIADIC),
        }
    }

    pub(crate) fn ast_constructor(field: &str) -> Option<Builtin> {
        Some(match field {
            "Block" => Builtin::AstBlock,
            "Call" => Builtin::AstCall,
            "Identifier" => Builtin::AstIdentifier,
            "String" => Builtin::AstString,
            "Number" => Builtin::AstNumber,
            "Boolean" => Builtin::AstBoolean,
            "Nil" => Builtin::AstNil,
            "Let" => Builtin::AstLet,
            "Var" => Builtin::AstVar,
            "Const" => Builtin::AstConst,
            "Return" => Builtin::AstReturn,
            "ExprStmt" => Builtin::AstExprStmt,
            "Binary" => Builtin::AstBinary,
            "Unary" => Builtin::AstUnary,
            "Field" => Builtin::AstField,
            "List" => Builtin::AstList,
            "If" => Builtin::AstIf,
            "While" => Builtin::AstWhile,
            "Assign" => Builtin::AstAssign,
            "Function" => Builtin::AstFunction,
            _ => return None,
        })
    }

    pub(crate) fn context_member(field: &str) -> Option<Builtin> {
        Some(match field {
            "last" => Builtin::ContextLast,
            "replace_last" => Builtin::ContextReplaceLast,
            "remove_last" => Builtin::ContextRemoveLast,
            "insert_before" => Builtin::ContextInsertBefore,
            "insert_after" => Builtin::ContextInsertAfter,
            _ => return None,
        })
    }
}

/// Global names that resolve when no symbol does.
pub(crate) fn global(name: &str) -> Option<Value> {
    let builtin = match name {
        "ast" => return Some(Value::Namespace(Namespace::Ast)),
        "context" => return Some(Value::Namespace(Namespace::Context)),
        "primtypes" => return Some(Value::Namespace(Namespace::PrimTypes)),
        "config" => return Some(Value::Namespace(Namespace::Config)),
        "staticassert" => Builtin::StaticAssert,
        "staticerror" => Builtin::StaticError,
        "afterinfer" => Builtin::AfterInfer,
        "afteranalyze" => Builtin::AfterAnalyze,
        "inject" => Builtin::Inject,
        "hygienize" => Builtin::Hygienize,
        "macro" => Builtin::Macro,
        "typeof" => Builtin::TypeOf,
        "tostring" => Builtin::ToString,
        "tohex" => Builtin::ToHex,
        "tobin" => Builtin::ToBin,
        "wrap" => Builtin::Wrap,
        "narrow" => Builtin::Narrow,
        "len" => Builtin::Len,
        "print" => Builtin::Print,
        "gensym" => Builtin::Gensym,
        _ => return None,
    };
    Some(Value::Builtin(builtin))
}

/// Fields of a type descriptor (`primtypes.uint8.bits`).
pub(crate) fn type_field(ty: &Type, field: &str) -> Option<Value> {
    let prim = ty.as_primitive();
    Some(match field {
        "name" => Value::str(&ty.to_string()),
        "bits" => Value::int(i64::from(prim.map_or(0, |p| p.bits()))),
        "signed" => Value::Bool(prim.is_some_and(|p| p.is_signed())),
        "is_integer" => Value::Bool(prim.is_some_and(|p| p.is_integer())),
        "is_float" => Value::Bool(prim.is_some_and(|p| p.is_float())),
        "resolved" => Value::Bool(ty.is_resolved()),
        _ => return None,
    })
}

/// Node kind name of a fragment's root.
pub(crate) fn fragment_kind(fragment: &AstFragment) -> &'static str {
    match fragment {
        AstFragment::Expr(expr) => match &expr.kind {
            ExprKind::Number(_) => "Number",
            ExprKind::Str(_) => "String",
            ExprKind::Bool(_) => "Boolean",
            ExprKind::Nil => "Nil",
            ExprKind::Ident(_) => "Identifier",
            ExprKind::Unary { .. } => "Unary",
            ExprKind::Binary { .. } => "Binary",
            ExprKind::Call { .. } => "Call",
            ExprKind::Field { .. } => "Field",
            ExprKind::List(_) => "List",
            ExprKind::Lambda { .. } => "Lambda",
            ExprKind::Quote(_) => "Quote",
        },
        AstFragment::Stmts(stmts) => match stmts.as_slice() {
            [stmt] => match &stmt.kind {
                StmtKind::Let { .. } => "Let",
                StmtKind::Assign { .. } => "Assign",
                StmtKind::Function(_) => "Function",
                StmtKind::If { .. } => "If",
                StmtKind::While { .. } => "While",
                StmtKind::For { .. } => "For",
                StmtKind::Return(_) => "Return",
                StmtKind::Block(_) => "Block",
                StmtKind::Expr(_) => "ExprStmt",
            },
            _ => "Statements",
        },
    }
}

fn binary_op(symbol: &str) -> Option<BinaryOp> {
    Some(match symbol {
        "+" => BinaryOp::Add,
        "-" => BinaryOp::Sub,
        "*" => BinaryOp::Mul,
        "/" => BinaryOp::Div,
        "%" => BinaryOp::Mod,
        "==" => BinaryOp::Eq,
        "!=" => BinaryOp::NotEq,
        "<" => BinaryOp::Lt,
        "<=" => BinaryOp::LtEq,
        ">" => BinaryOp::Gt,
        ">=" => BinaryOp::GtEq,
        "and" => BinaryOp::And,
        "or" => BinaryOp::Or,
        ".." => BinaryOp::Range,
        _ => return None,
    })
}

/// Missing optional arguments read as `nil`.
fn next_arg(args: &mut impl Iterator<Item = Value>) -> Value {
    args.next().unwrap_or(Value::Nil)
}

fn expr_value(kind: ExprKind) -> Value {
    Value::ast(AstFragment::Expr(Expr::synthetic(kind)))
}

fn stmt_value(kind: StmtKind) -> Value {
    Value::ast(AstFragment::Stmts(vec![Stmt::synthetic(kind)]))
}

impl Evaluator {
    pub(crate) fn call_builtin(
        &mut self,
        builtin: Builtin,
        args: Vec<Value>,
        span: Span,
    ) -> EvalResult<Value> {
        let (min, max) = builtin.arity();
        if args.len() < min || args.len() > max {
            let err = if min == max {
                errors::arity_mismatch(builtin.name(), min, args.len())
            } else if max == VARIADIC {
                errors::execution(format!(
                    "{} expects at least {min} arguments, got {}",
                    builtin.name(),
                    args.len()
                ))
            } else {
                errors::execution(format!(
                    "{} expects {min} to {max} arguments, got {}",
                    builtin.name(),
                    args.len()
                ))
            };
            return Err(err.with_span(span));
        }
        self.dispatch(builtin, args, span)
            .map_err(|e| e.with_span(span))
    }

    fn dispatch(&mut self, builtin: Builtin, mut args: Vec<Value>, span: Span) -> EvalResult<Value> {
        match builtin {
            Builtin::StaticAssert => {
                if args[0].is_truthy() {
                    Ok(Value::Nil)
                } else {
                    let message = args.get(1).map(|m| self.render(m));
                    Err(errors::static_assertion(message))
                }
            }
            Builtin::StaticError => {
                let message = args.first().map(|m| self.render(m));
                Err(errors::static_error(message))
            }
            Builtin::AfterInfer | Builtin::AfterAnalyze => {
                let callback = args.swap_remove(0);
                if !callback.is_callable() {
                    return Err(errors::not_callable(callback.type_name()));
                }
                let phase = if builtin == Builtin::AfterInfer {
                    HookPhase::AfterTypeInference
                } else {
                    HookPhase::AfterAnalysis
                };
                self.hooks.register(phase, callback, span);
                Ok(Value::Nil)
            }
            Builtin::Inject => {
                if self.frames.is_empty() {
                    return Err(errors::execution(
                        "inject is only available while a compile-time block runs",
                    ));
                }
                let mut stmts = Vec::new();
                for arg in args {
                    stmts.extend(self.splice_stmts(arg)?);
                }
                tracing::debug!(count = stmts.len(), "inject");
                for stmt in &stmts {
                    self.declare_host(stmt)?;
                }
                if let Some(frame) = self.frames.last_mut() {
                    frame.emit_all(stmts);
                }
                Ok(Value::Nil)
            }
            Builtin::Hygienize | Builtin::Macro => {
                let function = match args.swap_remove(0) {
                    Value::Function(function) => function,
                    Value::Macro(mac) => Rc::clone(&mac.function),
                    other => {
                        return Err(errors::type_mismatch(
                            builtin.name(),
                            "a function",
                            other.type_name(),
                        ))
                    }
                };
                let captured = (builtin == Builtin::Hygienize).then(|| self.current_scope());
                Ok(Value::Macro(Rc::new(Macro { function, captured })))
            }
            Builtin::TypeOf => Ok(Value::Type(self.type_of(&args[0]))),
            Builtin::ToString => Ok(Value::str(&self.render(&args[0]))),
            Builtin::ToHex | Builtin::ToBin => {
                let n = self.number_arg(builtin, &args[0])?;
                let width = match args.get(1) {
                    Some(width) => Some(self.width_arg(builtin, width)?),
                    None => None,
                };
                let radix = if builtin == Builtin::ToHex {
                    Radix::Hexadecimal
                } else {
                    Radix::Binary
                };
                Ok(Value::str(&kiln_num::to_text(&n, radix, width)?))
            }
            Builtin::Wrap | Builtin::Narrow => {
                let n = self.number_arg(builtin, &args[0])?;
                let width = self.width_arg(builtin, &args[1])?;
                let mode = if builtin == Builtin::Wrap {
                    NarrowMode::Wrap
                } else {
                    NarrowMode::Checked
                };
                Ok(Value::Number(n.narrow(width, mode)?))
            }
            Builtin::Len => {
                let len = match &args[0] {
                    Value::List(items) => items.len(),
                    Value::Str(s) => s.chars().count(),
                    Value::Range { start, end } => usize::try_from(end.saturating_sub(*start)).unwrap_or(0),
                    Value::Ast(fragment) => match fragment.as_ref() {
                        AstFragment::Expr(_) => 1,
                        AstFragment::Stmts(stmts) => stmts.len(),
                    },
                    other => {
                        return Err(errors::type_mismatch(
                            "len",
                            "a list, string, range or ast",
                            other.type_name(),
                        ))
                    }
                };
                Ok(Value::int(i64::try_from(len).unwrap_or(i64::MAX)))
            }
            Builtin::Print => {
                let line = args
                    .iter()
                    .map(|arg| self.render(arg))
                    .collect::<Vec<_>>()
                    .join(" ");
                tracing::info!(target: "kiln::print", "{line}");
                Ok(Value::Nil)
            }
            Builtin::Gensym => {
                let prefix = match args.first() {
                    Some(Value::Str(s)) => s.to_string(),
                    Some(other) => self.render(other),
                    None => "g".to_string(),
                };
                let name = self.fresh_name(&prefix);
                Ok(Value::str(self.name_str(name)))
            }
            Builtin::ScopeLookup => {
                let Value::Scope(scope) = args[0] else {
                    return Err(errors::type_mismatch("lookup", "a scope", args[0].type_name()));
                };
                let name = self.splice_ident(args.swap_remove(1))?;
                Ok(self
                    .symbols
                    .lookup_from(scope, name)
                    .map_or(Value::Nil, Value::Symbol))
            }
            Builtin::ContextLast
            | Builtin::ContextReplaceLast
            | Builtin::ContextRemoveLast
            | Builtin::ContextInsertBefore
            | Builtin::ContextInsertAfter => self.context_call(builtin, args),
            _ => self.construct_ast(builtin, args),
        }
    }

    fn context_call(&mut self, builtin: Builtin, args: Vec<Value>) -> EvalResult<Value> {
        let replacement = match args.into_iter().next() {
            Some(value) => {
                let stmts = self.splice_stmts(value)?;
                for stmt in &stmts {
                    self.declare_host(stmt)?;
                }
                stmts
            }
            None => Vec::new(),
        };
        let Some(frame) = self.frames.last_mut() else {
            return Err(errors::execution(format!(
                "{} is only available while a compile-time block runs",
                builtin.name()
            )));
        };
        let cursor = |e: kiln_ir::CursorError| errors::execution(format!("{}: {e}", builtin.name()));
        let single = |stmt: Stmt| Value::ast(AstFragment::Stmts(vec![stmt]));
        match builtin {
            Builtin::ContextLast => Ok(frame.current().cloned().map_or(Value::Nil, single)),
            Builtin::ContextRemoveLast => frame.delete().map(single).map_err(cursor),
            Builtin::ContextReplaceLast => {
                let mut stmts = replacement.into_iter();
                let Some(first) = stmts.next() else {
                    return frame.delete().map(single).map_err(cursor);
                };
                let old = frame.replace(first).map_err(cursor)?;
                frame.emit_all(stmts);
                Ok(single(old))
            }
            Builtin::ContextInsertAfter => {
                for stmt in replacement {
                    frame.insert_after(stmt);
                }
                Ok(Value::Nil)
            }
            _ => {
                for stmt in replacement {
                    frame.insert_before(stmt).map_err(cursor)?;
                }
                Ok(Value::Nil)
            }
        }
    }

    fn construct_ast(&mut self, builtin: Builtin, args: Vec<Value>) -> EvalResult<Value> {
        let mut args = args.into_iter();
        match builtin {
            Builtin::AstBlock => {
                let mut stmts = Vec::new();
                for arg in args.by_ref() {
                    stmts.extend(self.splice_stmts(arg)?);
                }
                Ok(stmt_value(StmtKind::Block(Block::new(stmts))))
            }
            Builtin::AstCall => {
                let callee = self.splice_callee(next_arg(&mut args))?;
                let call_args = args.by_ref()
                    .map(|arg| self.splice_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(expr_value(ExprKind::Call {
                    callee: Box::new(callee),
                    args: call_args,
                }))
            }
            Builtin::AstIdentifier => Ok(expr_value(ExprKind::Ident(self.splice_ident(next_arg(&mut args))?))),
            Builtin::AstString => match next_arg(&mut args) {
                Value::Str(s) => Ok(expr_value(ExprKind::Str(self.interner.intern(&s)))),
                other => Err(errors::type_mismatch("ast.String", "a string", other.type_name())),
            },
            Builtin::AstNumber => {
                let n = match next_arg(&mut args) {
                    Value::Number(n) => n,
                    Value::Str(text) => kiln_num::parse_literal(&text)?,
                    other => {
                        return Err(errors::type_mismatch(
                            "ast.Number",
                            "a number or literal text",
                            other.type_name(),
                        ))
                    }
                };
                Ok(expr_value(ExprKind::Number(n)))
            }
            Builtin::AstBoolean => match next_arg(&mut args) {
                Value::Bool(b) => Ok(expr_value(ExprKind::Bool(b))),
                other => Err(errors::type_mismatch("ast.Boolean", "a boolean", other.type_name())),
            },
            Builtin::AstNil => Ok(expr_value(ExprKind::Nil)),
            Builtin::AstLet | Builtin::AstVar | Builtin::AstConst => {
                let decl = match builtin {
                    Builtin::AstLet => DeclKind::Let,
                    Builtin::AstVar => DeclKind::Var,
                    _ => DeclKind::Const,
                };
                let name = self.splice_ident(next_arg(&mut args))?;
                let init = self.splice_expr(next_arg(&mut args))?;
                let ty = match next_arg(&mut args) {
                    Value::Nil => None,
                    Value::Type(ty) => Some(self.interner.intern(&ty.to_string())),
                    other => Some(self.splice_ident(other)?),
                };
                Ok(stmt_value(StmtKind::Let {
                    name,
                    decl,
                    ty,
                    init,
                }))
            }
            Builtin::AstReturn => {
                let value = match next_arg(&mut args) {
                    Value::Nil => None,
                    other => Some(self.splice_expr(other)?),
                };
                Ok(stmt_value(StmtKind::Return(value)))
            }
            Builtin::AstExprStmt => Ok(stmt_value(StmtKind::Expr(self.splice_expr(next_arg(&mut args))?))),
            Builtin::AstBinary => {
                let op = match next_arg(&mut args) {
                    Value::Str(s) => binary_op(&s)
                        .ok_or_else(|| errors::execution(format!("unknown binary operator `{s}`")))?,
                    other => {
                        return Err(errors::type_mismatch("ast.Binary", "an operator string", other.type_name()))
                    }
                };
                let left = self.splice_expr(next_arg(&mut args))?;
                let right = self.splice_expr(next_arg(&mut args))?;
                Ok(expr_value(ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                }))
            }
            Builtin::AstUnary => {
                let op = match next_arg(&mut args).as_str() {
                    Some("-") => UnaryOp::Neg,
                    Some("not") => UnaryOp::Not,
                    _ => return Err(errors::execution("ast.Unary expects \"-\" or \"not\"")),
                };
                let operand = self.splice_expr(next_arg(&mut args))?;
                Ok(expr_value(ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                }))
            }
            Builtin::AstField => {
                let receiver = self.splice_expr(next_arg(&mut args))?;
                let field = self.splice_ident(next_arg(&mut args))?;
                Ok(expr_value(ExprKind::Field {
                    receiver: Box::new(receiver),
                    field,
                }))
            }
            Builtin::AstList => {
                let items = args.by_ref()
                    .map(|arg| self.splice_expr(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                Ok(expr_value(ExprKind::List(items)))
            }
            Builtin::AstIf => {
                let cond = self.splice_expr(next_arg(&mut args))?;
                let then_block = Block::new(self.splice_stmts(next_arg(&mut args))?);
                let else_block = match next_arg(&mut args) {
                    Value::Nil => None,
                    other => Some(Block::new(self.splice_stmts(other)?)),
                };
                Ok(stmt_value(StmtKind::If {
                    cond,
                    then_block,
                    else_block,
                }))
            }
            Builtin::AstWhile => {
                let cond = self.splice_expr(next_arg(&mut args))?;
                let body = Block::new(self.splice_stmts(next_arg(&mut args))?);
                Ok(stmt_value(StmtKind::While { cond, body }))
            }
            Builtin::AstAssign => {
                let target = self.splice_callee(next_arg(&mut args))?;
                let value = self.splice_expr(next_arg(&mut args))?;
                Ok(stmt_value(StmtKind::Assign { target, value }))
            }
            Builtin::AstFunction => {
                let name = self.splice_ident(next_arg(&mut args))?;
                let params = match next_arg(&mut args) {
                    Value::List(items) => items
                        .iter()
                        .map(|item| {
                            self.splice_ident(item.clone())
                                .map(|name| Param { name, ty: None })
                        })
                        .collect::<EvalResult<Vec<_>>>()?,
                    Value::Nil => Vec::new(),
                    other => {
                        return Err(errors::type_mismatch(
                            "ast.Function",
                            "a list of parameter names",
                            other.type_name(),
                        ))
                    }
                };
                let mut body = Vec::new();
                for arg in args.by_ref() {
                    body.extend(self.splice_stmts(arg)?);
                }
                Ok(stmt_value(StmtKind::Function(FunctionDef {
                    name,
                    params,
                    ret: None,
                    body: Block::new(body),
                })))
            }
            other => Err(errors::execution(format!(
                "{} is not an AST constructor",
                other.name()
            ))),
        }
    }

    fn number_arg(&self, builtin: Builtin, value: &Value) -> EvalResult<Numeric> {
        value
            .as_number()
            .ok_or_else(|| errors::type_mismatch(builtin.name(), "a number", value.type_name()))
    }

    /// A width given as a bit count or an integer type descriptor.
    fn width_arg(&self, builtin: Builtin, value: &Value) -> EvalResult<IntWidth> {
        let width = match value {
            Value::Type(ty) => ty.as_primitive().and_then(kiln_ir::PrimitiveType::int_width),
            Value::Number(n) => n
                .to_i64()
                .and_then(|bits| u32::try_from(bits).ok())
                .and_then(|bits| IntWidth::new(bits, true)),
            _ => None,
        };
        width.ok_or_else(|| {
            errors::type_mismatch(
                builtin.name(),
                "an integer type or a bit width of 8, 16, 32, 64 or 128",
                &self.render(value),
            )
        })
    }
}

#[cfg(test)]
mod tests;
