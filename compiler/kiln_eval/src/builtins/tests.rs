use super::*;
use crate::test_helpers::Build;
use crate::EvalErrorKind;
use kiln_ir::PrimitiveType;
use pretty_assertions::assert_eq;

fn eval_one(b: &Build, expr: Expr) -> EvalResult<Value> {
    let mut eval = b.evaluator();
    eval.eval(&expr)
}

#[test]
fn test_numeric_rendering() {
    let b = Build::new();
    assert_eq!(
        eval_one(&b, b.call("tohex", vec![b.num(255)])),
        Ok(Value::str("ff"))
    );
    assert_eq!(
        eval_one(&b, b.call("tohex", vec![b.num(-1), b.num(16)])),
        Ok(Value::str("ffff"))
    );
    assert_eq!(
        eval_one(&b, b.call("tobin", vec![b.num(5)])),
        Ok(Value::str("101"))
    );
}

#[test]
fn test_wrap_versus_narrow() {
    let b = Build::new();
    let uint8 = b.field(b.ident("primtypes"), "uint8");
    assert_eq!(
        eval_one(&b, b.call("wrap", vec![b.num(300), uint8.clone()])),
        Ok(Value::int(44))
    );
    let err = eval_one(&b, b.call("narrow", vec![b.num(300), uint8])).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::Overflow {
            value: "300".to_string(),
            target: "uint8".to_string()
        })
    );
}

#[test]
fn test_primtype_descriptors() {
    let b = Build::new();
    let int16 = || b.field(b.ident("primtypes"), "int16");
    assert_eq!(
        eval_one(&b, int16()),
        Ok(Value::Type(PrimitiveType::Int16.into()))
    );
    assert_eq!(eval_one(&b, b.field(int16(), "bits")), Ok(Value::int(16)));
    assert_eq!(eval_one(&b, b.field(int16(), "signed")), Ok(Value::Bool(true)));
    assert_eq!(
        eval_one(&b, b.field(int16(), "name")),
        Ok(Value::str("int16"))
    );
    let err = eval_one(&b, b.field(b.ident("primtypes"), "int7")).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("no field `int7` on value of type `namespace`".to_string())
    );
}

#[test]
fn test_ast_constructors_build_nodes() {
    let b = Build::new();
    let call = eval_one(
        &b,
        b.call(
            "ast.Call",
            vec![b.string("emit"), b.num(1), b.string("two")],
        ),
    );
    let expected = Expr::synthetic(ExprKind::Call {
        callee: Box::new(b.ident("emit")),
        args: vec![b.num(1), b.string("two")],
    });
    assert_eq!(call, Ok(Value::ast(AstFragment::Expr(expected))));

    let number = eval_one(&b, b.call("ast.Number", vec![b.string("0x10")]));
    assert_eq!(number, Ok(Value::ast(AstFragment::Expr(b.num(16)))));

    let kind = eval_one(
        &b,
        b.field(b.call("ast.Return", vec![b.num(0)]), "kind"),
    );
    assert_eq!(kind, Ok(Value::str("Return")));
}

#[test]
fn test_ast_binary_rejects_unknown_operator() {
    let b = Build::new();
    let err = eval_one(
        &b,
        b.call("ast.Binary", vec![b.string("**"), b.num(1), b.num(2)]),
    )
    .err();
    assert_eq!(
        err.map(|e| e.message),
        Some("unknown binary operator `**`".to_string())
    );
}

#[test]
fn test_builtin_arity() {
    let b = Build::new();
    let err = eval_one(&b, b.call("wrap", vec![b.num(1)])).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("wrap expects 2 arguments, got 1".to_string())
    );
    let err = eval_one(&b, b.call("staticassert", vec![])).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("staticassert expects 1 to 2 arguments, got 0".to_string())
    );
}

#[test]
fn test_staticerror_default() {
    let b = Build::new();
    let err = eval_one(&b, b.call("staticerror", vec![])).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::StaticError {
            message: "static error!".to_string()
        })
    );
}

#[test]
fn test_gensym_is_fresh() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let first = eval.eval(&b.call("gensym", vec![b.string("tmp")]));
    let second = eval.eval(&b.call("gensym", vec![b.string("tmp")]));
    assert_eq!(first, Ok(Value::str("__tmp_1")));
    assert_eq!(second, Ok(Value::str("__tmp_2")));
}

#[test]
fn test_inject_outside_block_fails() {
    let b = Build::new();
    let err = eval_one(&b, b.call("inject", vec![b.call("ast.Nil", vec![])])).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("inject is only available while a compile-time block runs".to_string())
    );
}

#[test]
fn test_scope_lookup() {
    let b = Build::new();
    let mut eval = b.evaluator();
    eval.bind_const(b.name("answer"), Value::int(42), Span::DUMMY);
    let lookup = |name: &str| {
        b.call_on(
            b.field(b.ident("context"), "scope"),
            "lookup",
            vec![b.string(name)],
        )
    };
    let found = eval.eval(&b.field(lookup("answer"), "value"));
    assert_eq!(found, Ok(Value::int(42)));
    assert_eq!(eval.eval(&lookup("missing")), Ok(Value::Nil));
}
