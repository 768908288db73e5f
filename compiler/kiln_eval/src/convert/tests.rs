use super::*;
use crate::test_helpers::Build;
use crate::EvalErrorKind;
use kiln_ir::Span;
use kiln_num::Numeric;
use pretty_assertions::assert_eq;

#[test]
fn test_literals_convert() {
    let b = Build::new();
    let eval = b.evaluator();
    assert_eq!(
        eval.splice_expr(Value::Number(Numeric::Float(150.0))),
        Ok(Expr::synthetic(ExprKind::Number(Numeric::Float(150.0))))
    );
    assert_eq!(eval.splice_expr(Value::str("hi")), Ok(b.string("hi")));
    assert_eq!(eval.splice_expr(Value::Bool(true)), Ok(b.boolean(true)));
}

#[test]
fn test_unconvertible_names_type() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let closure = eval.eval(&b.lambda(&[], vec![]));
    let Ok(closure) = closure else {
        panic!("lambda should evaluate");
    };
    assert_eq!(
        eval.splice_expr(closure).map_err(|e| e.kind),
        Err(EvalErrorKind::UnconvertibleValue {
            type_name: "function".to_string()
        })
    );
}

#[test]
fn test_symbol_splices_as_identifier() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let id = eval.bind_const(b.name("width"), Value::int(8), Span::DUMMY);
    assert_eq!(eval.splice_expr(Value::Symbol(id)), Ok(b.ident("width")));
    assert_eq!(eval.splice_ident(Value::Symbol(id)), Ok(b.name("width")));
}

#[test]
fn test_identifier_splice_validates_text() {
    let b = Build::new();
    let eval = b.evaluator();
    assert_eq!(eval.splice_ident(Value::str("field_3")), Ok(b.name("field_3")));
    assert_eq!(
        eval.splice_ident(Value::str("3field")).map_err(|e| e.message),
        Err("`3field` is not a valid identifier".to_string())
    );
    assert_eq!(
        eval.splice_ident(Value::int(3)).map_err(|e| e.kind),
        Err(EvalErrorKind::UnconvertibleValue {
            type_name: "integer".to_string()
        })
    );
}

#[test]
fn test_statement_splices() {
    let b = Build::new();
    let eval = b.evaluator();
    assert_eq!(eval.splice_stmts(Value::int(1)), Ok(vec![b.expr(b.num(1))]));
    assert_eq!(eval.splice_stmts(Value::Nil), Ok(vec![]));
    let stmts = AstFragment::Stmts(vec![b.expr(b.num(1)), b.expr(b.num(2))]);
    assert_eq!(
        eval.splice_expr(Value::ast(stmts)).map_err(|e| e.kind),
        Err(EvalErrorKind::UnconvertibleValue {
            type_name: "statements".to_string()
        })
    );
}

#[test]
fn test_typeof_plain_values() {
    let b = Build::new();
    let eval = b.evaluator();
    assert_eq!(
        eval.type_of(&Value::int(1)),
        Type::Primitive(kiln_ir::PrimitiveType::Int64)
    );
    assert_eq!(
        eval.type_of(&Value::Number(Numeric::Float(0.5))),
        Type::Primitive(kiln_ir::PrimitiveType::Float64)
    );
    assert_eq!(eval.type_of(&Value::Nil), Type::Nil);
}
