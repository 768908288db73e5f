use std::rc::Rc;

use kiln_diagnostic::ErrorCode;
use kiln_eval::{CompileTimeConfig, Evaluator};
use kiln_ir::{PrimitiveType, SharedInterner, Stmt, Type};
use pretty_assertions::assert_eq;

use super::*;

struct Unit {
    stmts: Vec<Stmt>,
    eval: Evaluator,
}

impl Unit {
    fn parse(source: &str) -> Self {
        let interner = SharedInterner::new();
        let tokens =
            kiln_lexer::lex(source, &interner).unwrap_or_else(|err| panic!("lex failed: {err}"));
        let mut eval = Evaluator::new(interner, CompileTimeConfig::new())
            .with_oracle(Box::new(ExprTyper));
        let stmts = kiln_parse::parse_unit(Rc::new(tokens), &mut eval)
            .unwrap_or_else(|err| panic!("parse failed: {err}"));
        Unit { stmts, eval }
    }

    fn type_of(&self, name: &str) -> Type {
        let name = self.eval.interner().intern(name);
        let symbols = self.eval.symbols();
        symbols
            .iter()
            .filter(|(_, symbol)| symbol.name == name)
            .last()
            .map(|(_, symbol)| symbol.ty.clone())
            .unwrap_or_else(|| panic!("no symbol {name:?}"))
    }
}

fn infer_err(source: &str) -> TypeCheckError {
    let mut unit = Unit::parse(source);
    match infer_declarations(&mut unit.eval) {
        Ok(()) => panic!("expected a type error for {source:?}"),
        Err(err) => err,
    }
}

#[test]
fn test_infers_from_initializers() {
    let mut unit = Unit::parse(
        "let a = 1;
         let b = a + 2;
         var f = 1.5;
         let s = \"text\" + a;
         let big = 0xFFFF_FFFF_FFFF_FFFF_FF;
         let n: uint8 = 200;
         fn twice(x: int32) -> int32 { return x * 2; }
         let r = twice(4);",
    );
    assert_eq!(unit.type_of("b"), Type::Unresolved);
    infer_declarations(&mut unit.eval).unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(unit.type_of("a"), Type::Primitive(PrimitiveType::Int64));
    assert_eq!(unit.type_of("b"), Type::Primitive(PrimitiveType::Int64));
    assert_eq!(unit.type_of("f"), Type::Primitive(PrimitiveType::Float64));
    assert_eq!(unit.type_of("s"), Type::Primitive(PrimitiveType::String));
    assert_eq!(unit.type_of("big"), Type::Primitive(PrimitiveType::Int128));
    assert_eq!(unit.type_of("n"), Type::Primitive(PrimitiveType::UInt8));
    assert_eq!(unit.type_of("x"), Type::Primitive(PrimitiveType::Int32));
    assert_eq!(unit.type_of("r"), Type::Primitive(PrimitiveType::Int32));
    assert_eq!(unit.type_of("twice").to_string(), "fn(int32) -> int32");
}

#[test]
fn test_declared_width_is_checked() {
    let err = infer_err("let x: uint8 = 300;");
    assert_eq!(err.code, ErrorCode::E2001);
    assert_eq!(err.message, "value 300 does not fit in uint8");

    assert_eq!(infer_err("let y: int8 = -129;").code, ErrorCode::E2001);
    assert_eq!(
        infer_err("let wide = 0x1_0000_0000_0000_0000_0000_0000_0000_0000;").code,
        ErrorCode::E2001
    );
}

#[test]
fn test_annotation_errors() {
    assert_eq!(infer_err("let w: widget = 1;").code, ErrorCode::E2003);
    assert_eq!(infer_err("let s: int32 = \"no\";").code, ErrorCode::E2004);
    assert_eq!(infer_err("let t: boolean = 1;").code, ErrorCode::E2004);
}

#[test]
fn test_resolve_names() {
    let unit = Unit::parse(
        "fn even(n) { if n == 0 { return true; } return odd(n - 1); }
         fn odd(n) { if n == 0 { return false; } return even(n - 1); }
         for i in 0..3 { let sq = i * i; }
         let apply = fn(v) { return v; };
         #{ let helper = 1; }
         let use_helper = helper;",
    );
    assert_eq!(resolve_names(&unit.stmts, &unit.eval), Ok(()));
}

#[test]
fn test_unresolved_name() {
    let unit = Unit::parse("{ let inner = 1; } let outer = inner;");
    let err = resolve_names(&unit.stmts, &unit.eval).err();
    assert_eq!(err.as_ref().map(|e| e.code), Some(ErrorCode::E2002));
    assert_eq!(
        err.map(|e| e.message),
        Some("undeclared symbol `inner`".to_string())
    );
}
