use std::rc::Rc;

use kiln_diagnostic::ErrorCode;
use kiln_eval::{CompileTimeConfig, Evaluator};
use kiln_ir::{DeclKind, ExprKind, SharedInterner, Stmt, StmtKind};
use kiln_num::Numeric;
use pretty_assertions::assert_eq;

use super::*;

fn parse(source: &str) -> (Result<Vec<Stmt>, ParseError>, SharedInterner) {
    let interner = SharedInterner::new();
    let tokens =
        kiln_lexer::lex(source, &interner).unwrap_or_else(|err| panic!("lex failed: {err}"));
    let mut eval = Evaluator::new(interner.clone(), CompileTimeConfig::new());
    let result = parse_unit(Rc::new(tokens), &mut eval);
    (result, interner)
}

fn parse_ok(source: &str) -> (Vec<Stmt>, SharedInterner) {
    let (result, interner) = parse(source);
    match result {
        Ok(stmts) => (stmts, interner),
        Err(err) => panic!("unexpected parse error: {err}"),
    }
}

fn parse_err(source: &str) -> ParseError {
    match parse(source).0 {
        Ok(stmts) => panic!("expected an error, parsed {stmts:?}"),
        Err(err) => err,
    }
}

/// Names bound by `let`/`fn`, looking through emitted blocks.
fn bound_names(stmts: &[Stmt], interner: &SharedInterner) -> Vec<String> {
    let mut names = Vec::new();
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Block(block) => names.extend(bound_names(&block.stmts, interner)),
            _ => names.extend(stmt.declared_name().map(|n| interner.lookup(n).to_string())),
        }
    }
    names
}

fn init_of<'a>(stmts: &'a [Stmt], name: &str, interner: &SharedInterner) -> &'a ExprKind {
    for stmt in stmts {
        if let StmtKind::Let { name: n, init, .. } = &stmt.kind {
            if interner.lookup(*n) == name {
                return &init.kind;
            }
        }
    }
    panic!("no binding `{name}`")
}

#[test]
fn test_host_statements() {
    let (stmts, interner) = parse_ok(
        "let a: int32 = 1 + 2 * 3;
         var b = a;
         fn add(x: int32, y) -> int32 { return x + y; }
         if a > 1 { b = 2; } else if a < 0 { b = 3; } else { b = 4; }
         while b < 10 { b = b + 1; }
         for i in 0..3 { print(i); }",
    );
    assert_eq!(stmts.len(), 6);
    assert_eq!(bound_names(&stmts, &interner), vec!["a", "b", "add"]);
    let StmtKind::Let { decl, ty, init, .. } = &stmts[0].kind else {
        panic!("expected let, got {:?}", stmts[0]);
    };
    assert_eq!(*decl, DeclKind::Let);
    assert_eq!(ty.map(|t| interner.lookup(t)), Some("int32"));
    let ExprKind::Binary { op, .. } = &init.kind else {
        panic!("expected binary init");
    };
    assert_eq!(*op, kiln_ir::BinaryOp::Add);
}

#[test]
fn test_negative_literal_is_folded() {
    let (stmts, interner) = parse_ok("let m = -128;");
    assert_eq!(
        init_of(&stmts, "m", &interner),
        &ExprKind::Number(Numeric::from(-128i64))
    );
}

#[test]
fn test_directive_injects_at_its_position() {
    let (stmts, interner) = parse_ok(
        "let a = 1;
         #{ inject(quote { let injected = 2; }); }
         let b = 3;",
    );
    assert_eq!(bound_names(&stmts, &interner), vec!["a", "injected", "b"]);
}

#[test]
fn test_if_parses_only_the_selected_branch() {
    let (stmts, interner) = parse_ok(
        "#if false { #{ staticerror(\"not taken\"); } }
         #else #if 1 + 1 == 2 { let second = 1; }
         #else { #{ staticerror(\"not taken either\"); } }",
    );
    assert_eq!(bound_names(&stmts, &interner), vec!["second"]);
}

#[test]
fn test_for_unrolls_into_blocks() {
    let (stmts, interner) = parse_ok("#for i in 0..3 { let #| \"v\" + i |# = #[ i * 10 ]#; }");
    assert_eq!(stmts.len(), 3);
    assert!(stmts.iter().all(|s| matches!(s.kind, StmtKind::Block(_))));
    assert_eq!(bound_names(&stmts, &interner), vec!["v0", "v1", "v2"]);
    let StmtKind::Block(last) = &stmts[2].kind else {
        panic!("expected block");
    };
    assert_eq!(
        init_of(&last.stmts, "v2", &interner),
        &ExprKind::Number(Numeric::from(20i64))
    );
}

#[test]
fn test_const_is_visible_to_later_splices() {
    let (stmts, interner) = parse_ok("const answer = 41; let copy = #[ answer + 1 ]#;");
    assert_eq!(
        init_of(&stmts, "copy", &interner),
        &ExprKind::Number(Numeric::from(42i64))
    );
}

#[test]
fn test_splice_starting_an_assignment() {
    let (stmts, interner) = parse_ok("var x = 1; #[ quote(x) ]# = 2;");
    let StmtKind::Assign { target, .. } = &stmts[1].kind else {
        panic!("expected assignment, got {:?}", stmts[1]);
    };
    assert_eq!(target.kind, ExprKind::Ident(interner.intern("x")));
}

#[test]
fn test_statement_splice() {
    let (stmts, interner) = parse_ok(
        "#{ let decl = quote { let spliced = 1; let other = 2; }; }
         #[ decl ]#",
    );
    assert_eq!(bound_names(&stmts, &interner), vec!["spliced", "other"]);
}

#[test]
fn test_preprocessor_inside_compile_time_code() {
    assert_eq!(parse_err("#{ #if true { } }").code(), ErrorCode::E1005);
    assert_eq!(parse_err("#{ let a = #[ 1 ]#; }").code(), ErrorCode::E1005);
    assert_eq!(parse_err("let q = quote { };").code(), ErrorCode::E1005);
    assert_eq!(parse_err("let e = #if true { };").code(), ErrorCode::E1005);
}

#[test]
fn test_syntax_errors() {
    assert_eq!(parse_err("let = 1;").code(), ErrorCode::E1004);
    assert_eq!(parse_err("let a = ;").code(), ErrorCode::E1002);
    assert_eq!(parse_err("let a = 1").code(), ErrorCode::E1001);
    assert_eq!(parse_err("#if true { let a = 1;").code(), ErrorCode::E1003);
    assert_eq!(parse_err("#else { }").code(), ErrorCode::E1001);
    assert_eq!(parse_err("1 + 2 = 3;").code(), ErrorCode::E1001);
    assert_eq!(parse_err("let a = 0b102;").code(), ErrorCode::E0003);
}

#[test]
fn test_compile_time_failures_surface_verbatim() {
    let err = parse_err("#{ staticassert(1 == 2, \"myfail\"); }");
    assert_eq!(err.code(), ErrorCode::E6001);
    assert_eq!(err.to_diagnostic().message, "myfail");
    assert!(err.span().is_some());

    let err = parse_err("#{ staticassert(false); }");
    assert_eq!(err.to_diagnostic().message, "static assertion failed");
}

#[test]
fn test_syntax_error_in_quote_reaches_evaluator() {
    let err = parse_err("#{ inject(quote { let = 1; }); }");
    assert_eq!(err.code(), ErrorCode::E1004);
}
