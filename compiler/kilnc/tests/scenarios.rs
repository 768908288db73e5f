//! End-to-end scenarios: whole units through every phase.

use kiln_diagnostic::{Diagnostic, ErrorCode};
use kiln_eval::{ConfigValue, Value};
use kiln_ir::{ExprKind, PrimitiveType, Stmt, StmtKind, Type};
use kiln_num::Numeric;
use kilnc::{compile_unit, CompiledUnit, UnitOptions};
use pretty_assertions::assert_eq;

fn compile(source: &str) -> CompiledUnit {
    compile_with(source, &UnitOptions::default())
}

fn compile_with(source: &str, options: &UnitOptions) -> CompiledUnit {
    match compile_unit(source, options) {
        Ok(unit) => unit,
        Err(diag) => panic!("unexpected failure:\n{}", diag.render("test.kn", source)),
    }
}

fn fail(source: &str) -> Diagnostic {
    fail_with(source, &UnitOptions::default())
}

fn fail_with(source: &str, options: &UnitOptions) -> Diagnostic {
    match compile_unit(source, options) {
        Ok(unit) => panic!("expected failure, got {} statements", unit.stmts.len()),
        Err(diag) => diag,
    }
}

/// `name = <literal>` for each `let` in `stmts`.
fn literal_lets(unit: &CompiledUnit, stmts: &[Stmt]) -> Vec<(String, Numeric)> {
    stmts
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Let {
                name,
                init:
                    kiln_ir::Expr {
                        kind: ExprKind::Number(n),
                        ..
                    },
                ..
            } => Some((unit.interner().lookup(*name).to_string(), *n)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_staticassert_messages_are_verbatim() {
    let diag = fail("#{ staticassert(false, \"myfail\"); }");
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.message, "myfail");

    let diag = fail("#{ staticassert(false); }");
    assert_eq!(diag.message, "static assertion failed");

    let diag = fail("#{ staticerror(\"unsupported target\"); }");
    assert_eq!(diag.code, ErrorCode::E6002);
    assert_eq!(diag.message, "unsupported target");
}

#[test]
fn test_unrolled_loop_with_branch() {
    let unit = compile(
        "#for i in 0..3 {
             #if i % 2 == 0 { let even = #[ i ]#; } #else { let odd = #[ i ]#; }
         }",
    );
    assert_eq!(unit.stmts.len(), 3);
    let blocks: Vec<_> = unit
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Block(block) => literal_lets(&unit, &block.stmts),
            other => panic!("expected a block, got {other:?}"),
        })
        .collect();
    assert_eq!(
        blocks,
        vec![
            vec![("even".to_string(), Numeric::from(0i64))],
            vec![("odd".to_string(), Numeric::from(1i64))],
            vec![("even".to_string(), Numeric::from(2i64))],
        ]
    );
}

#[test]
fn test_macro_hygiene() {
    let definitions = "#{
        let m = macro(fn() { return local; });
        let h = hygienize(fn() { return local; });
    }";

    let unit = compile(&format!(
        "{definitions}
         fn user() {{ #{{ let local = 7; config.result = m(); }} }}"
    ));
    assert_eq!(unit.config("result"), Value::int(7));

    let diag = fail(&format!(
        "{definitions}
         fn user() {{ #{{ let local = 7; config.result = h(); }} }}"
    ));
    assert_eq!(diag.code, ErrorCode::E2002);
    assert_eq!(diag.message, "undeclared symbol `local`");
}

#[test]
fn test_hygienic_macro_keeps_definition_binding() {
    let unit = compile(
        "#{
             let base = 1;
             let h = hygienize(fn(x) { return base + x; });
         }
         { #{ let base = 100; config.sum = h(10); } }",
    );
    assert_eq!(unit.config("sum"), Value::int(11));
}

#[test]
fn test_macro_expansions_are_independent() {
    let unit = compile(
        "#{ let make = macro(fn() { return quote(1 + 2); }); }
         let a = #[ make() ]#;
         let b = #[ make() ]#;",
    );
    let inits: Vec<_> = unit
        .stmts
        .iter()
        .filter_map(|stmt| match &stmt.kind {
            StmtKind::Let { init, .. } => Some(init.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(inits.len(), 2);
    assert_eq!(inits[0], inits[1]);
    assert!(matches!(inits[0].kind, ExprKind::Binary { .. }));
}

#[test]
fn test_afterinfer_sees_final_type() {
    let unit = compile(
        "let s = 5;
         #{
             config.before = tostring(typeof(s));
             afterinfer(fn() { config.seen = tostring(typeof(s)); });
         }",
    );
    assert_eq!(unit.config("before"), Value::str("<unresolved>"));
    assert_eq!(unit.config("seen"), Value::str("int64"));
    assert_eq!(unit.type_of("s"), Some(Type::Primitive(PrimitiveType::Int64)));
}

#[test]
fn test_hook_failure_aborts_unit() {
    let diag = fail("#{ afteranalyze(fn() { staticerror(\"late failure\"); }); }");
    assert_eq!(diag.code, ErrorCode::E6002);
    assert_eq!(diag.message, "late failure");
}

#[test]
fn test_float_literal_parse() {
    let unit = compile("const f = 1.5e2; let g = #[ f ]#;");
    let symbols = unit.symbols();
    let f = unit.interner().intern("f");
    let id = symbols
        .lookup_from(symbols.root(), f)
        .unwrap_or_else(|| panic!("`f` should be declared"));
    assert_eq!(
        symbols.symbol(id).value,
        Some(Value::Number(Numeric::Float(150.0)))
    );
    assert_eq!(unit.type_of("g"), Some(Type::Primitive(PrimitiveType::Float64)));
}

#[test]
fn test_narrowing() {
    let diag = fail("let x: uint8 = 256;");
    assert_eq!(diag.code, ErrorCode::E2001);
    assert_eq!(diag.message, "value 256 does not fit in uint8");

    assert_eq!(fail("const c: int8 = 128;").code, ErrorCode::E2001);

    let unit = compile("#{ config.w = wrap(300, primtypes.uint8); config.h = tohex(255); }");
    assert_eq!(unit.config("w"), Value::int(44));
    assert_eq!(unit.config("h"), Value::str("ff"));
}

#[test]
fn test_config_seeds_and_limits() {
    let options = UnitOptions::new("wasm.kn").with_config("target", ConfigValue::Str("wasm".into()));
    let unit = compile_with(
        "#if config.target == \"wasm\" { let wasm_only = 1; } #else { let native = 1; }",
        &options,
    );
    assert_eq!(literal_lets(&unit, &unit.stmts).len(), 1);
    assert!(unit.type_of("wasm_only").is_some());

    let mut options = UnitOptions::default();
    options.max_unroll = 4;
    let diag = fail_with("#for i in 0..10 { }", &options);
    assert_eq!(diag.code, ErrorCode::E6004);

    options.max_call_depth = 32;
    let diag = fail_with("#{ fn down(n) { return down(n + 1); } down(0); }", &options);
    assert_eq!(diag.code, ErrorCode::E6004);
    assert_eq!(
        diag.message,
        "compile-time recursion limit of 32 calls exceeded"
    );
}

#[test]
fn test_huge_ranges_stay_within_limits() {
    let diag = fail("#for i in 0..9223372036854775807 { let x = 1; }");
    assert_eq!(diag.code, ErrorCode::E6004);
    assert_eq!(
        diag.message,
        "unrolling 9223372036854775807 iterations exceeds the limit of 4096"
    );

    let unit = compile("#{ for i in 0..9223372036854775807 { return; } }");
    assert!(unit.stmts.is_empty());

    let mut options = UnitOptions::default();
    options.max_iterations = 10;
    let diag = fail_with(
        "#{ var n = 0; for i in 0..9223372036854775807 { n = n + 1; } }",
        &options,
    );
    assert_eq!(diag.code, ErrorCode::E6004);
    assert_eq!(diag.message, "compile-time loop exceeded 10 iterations");
}

#[test]
fn test_undeclared_host_name() {
    let diag = fail("let a = 1; let b = a + nowhere;");
    assert_eq!(diag.code, ErrorCode::E2002);
    assert_eq!(diag.message, "undeclared symbol `nowhere`");
}

#[test]
fn test_generated_declarations() {
    let unit = compile(
        "#for name in [\"alpha\", \"beta\"] {
             fn #| \"get_\" + name |#() -> int32 { return 1; }
             let #| \"x_\" + name |# = #| \"get_\" + name |#();
         }",
    );
    let names: Vec<Vec<&str>> = unit
        .stmts
        .iter()
        .map(|stmt| match &stmt.kind {
            StmtKind::Block(block) => block
                .stmts
                .iter()
                .filter_map(Stmt::declared_name)
                .map(|name| unit.interner().lookup(name))
                .collect(),
            other => panic!("expected a block, got {other:?}"),
        })
        .collect();
    assert_eq!(
        names,
        vec![vec!["get_alpha", "x_alpha"], vec!["get_beta", "x_beta"]]
    );

    let x_beta = unit.interner().intern("x_beta");
    let ty = unit
        .symbols()
        .iter()
        .find(|(_, symbol)| symbol.name == x_beta)
        .map(|(_, symbol)| symbol.ty.clone());
    assert_eq!(ty, Some(Type::Primitive(PrimitiveType::Int32)));
}

#[test]
fn test_lex_error_diagnostic() {
    let diag = fail("let s = \"open");
    assert_eq!(diag.code, ErrorCode::E0001);
}
