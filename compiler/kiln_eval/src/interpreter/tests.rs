use super::*;
use crate::test_helpers::Build;
use crate::{EvalErrorKind, HookPhase};
use kiln_ir::{AstFragment, BinaryOp, FunctionDef};
use pretty_assertions::assert_eq;

fn run(eval: &mut Evaluator, stmts: Vec<Stmt>) -> EvalResult<StmtBuffer> {
    let mut out = StmtBuffer::new();
    eval.exec_directive(&Block::new(stmts), &mut out)?;
    Ok(out)
}

fn value_of(b: &Build, eval: &Evaluator, name: &str) -> Value {
    match eval.lookup_value(b.name(name)) {
        Ok(value) => value,
        Err(err) => panic!("`{name}` did not resolve: {err}"),
    }
}

#[test]
fn test_loop_and_assignment() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let body = vec![b.assign("n", b.binary(BinaryOp::Add, b.ident("n"), b.num(2)))];
    let result = run(
        &mut eval,
        vec![
            b.decl(DeclKind::Var, "n", b.num(0)),
            Stmt::synthetic(StmtKind::While {
                cond: b.binary(BinaryOp::Lt, b.ident("n"), b.num(10)),
                body: Block::new(body),
            }),
        ],
    );
    assert!(result.is_ok());
    assert_eq!(value_of(&b, &eval, "n"), Value::int(10));
}

#[test]
fn test_assign_to_let_fails() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let err = run(
        &mut eval,
        vec![
            b.decl(DeclKind::Let, "fixed", b.num(1)),
            b.assign("fixed", b.num(2)),
        ],
    )
    .err();
    assert_eq!(
        err.map(|e| e.message),
        Some("cannot assign to immutable binding `fixed`".to_string())
    );
}

#[test]
fn test_closure_call() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let add = b.lambda(
        &["a", "b"],
        vec![b.ret(b.binary(BinaryOp::Add, b.ident("a"), b.ident("b")))],
    );
    let result = run(
        &mut eval,
        vec![
            b.decl(DeclKind::Const, "add", add),
            b.decl(DeclKind::Const, "r", b.call("add", vec![b.num(2), b.num(3)])),
        ],
    );
    assert!(result.is_ok());
    assert_eq!(value_of(&b, &eval, "r"), Value::int(5));
}

#[test]
fn test_arity_mismatch() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let err = run(
        &mut eval,
        vec![
            b.decl(DeclKind::Const, "one", b.lambda(&["a"], vec![])),
            b.expr(b.call("one", vec![])),
        ],
    )
    .err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::CompileTimeExecution {
            message: "function expects 1 argument, got 0".to_string()
        })
    );
}

#[test]
fn test_calling_a_number_fails() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let err = run(
        &mut eval,
        vec![
            b.decl(DeclKind::Const, "x", b.num(1)),
            b.expr(b.call("x", vec![])),
        ],
    )
    .err();
    assert_eq!(
        err.map(|e| e.message),
        Some("value of type `integer` is not callable".to_string())
    );
}

#[test]
fn test_runaway_recursion_is_an_error() {
    let b = Build::new();
    let mut eval = Evaluator::new(
        b.interner.clone(),
        CompileTimeConfig {
            max_call_depth: 16,
            ..CompileTimeConfig::new()
        },
    );
    let forever = Stmt::synthetic(StmtKind::Function(FunctionDef {
        name: b.name("forever"),
        params: Vec::new(),
        ret: None,
        body: Block::new(vec![b.ret(b.call("forever", vec![]))]),
    }));
    let err = run(&mut eval, vec![forever, b.expr(b.call("forever", vec![]))]).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("compile-time recursion limit of 16 calls exceeded".to_string())
    );
    assert_eq!(eval.calls.depth(), 0);
}

#[test]
fn test_unroll_checks_range_length_first() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let huge = Value::Range {
        start: 0,
        end: i64::MAX,
    };
    let err = eval.unroll_items(&huge, Span::new(3, 8)).err();
    assert_eq!(
        err.map(|e| (e.message, e.span)),
        Some((
            "unrolling 9223372036854775807 iterations exceeds the limit of 4096".to_string(),
            Some(Span::new(3, 8))
        ))
    );

    let full = Value::Range {
        start: i64::MIN,
        end: i64::MAX,
    };
    assert!(eval.unroll_items(&full, Span::DUMMY).is_err());

    let backwards = Value::Range { start: 5, end: 2 };
    assert_eq!(eval.unroll_items(&backwards, Span::DUMMY).ok(), Some(Vec::new()));
}

fn counting_loop(b: &Build, body: Vec<Stmt>) -> Vec<Stmt> {
    vec![
        b.decl(DeclKind::Var, "n", b.num(0)),
        Stmt::synthetic(StmtKind::For {
            var: b.name("i"),
            iter: b.binary(BinaryOp::Range, b.num(0), b.num(i64::MAX)),
            body: Block::new(body),
        }),
    ]
}

#[test]
fn test_for_over_huge_range_counts_iterations() {
    let b = Build::new();
    let mut eval = Evaluator::new(
        b.interner.clone(),
        CompileTimeConfig {
            max_iterations: 5,
            ..CompileTimeConfig::new()
        },
    );
    let step = b.assign("n", b.binary(BinaryOp::Add, b.ident("n"), b.num(1)));
    let err = run(&mut eval, counting_loop(&b, vec![step])).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("compile-time loop exceeded 5 iterations".to_string())
    );
    assert_eq!(value_of(&b, &eval, "n"), Value::int(5));
}

#[test]
fn test_for_over_huge_range_returns_early() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let body = vec![
        b.assign("n", b.binary(BinaryOp::Add, b.ident("n"), b.num(1))),
        b.ret(b.ident("n")),
    ];
    assert!(run(&mut eval, counting_loop(&b, body)).is_ok());
    assert_eq!(value_of(&b, &eval, "n"), Value::int(1));
}

#[test]
fn test_non_hygienic_macro_resolves_at_call_site() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let body = vec![b.ret(b.ident("local"))];
    let define = vec![
        b.decl(DeclKind::Const, "m", b.call("macro", vec![b.lambda(&[], body.clone())])),
        b.decl(DeclKind::Const, "h", b.call("hygienize", vec![b.lambda(&[], body)])),
    ];
    assert!(run(&mut eval, define).is_ok());

    eval.symbols_mut().enter_scope();
    let use_site = vec![
        b.decl(DeclKind::Const, "local", b.num(7)),
        b.decl(DeclKind::Const, "a", b.call("m", vec![])),
    ];
    assert!(run(&mut eval, use_site).is_ok());
    assert_eq!(value_of(&b, &eval, "a"), Value::int(7));

    let err = run(&mut eval, vec![b.expr(b.call("h", vec![]))]).err();
    assert_eq!(
        err.map(|e| e.kind),
        Some(EvalErrorKind::UndeclaredSymbol {
            name: "local".to_string()
        })
    );
}

#[test]
fn test_hygienic_macro_ignores_call_site_shadowing() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let body = vec![b.ret(b.ident("base"))];
    let define = vec![
        b.decl(DeclKind::Const, "base", b.num(1)),
        b.decl(DeclKind::Const, "h", b.call("hygienize", vec![b.lambda(&[], body.clone())])),
        b.decl(DeclKind::Const, "m", b.call("macro", vec![b.lambda(&[], body)])),
    ];
    assert!(run(&mut eval, define).is_ok());

    eval.symbols_mut().enter_scope();
    let use_site = vec![
        b.decl(DeclKind::Const, "base", b.num(100)),
        b.decl(DeclKind::Const, "from_h", b.call("h", vec![])),
        b.decl(DeclKind::Const, "from_m", b.call("m", vec![])),
    ];
    assert!(run(&mut eval, use_site).is_ok());
    assert_eq!(value_of(&b, &eval, "from_h"), Value::int(1));
    assert_eq!(value_of(&b, &eval, "from_m"), Value::int(100));
}

#[test]
fn test_expansions_never_share_nodes() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let stmts = vec![
        b.decl(
            DeclKind::Const,
            "shared",
            b.call("ast.Identifier", vec![b.string("x")]),
        ),
        b.decl(
            DeclKind::Const,
            "m",
            b.call("macro", vec![b.lambda(&[], vec![b.ret(b.ident("shared"))])]),
        ),
        b.decl(DeclKind::Const, "first", b.call("m", vec![])),
        b.decl(DeclKind::Const, "second", b.call("m", vec![])),
    ];
    assert!(run(&mut eval, stmts).is_ok());
    let (Value::Ast(first), Value::Ast(second)) =
        (value_of(&b, &eval, "first"), value_of(&b, &eval, "second"))
    else {
        panic!("macro should return ast values");
    };
    assert_eq!(first, second);
    assert!(!Rc::ptr_eq(&first, &second));
}

#[test]
fn test_inject_emits_and_declares() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let out = run(
        &mut eval,
        vec![b.expr(b.call(
            "inject",
            vec![b.call("ast.Let", vec![b.string("y"), b.num(3)])],
        ))],
    );
    let Ok(out) = out else {
        panic!("inject failed");
    };
    assert_eq!(out.len(), 1);
    assert_eq!(out.as_slice()[0].declared_name(), Some(b.name("y")));
    let id = eval.symbols().lookup(b.name("y"));
    assert!(id.is_some_and(|id| eval.symbols().symbol(id).flags.contains(SymbolFlags::HOST)));
    assert_eq!(eval.declarations().len(), 1);
}

#[test]
fn test_context_edits_previous_statement() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let mut out = StmtBuffer::new();
    out.emit(b.expr(b.num(1)));
    out.emit(b.expr(b.num(2)));
    let block = Block::new(vec![
        b.decl(DeclKind::Const, "old", b.call("context.remove_last", vec![])),
        b.expr(b.call("context.replace_last", vec![b.call("ast.ExprStmt", vec![b.num(9)])])),
    ]);
    assert!(eval.exec_directive(&block, &mut out).is_ok());
    assert_eq!(out.as_slice(), &[b.expr(b.num(9))]);
    assert_eq!(
        value_of(&b, &eval, "old"),
        Value::ast(AstFragment::Stmts(vec![b.expr(b.num(2))]))
    );
}

#[test]
fn test_context_inserts_around_current_statement() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let mut out = StmtBuffer::new();
    out.emit(b.expr(b.num(1)));
    let block = Block::new(vec![
        b.expr(b.call("context.insert_before", vec![b.call("ast.ExprStmt", vec![b.num(0)])])),
        b.expr(b.call("context.insert_after", vec![b.call("ast.ExprStmt", vec![b.num(2)])])),
    ]);
    assert!(eval.exec_directive(&block, &mut out).is_ok());
    assert_eq!(
        out.as_slice(),
        &[b.expr(b.num(0)), b.expr(b.num(1)), b.expr(b.num(2))]
    );
    assert_eq!(out.current(), Some(&b.expr(b.num(2))));

    let mut empty = StmtBuffer::new();
    let before_nothing = Block::new(vec![b.expr(b.call(
        "context.insert_before",
        vec![b.call("ast.ExprStmt", vec![b.num(5)])],
    ))]);
    let err = eval.exec_directive(&before_nothing, &mut empty).err();
    assert_eq!(
        err.map(|e| e.message),
        Some("context.insert_before: no statement at the cursor".to_string())
    );
    assert!(empty.is_empty());
}

#[test]
fn test_staticassert_messages() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let err = run(
        &mut eval,
        vec![b.expr(b.call(
            "staticassert",
            vec![b.boolean(false), b.string("myfail")],
        ))],
    )
    .err();
    assert_eq!(err.map(|e| e.message), Some("myfail".to_string()));

    let err = run(
        &mut eval,
        vec![b.expr(b.call("staticassert", vec![b.boolean(false)]))],
    )
    .err();
    assert_eq!(
        err.map(|e| e.message),
        Some("static assertion failed".to_string())
    );

    let ok = run(
        &mut eval,
        vec![b.expr(b.call("staticassert", vec![b.boolean(true)]))],
    );
    assert!(ok.is_ok());
}

#[test]
fn test_hooks_wait_for_their_phase() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let set_seen = Stmt::synthetic(StmtKind::Assign {
        target: b.field(b.ident("config"), "seen"),
        value: b.num(1),
    });
    let register = vec![
        b.expr(b.call("afterinfer", vec![b.lambda(&[], vec![set_seen])])),
        b.expr(b.call(
            "afteranalyze",
            vec![b.lambda(
                &[],
                vec![b.expr(b.call("staticerror", vec![b.string("late failure")]))],
            )],
        )),
    ];
    assert!(run(&mut eval, register).is_ok());
    assert_eq!(eval.config().get("seen"), Value::Nil);

    assert!(eval.signal_phase(HookPhase::AfterTypeInference).is_ok());
    assert_eq!(eval.config().get("seen"), Value::int(1));

    let err = eval.signal_phase(HookPhase::AfterAnalysis).err();
    assert_eq!(err.map(|e| e.message), Some("late failure".to_string()));
}

#[test]
fn test_declare_host_const_carries_value() {
    let b = Build::new();
    let mut eval = b.evaluator();
    let stmt = b.decl(
        DeclKind::Const,
        "limit",
        b.binary(BinaryOp::Mul, b.num(4), b.num(8)),
    );
    assert!(eval.declare_host(&stmt).is_ok());
    let id = eval.symbols().lookup(b.name("limit"));
    let symbol = id.map(|id| eval.symbols().symbol(id).clone());
    assert_eq!(symbol.as_ref().and_then(|s| s.value.clone()), Some(Value::int(32)));
    assert!(symbol.is_some_and(|s| s.flags.contains(SymbolFlags::CONST | SymbolFlags::HOST)));

    let plain = b.decl(DeclKind::Let, "later", b.num(1));
    assert!(eval.declare_host(&plain).is_ok());
    assert!(matches!(
        eval.lookup_value(b.name("later")),
        Ok(Value::Symbol(_))
    ));
}
