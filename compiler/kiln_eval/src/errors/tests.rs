use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_messages() {
    assert_eq!(static_assertion(None).message, "static assertion failed");
    assert_eq!(static_error(None).message, "static error!");
}

#[test]
fn test_user_message_is_verbatim() {
    let err = static_assertion(Some("myfail".to_string())).with_span(Span::new(4, 20));
    let diag = err.to_diagnostic();
    assert_eq!(diag.message, "myfail");
    assert_eq!(diag.code, ErrorCode::E6001);
    assert_eq!(diag.primary_span(), Some(Span::new(4, 20)));
}

#[test]
fn test_innermost_span_wins() {
    let err = undeclared_symbol("helper")
        .with_span(Span::new(10, 16))
        .with_span(Span::new(0, 40));
    assert_eq!(err.span, Some(Span::new(10, 16)));
    assert_eq!(err.message, "undeclared symbol `helper`");
}

#[test]
fn test_num_error_conversion() {
    let err: EvalError = NumError::Overflow {
        value: "300".to_string(),
        target: "uint8".to_string(),
    }
    .into();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.message, "value 300 does not fit in uint8");

    let err: EvalError = NumError::DivisionByZero.into();
    assert_eq!(
        err.kind,
        EvalErrorKind::CompileTimeExecution {
            message: "division by zero".to_string()
        }
    );
}

#[test]
fn test_syntax_error_keeps_diagnostic() {
    let diag = Diagnostic::error(ErrorCode::E1002).with_message("expected expression");
    let err = syntax(diag.clone());
    assert_eq!(err.to_diagnostic(), diag);
}
