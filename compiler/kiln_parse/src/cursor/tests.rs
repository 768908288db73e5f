use std::rc::Rc;

use kiln_diagnostic::ErrorCode;
use kiln_ir::{StringInterner, TokenKind, TokenRange};
use pretty_assertions::assert_eq;

use super::*;

fn cursor(source: &str) -> Cursor {
    let interner = StringInterner::new();
    let tokens = kiln_lexer::lex(source, &interner)
        .unwrap_or_else(|err| panic!("lex failed: {err}"));
    let range = tokens.full_range();
    Cursor::new(Rc::new(tokens), range)
}

#[test]
fn test_eof_at_range_boundary() {
    let interner = StringInterner::new();
    let tokens = Rc::new(
        kiln_lexer::lex("a b c", &interner).unwrap_or_else(|err| panic!("lex failed: {err}")),
    );
    let mut cursor = Cursor::new(Rc::clone(&tokens), TokenRange::new(0, 2));
    cursor.advance();
    assert_eq!(cursor.peek_kind(), TokenKind::Eof);
    cursor.advance();
    assert!(cursor.is_at_end());
    assert_eq!(cursor.current_kind(), TokenKind::Eof);
    // Advancing at the end stays put
    cursor.advance();
    assert_eq!(cursor.position(), 2);
}

#[test]
fn test_skip_group_returns_inner_range() {
    let mut cursor = cursor("{ a { b } [c] } tail");
    let range = cursor
        .skip_group(TokenKind::LBrace)
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(range, TokenRange::new(1, 9));
    assert!(matches!(cursor.current_kind(), TokenKind::Ident(_)));
}

#[test]
fn test_skip_group_nested_preprocessor_delimiters() {
    let mut cursor = cursor("{ #[ x ]# #| y |# #{ z } }");
    let range = cursor
        .skip_group(TokenKind::LBrace)
        .unwrap_or_else(|err| panic!("{err}"));
    assert_eq!(range.len(), 9);
    assert!(cursor.is_at_end());
}

#[test]
fn test_skip_group_errors() {
    let err = cursor("{ a ( }")
        .skip_group(TokenKind::LBrace)
        .err()
        .map(|err| err.code());
    assert_eq!(err, Some(ErrorCode::E1003));

    let err = cursor("{ a").skip_group(TokenKind::LBrace).err();
    assert_eq!(err.as_ref().map(ParseError::code), Some(ErrorCode::E1003));
    assert!(err.is_some_and(|err| err.to_string().contains("unclosed")));

    let err = cursor("a").skip_group(TokenKind::LBrace).err();
    assert_eq!(err.map(|err| err.code()), Some(ErrorCode::E1001));
}
