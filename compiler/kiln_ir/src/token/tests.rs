use super::*;
use pretty_assertions::assert_eq;

fn list(kinds: &[TokenKind]) -> TokenList {
    let mut list = TokenList::new();
    for (i, kind) in kinds.iter().enumerate() {
        let at = u32::try_from(i).unwrap_or_default();
        list.push(Token::new(*kind, Span::new(at, at + 1)));
    }
    list
}

#[test]
fn test_full_range_excludes_eof() {
    let tokens = list(&[TokenKind::Let, TokenKind::Semicolon, TokenKind::Eof]);
    assert_eq!(tokens.full_range(), TokenRange::new(0, 2));
    assert_eq!(list(&[TokenKind::Eof]).full_range(), TokenRange::new(0, 0));
}

#[test]
fn test_span_at_clamps_to_last() {
    let tokens = list(&[TokenKind::Let, TokenKind::Eof]);
    assert_eq!(tokens.span_at(0), Span::new(0, 1));
    assert_eq!(tokens.span_at(99), Span::new(1, 2));
    assert_eq!(TokenList::new().span_at(0), Span::DUMMY);
}

#[test]
fn test_range_len() {
    assert_eq!(TokenRange::new(3, 7).len(), 4);
    assert!(TokenRange::new(5, 5).is_empty());
    assert_eq!(TokenRange::new(7, 3).len(), 0);
}
