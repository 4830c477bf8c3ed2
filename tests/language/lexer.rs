//! Integration tests for the lexer
//!
//! Tests tokenization of canonical condition text.

use verdict_language::{Lexer, TokenKind, tokenize};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source).into_iter().map(|t| t.kind).collect()
}

// =============================================================================
// Basic Tokens
// =============================================================================

#[test]
fn stream_always_ends_with_eof() {
    for source in ["", "   \n\t", "desk is open", "(((", "@#$"] {
        let tokens = Lexer::tokenize_all(source);
        assert_eq!(tokens.last().map(|t| &t.kind), Some(&TokenKind::Eof));
        assert_eq!(
            tokens.iter().filter(|t| t.kind == TokenKind::Eof).count(),
            1,
            "{source:?}"
        );
    }
}

#[test]
fn punctuation() {
    assert_eq!(
        kinds("( ) ."),
        vec![TokenKind::LParen, TokenKind::RParen, TokenKind::Dot, TokenKind::Eof]
    );
}

#[test]
fn numbers() {
    assert_eq!(
        kinds("3 -2 4.5"),
        vec![
            TokenKind::Number(3.0),
            TokenKind::Number(-2.0),
            TokenKind::Number(4.5),
            TokenKind::Eof
        ]
    );
}

#[test]
fn strings_with_escaped_quotes() {
    let tokens = tokenize(r#""say \"hi\"""#);
    assert_eq!(tokens[0].kind, TokenKind::String("say \"hi\"".to_string()));
}

#[test]
fn identifiers() {
    assert_eq!(
        kinds("lamp_01 _hidden"),
        vec![
            TokenKind::Identifier("lamp_01".into()),
            TokenKind::Identifier("_hidden".into()),
            TokenKind::Eof
        ]
    );
}

// =============================================================================
// Keywords
// =============================================================================

#[test]
fn keywords_ignore_case() {
    assert_eq!(
        kinds("AND Or nOt IS_LESS_THAN"),
        vec![
            TokenKind::And,
            TokenKind::Or,
            TokenKind::Not,
            TokenKind::IsLessThan,
            TokenKind::Eof
        ]
    );
}

#[test]
fn has_is_an_alias_for_is_in() {
    assert_eq!(kinds("has")[0], TokenKind::IsIn);
    assert_eq!(kinds("is_in")[0], TokenKind::IsIn);
}

#[test]
fn field_keywords() {
    assert_eq!(
        kinds("attribute state flag inventory visits distance_from"),
        vec![
            TokenKind::Attribute,
            TokenKind::State,
            TokenKind::Flag,
            TokenKind::Inventory,
            TokenKind::Visits,
            TokenKind::DistanceFrom,
            TokenKind::Eof
        ]
    );
}

// =============================================================================
// Errors and Spans
// =============================================================================

#[test]
fn unrecognized_characters_become_unknown_tokens() {
    let tokens = tokenize("desk @ open");
    assert!(matches!(tokens[1].kind, TokenKind::Unknown(_)));
    assert_eq!(tokens[2].kind, TokenKind::Identifier("open".into()));
}

#[test]
fn spans_point_into_source() {
    let source = "player.state is open";
    let tokens = tokenize(source);
    assert_eq!(tokens[0].span.text(source), "player");
    assert_eq!(tokens[2].span.text(source), "state");
    assert_eq!(tokens[4].span.text(source), "open");
    assert_eq!(tokens[4].span.column, 17);
}

#[test]
fn spans_track_lines() {
    let tokens = tokenize("desk is open\nand lamp is lit");
    let and = &tokens[3];
    assert_eq!(and.kind, TokenKind::And);
    assert_eq!((and.span.line, and.span.column), (2, 1));
}
