#![allow(dead_code)]

use tf_syntax::{ConfigFile, Token, TokenKind, format, parse, parse_str, tokenize};

/// Assert that `input` is already in canonical form.
pub fn roundtrip(input: &str) {
    let tokens = tokenize(input).expect("tokenize failed");
    let cf = parse(tokens).expect("parse failed");
    let output = format(&cf);
    assert_eq!(
        output, input,
        "round-trip mismatch:\n--- expected ---\n{input}\n--- got ---\n{output}"
    );
}

/// Helper: format a tree, parse it back, assert the text is stable.
pub fn assert_format_stable(original: &ConfigFile) {
    let formatted = format(original);
    let parsed = parse_str(&formatted).unwrap_or_else(|e| {
        panic!(
            "failed to re-parse formatted output: {e}\n\
             --- formatted ---\n{formatted}"
        )
    });
    assert_eq!(
        formatted,
        format(&parsed),
        "formatting not stable\n--- formatted ---\n{formatted}"
    );
}

/// Token kinds of `input`, panicking on lex errors.
pub fn kinds(input: &str) -> Vec<TokenKind> {
    tokenize(input)
        .expect("tokenize failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

pub fn ident(name: &str) -> TokenKind {
    TokenKind::Identifier(name.to_string())
}

pub fn string(value: &str) -> TokenKind {
    TokenKind::String(value.to_string())
}

pub fn texts(tokens: &[Token]) -> Vec<&str> {
    tokens.iter().map(|t| t.text.as_str()).collect()
}
