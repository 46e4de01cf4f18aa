//! Property-based tests for the lexer and token preprocessing.

use proptest::prelude::*;
use tf_syntax::{TokenKind, format, parse_str, preprocess, tokenize};

const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "&&", "||", "!", "==", "!=", "<", "<=", ">", ">=", ":", "?", "{",
    "}", "=", "=>", "[", "]", "(", ")", ".", ",", "...", "${", "%{",
];

fn operator_kinds(src: &str) -> Vec<TokenKind> {
    tokenize(src)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .filter(|k| *k != TokenKind::Newline)
        .collect()
}

/// Source made of characters that never open a string, comment, or heredoc.
fn plain_source() -> impl Strategy<Value = String> {
    "[a-z0-9_ \t\n.,=+*(){}\\[\\]!?:-]{0,80}".prop_map(|s| s)
}

/// Arbitrary source mixing comments, strings, and stray characters.
fn mixed_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            "[a-z_][a-z0-9_]{0,6}".prop_map(|s| s),
            "[0-9]{1,4}".prop_map(|s| s),
            "\"[a-z ]{0,8}\"".prop_map(|s| s),
            "# [a-z ]{0,10}\n".prop_map(|s| s),
            "/\\* [a-z\n ]{0,10} \\*/".prop_map(|s| s),
            prop::sample::select(OPERATORS.to_vec()).prop_map(str::to_string),
            "[ \t\n]{1,3}".prop_map(|s| s),
            "[@~^`|]{1,2}".prop_map(|s| s),
        ],
        0..=20,
    )
    .prop_map(|parts| parts.join(" "))
}

proptest! {
    /// Whitespace-only input yields one newline token per line break.
    #[test]
    fn whitespace_yields_only_newlines(src in "[ \t\n]{0,40}") {
        let tokens = tokenize(&src).unwrap();
        prop_assert_eq!(tokens.len(), src.matches('\n').count());
        prop_assert!(tokens.iter().all(|t| t.kind == TokenKind::Newline));
    }

    /// Every span covers exactly the characters of its lexeme.
    #[test]
    fn span_matches_lexeme(src in mixed_source()) {
        let Ok(tokens) = tokenize(&src) else {
            return Ok(());
        };
        for t in &tokens {
            prop_assert_eq!(t.span.len(), t.text.chars().count(), "token {:?}", t);
        }
    }

    /// Lexemes appear in source order and reproduce the source slices.
    #[test]
    fn lexemes_are_source_slices(src in mixed_source()) {
        let Ok(tokens) = tokenize(&src) else {
            return Ok(());
        };
        let chars: Vec<char> = src.chars().collect();
        let mut previous_end = 0;
        for t in &tokens {
            prop_assert!(t.span.start.index >= previous_end);
            let slice: String = chars[t.span.start.index..t.span.end.index].iter().collect();
            prop_assert_eq!(&slice, &t.text);
            previous_end = t.span.end.index;
        }
    }

    /// Sources without quotes, comments, or heredocs never fail to lex
    /// except on malformed numbers.
    #[test]
    fn plain_source_lexes(src in plain_source()) {
        if let Err(e) = tokenize(&src) {
            prop_assert_eq!(e.kind, tf_syntax::LexErrorKind::InvalidNumber);
        }
    }

    /// Space-separated operators lex by longest match, one token each.
    #[test]
    fn operators_longest_match(ops in prop::collection::vec(prop::sample::select(OPERATORS.to_vec()), 1..=12)) {
        let src = ops.join(" ");
        let tokens = tokenize(&src).unwrap();
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        prop_assert_eq!(texts, ops);
    }

    /// Preprocessing drops comments and leaves no adjacent newlines.
    #[test]
    fn preprocess_output_is_clean(src in mixed_source()) {
        let Ok(tokens) = tokenize(&src) else {
            return Ok(());
        };
        let cleaned = preprocess(tokens);
        prop_assert!(!cleaned.iter().any(|t| t.kind.is_comment()));
        prop_assert!(!cleaned.windows(2).any(|w| w[0].is_newline() && w[1].is_newline()));
    }

    /// Preprocessing is idempotent.
    #[test]
    fn preprocess_idempotent(src in mixed_source()) {
        let Ok(tokens) = tokenize(&src) else {
            return Ok(());
        };
        let once = preprocess(tokens);
        let twice = preprocess(once.clone());
        prop_assert_eq!(once, twice);
    }

    /// Formatting never merges neighbouring operators into a longer one.
    #[test]
    fn format_keeps_operator_kinds(ops in prop::collection::vec(
        prop::sample::select(OPERATORS.to_vec()).prop_filter("closer", |op| !matches!(*op, ")" | "]" | "}")),
        1..=12,
    )) {
        let src = std::format!("a = {}", ops.join(" "));
        let formatted = format(&parse_str(&src).unwrap());
        prop_assert_eq!(
            operator_kinds(&src),
            operator_kinds(&formatted),
            "Formatted:\n{}",
            formatted
        );
    }
}
