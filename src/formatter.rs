//! Pretty-printer that serializes a syntax tree back into canonical text.
//!
//! Produces two-space indented output with blank lines around blocks.
//! Expression spans are re-emitted token by token with normalized spacing.

use crate::ast::{Attribute, Block, Body, ConfigFile, Label, Structure};
use crate::token::{PUNCTUATION, Token, TokenKind};

const INDENT: &str = "  ";

/// Format a `ConfigFile` tree into canonical source text.
///
/// Formatting the result of parsing this output yields the same text.
#[must_use]
pub fn format(config: &ConfigFile) -> String {
    let mut out = String::new();
    format_body(&mut out, &config.body, 0);

    // Trailing newline
    if !out.ends_with('\n') {
        out.push('\n');
    }

    out
}

fn push_indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

/// Format statements with a blank line before and after each block.
fn format_body(out: &mut String, body: &Body, indent: usize) {
    let mut prev_was_block = false;

    for (i, child) in body.children.iter().enumerate() {
        let is_block = matches!(child, Structure::Block(_));
        if i > 0 && (is_block || prev_was_block) {
            out.push('\n');
        }

        match child {
            Structure::Attribute(attribute) => format_attribute(out, attribute, indent),
            Structure::Block(block) => format_block(out, block, indent),
        }
        prev_was_block = is_block;
    }
}

fn format_attribute(out: &mut String, attribute: &Attribute, indent: usize) {
    push_indent(out, indent);
    out.push_str(attribute.name.name());
    out.push_str(" =");
    if !attribute.expression.is_empty() {
        out.push(' ');
        format_expression(out, &attribute.expression.tokens, indent);
    }
    out.push('\n');
}

fn format_block(out: &mut String, block: &Block, indent: usize) {
    push_indent(out, indent);
    out.push_str(block.block_type.name());

    for label in &block.labels {
        out.push(' ');
        match label {
            Label::Identifier(identifier) => out.push_str(identifier.name()),
            Label::String(string) => out.push_str(&string.token.text),
        }
    }

    out.push_str(" {\n");
    format_body(out, &block.body, indent + 1);
    push_indent(out, indent);
    out.push_str("}\n");
}

const fn is_opener(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::DollarLeftBrace
            | TokenKind::PercentLeftBrace
    )
}

const fn is_closer(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
    )
}

/// Whether a space separates two adjacent tokens on the same line.
const fn needs_space(prev: &TokenKind, cur: &TokenKind) -> bool {
    use TokenKind as K;

    match (prev, cur) {
        // keep `1 .2` from fusing into a decimal
        (K::Number(_), K::Dot) => true,
        (K::Dot, _)
        | (_, K::Dot | K::Comma | K::RightParen | K::RightBracket | K::Ellipsis)
        | (
            K::LeftParen | K::LeftBracket | K::Bang | K::DollarLeftBrace | K::PercentLeftBrace,
            _,
        )
        | (K::Identifier(_) | K::RightParen | K::RightBracket, K::LeftParen | K::LeftBracket) => {
            false
        }
        _ => true,
    }
}

/// Whether `cur` written directly after `prev` would lex as a longer
/// operator, now or once another token follows.
fn fuses(prev: &str, cur: &str) -> bool {
    let joined = std::format!("{prev}{cur}");
    PUNCTUATION.iter().any(|(lexeme, _)| {
        lexeme.len() > prev.len()
            && (joined.starts_with(lexeme) || lexeme.starts_with(joined.as_str()))
    })
}

fn render(token: &Token) -> String {
    match &token.kind {
        TokenKind::Heredoc {
            value,
            delimiter,
            indented,
        } => {
            let dash = if *indented { "-" } else { "" };
            if value.is_empty() {
                std::format!("<<{dash}{delimiter}\n{delimiter}")
            } else {
                std::format!("<<{dash}{delimiter}\n{value}\n{delimiter}")
            }
        }
        _ => token.text.clone(),
    }
}

fn format_expression(out: &mut String, tokens: &[Token], indent: usize) {
    let mut depth = 0usize;
    let mut line_start = true;

    for (i, token) in tokens.iter().enumerate() {
        if token.is_newline() {
            out.push('\n');
            let closes = tokens.get(i + 1).is_some_and(|t| is_closer(&t.kind));
            let level = if closes {
                depth.saturating_sub(1)
            } else {
                depth
            };
            push_indent(out, indent + level);
            line_start = true;
            continue;
        }

        if is_closer(&token.kind) {
            depth = depth.saturating_sub(1);
        }
        let rendered = render(token);
        if !line_start {
            let prev = &tokens[i - 1];
            if needs_space(&prev.kind, &token.kind) || fuses(&prev.text, &rendered) {
                out.push(' ');
            }
        }
        out.push_str(&rendered);
        if is_opener(&token.kind) {
            depth += 1;
        }
        line_start = false;
    }
}
