use std::fmt;

use serde::Serialize;

/// A point in the source text.
///
/// `line` and `column` are 1-based; `index` is the 0-based count of
/// characters consumed before this point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub index: usize,
}

impl Position {
    /// Position of the first character of a document.
    pub const START: Self = Self {
        line: 1,
        column: 1,
        index: 0,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Source range covered by a token, `end` being exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    #[must_use]
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Number of source characters covered.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end.index - self.start.index
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Token kinds produced by the lexer.
///
/// Punctuation and operators carry nothing beyond their span; the
/// remaining variants carry the decoded value of their lexeme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum TokenKind {
    Newline,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    AndAnd,
    PipePipe,
    Bang,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    Colon,
    Question,
    LeftBrace,
    RightBrace,
    Equal,
    EqualGreater,
    LeftBracket,
    RightBracket,
    LeftParen,
    RightParen,
    Dot,
    Comma,
    /// `...`
    Ellipsis,
    /// `${`
    DollarLeftBrace,
    /// `%{`
    PercentLeftBrace,
    /// `/* ... */`, value excludes the delimiters.
    BlockComment(String),
    /// `// ...` or `# ...`, value excludes the marker.
    LineComment(String),
    /// Double-quoted string with escapes decoded.
    String(String),
    /// Numeric literal. The raw lexeme stays in [`Token::text`].
    Number(f64),
    Identifier(String),
    /// `<<DELIM` or `<<-DELIM` heredoc.
    Heredoc {
        value: String,
        delimiter: String,
        indented: bool,
    },
    /// Run of characters no recognizer accepted.
    Unknown(String),
}

impl TokenKind {
    /// Short human-readable name used in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Newline => "newline",
            Self::BlockComment(_) => "block comment",
            Self::LineComment(_) => "line comment",
            Self::String(_) => "string",
            Self::Number(_) => "number",
            Self::Identifier(_) => "identifier",
            Self::Heredoc { .. } => "heredoc",
            Self::Unknown(_) => "unknown",
            _ => "punctuation",
        }
    }

    #[must_use]
    pub const fn is_comment(&self) -> bool {
        matches!(self, Self::BlockComment(_) | Self::LineComment(_))
    }

    /// True for tokens that carry a decoded value.
    #[must_use]
    pub const fn is_sized(&self) -> bool {
        matches!(
            self,
            Self::BlockComment(_)
                | Self::LineComment(_)
                | Self::String(_)
                | Self::Number(_)
                | Self::Identifier(_)
                | Self::Heredoc { .. }
                | Self::Unknown(_)
        )
    }
}

/// Fixed operator and punctuation table, searched longest lexeme first.
pub(crate) const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("...", TokenKind::Ellipsis),
    ("\r\n", TokenKind::Newline),
    ("&&", TokenKind::AndAnd),
    ("||", TokenKind::PipePipe),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("=>", TokenKind::EqualGreater),
    ("${", TokenKind::DollarLeftBrace),
    ("%{", TokenKind::PercentLeftBrace),
    ("\n", TokenKind::Newline),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("!", TokenKind::Bang),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    (":", TokenKind::Colon),
    ("?", TokenKind::Question),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("=", TokenKind::Equal),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    (".", TokenKind::Dot),
    (",", TokenKind::Comma),
];

/// A single token with its kind, raw lexeme, and source range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }

    /// Token built outside the lexer, positioned at the document start.
    #[must_use]
    pub fn synthetic(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            span: Span::default(),
        }
    }

    #[must_use]
    pub const fn start(&self) -> Position {
        self.span.start
    }

    #[must_use]
    pub const fn end(&self) -> Position {
        self.span.end
    }

    /// The identifier name, if this is an identifier.
    #[must_use]
    pub fn as_identifier(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Identifier(name) => Some(name),
            _ => None,
        }
    }

    /// The decoded string value, if this is a string literal.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_newline(&self) -> bool {
        matches!(self.kind, TokenKind::Newline)
    }
}

/// Render `value` as a double-quoted string literal the lexer decodes
/// back to `value`.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn punctuation_table_is_longest_first() {
        let lengths: Vec<_> = PUNCTUATION.iter().map(|(s, _)| s.len()).collect();
        let mut sorted = lengths.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(lengths, sorted);
    }

    #[test]
    fn quote_escapes() {
        assert_eq!(quote("say \"hi\"\n"), "\"say \\\"hi\\\"\\n\"");
        assert_eq!(quote("C:\\tmp"), "\"C:\\\\tmp\"");
    }

    #[test]
    fn span_len() {
        let span = Span::new(
            Position::START,
            Position {
                line: 1,
                column: 4,
                index: 3,
            },
        );
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
    }

    #[test]
    fn kind_names() {
        assert_eq!(TokenKind::Number(1.0).name(), "number");
        assert_eq!(TokenKind::LeftBrace.name(), "punctuation");
        assert!(TokenKind::LineComment(String::new()).is_comment());
        assert!(!TokenKind::Dot.is_sized());
    }
}
