use std::fmt;

use crate::cursor::Cursor;
use crate::token::{PUNCTUATION, Position, Span, Token, TokenKind};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// End of line or input before the closing `"`.
    UnterminatedString,
    /// Input ended before the delimiter line.
    UnterminatedHeredoc { delimiter: String },
    /// `<<` or `<<-` with nothing before the end of the line.
    EmptyHeredocDelimiter,
    /// Input ended before the closing `*/`.
    UnterminatedComment,
    /// Number with a second decimal point.
    InvalidNumber,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedString => {
                write!(f, "unterminated string")
            }
            Self::UnterminatedHeredoc { delimiter } => {
                write!(
                    f,
                    "unterminated heredoc, \
                     expected closing delimiter: {delimiter}"
                )
            }
            Self::EmptyHeredocDelimiter => {
                write!(f, "empty heredoc delimiter")
            }
            Self::UnterminatedComment => {
                write!(f, "unterminated block comment")
            }
            Self::InvalidNumber => {
                write!(f, "invalid number, more than one decimal point")
            }
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub position: Position,
}

/// Tokenize a configuration source string into a sequence of tokens.
///
/// Characters no recognizer accepts are collected into
/// [`TokenKind::Unknown`] tokens instead of failing; callers decide
/// whether those are fatal.
///
/// # Errors
///
/// Returns `LexError` on unterminated strings, heredocs, or block
/// comments, and on numbers with more than one decimal point.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let tokens = Lexer::new(input).tokenize()?;
    tracing::debug!(
        tokens = tokens.len(),
        unknown = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Unknown(_)))
            .count(),
        "tokenized"
    );
    Ok(tokens)
}

struct Lexer<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<Token>,
    unknown: Option<Token>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            cursor: Cursor::new(input),
            tokens: Vec::new(),
            unknown: None,
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        loop {
            if self.cursor.skip_whitespace() {
                self.flush_unknown();
            }
            if self.cursor.eof() {
                break;
            }

            let offset = self.cursor.offset();
            let start = self.cursor.position();

            if let Some(kind) = self.scan_token()? {
                self.flush_unknown();
                let text = self.cursor.slice_from(offset).to_string();
                let span = Span::new(start, self.cursor.position());
                self.tokens.push(Token::new(kind, text, span));
            } else {
                self.absorb_unknown();
            }
        }

        self.flush_unknown();
        Ok(self.tokens)
    }

    /// Try each recognizer in priority order. Returns `None` without
    /// consuming anything when none applies.
    fn scan_token(&mut self) -> Result<Option<TokenKind>, LexError> {
        if let Some(kind) = self.heredoc()? {
            return Ok(Some(kind));
        }
        if let Some(kind) = self.block_comment()? {
            return Ok(Some(kind));
        }
        if let Some(kind) = self.line_comment() {
            return Ok(Some(kind));
        }
        if let Some(kind) = self.punctuation() {
            return Ok(Some(kind));
        }
        if let Some(kind) = self.number()? {
            return Ok(Some(kind));
        }
        if let Some(kind) = self.string()? {
            return Ok(Some(kind));
        }
        Ok(self.identifier())
    }

    fn absorb_unknown(&mut self) {
        let Some(ch) = self.cursor.peek() else {
            return;
        };
        let start = self.cursor.position();
        self.cursor.forward();
        let end = self.cursor.position();

        match &mut self.unknown {
            Some(token) => {
                token.text.push(ch);
                if let TokenKind::Unknown(value) = &mut token.kind {
                    value.push(ch);
                }
                token.span.end = end;
            }
            None => {
                self.unknown = Some(Token::new(
                    TokenKind::Unknown(ch.to_string()),
                    ch.to_string(),
                    Span::new(start, end),
                ));
            }
        }
    }

    fn flush_unknown(&mut self) {
        if let Some(token) = self.unknown.take() {
            self.tokens.push(token);
        }
    }

    const fn error(kind: LexErrorKind, position: Position) -> LexError {
        LexError { kind, position }
    }

    /// Consume up to (not including) the next `\n`, dropping a trailing `\r`.
    fn read_line(&mut self) -> &'a str {
        let start = self.cursor.offset();
        while self.cursor.peek().is_some_and(|c| c != '\n') {
            self.cursor.forward();
        }
        let line = self.cursor.slice_from(start);
        line.strip_suffix('\r').unwrap_or(line)
    }

    fn heredoc(&mut self) -> Result<Option<TokenKind>, LexError> {
        if !self.cursor.starts_with("<<") {
            return Ok(None);
        }
        let opener = self.cursor.position();
        self.cursor.forward_by(2);

        let indented = self.cursor.peek() == Some('-');
        if indented {
            self.cursor.forward();
        }

        let delimiter = self.read_line().trim_end().to_string();
        if delimiter.is_empty() {
            return Err(Self::error(LexErrorKind::EmptyHeredocDelimiter, opener));
        }

        if self.cursor.peek() != Some('\n') {
            return Err(Self::error(
                LexErrorKind::UnterminatedHeredoc { delimiter },
                self.cursor.position(),
            ));
        }
        self.cursor.forward();

        let mut lines = Vec::new();
        loop {
            if self.cursor.eof() {
                return Err(Self::error(
                    LexErrorKind::UnterminatedHeredoc { delimiter },
                    self.cursor.position(),
                ));
            }

            let line = self.read_line();
            let candidate = if indented { line.trim_start() } else { line };
            if candidate == delimiter {
                break;
            }
            lines.push(line);

            if self.cursor.peek() == Some('\n') {
                self.cursor.forward();
            }
        }

        Ok(Some(TokenKind::Heredoc {
            value: lines.join("\n"),
            delimiter,
            indented,
        }))
    }

    fn block_comment(&mut self) -> Result<Option<TokenKind>, LexError> {
        if !self.cursor.starts_with("/*") {
            return Ok(None);
        }
        self.cursor.forward_by(2);

        let start = self.cursor.offset();
        loop {
            if self.cursor.starts_with("*/") {
                let value = self.cursor.slice_from(start).to_string();
                self.cursor.forward_by(2);
                return Ok(Some(TokenKind::BlockComment(value)));
            }
            if self.cursor.eof() {
                return Err(Self::error(
                    LexErrorKind::UnterminatedComment,
                    self.cursor.position(),
                ));
            }
            self.cursor.forward();
        }
    }

    fn line_comment(&mut self) -> Option<TokenKind> {
        if self.cursor.starts_with("//") {
            self.cursor.forward_by(2);
        } else if self.cursor.starts_with("#") {
            self.cursor.forward();
        } else {
            return None;
        }

        let value = self.read_line();
        Some(TokenKind::LineComment(value.to_string()))
    }

    fn punctuation(&mut self) -> Option<TokenKind> {
        let (lexeme, kind) = PUNCTUATION
            .iter()
            .find(|(lexeme, _)| self.cursor.starts_with(lexeme))?;
        self.cursor.forward_by(lexeme.chars().count());
        Some(kind.clone())
    }

    fn eat_digits(&mut self) {
        while self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.forward();
        }
    }

    fn number(&mut self) -> Result<Option<TokenKind>, LexError> {
        if !self.cursor.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(None);
        }
        let start = self.cursor.offset();
        let start_pos = self.cursor.position();
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());

        self.eat_digits();

        if self.cursor.peek() == Some('.') && is_digit(self.cursor.peek_next()) {
            self.cursor.forward();
            self.eat_digits();

            if self.cursor.peek() == Some('.') && is_digit(self.cursor.peek_next()) {
                return Err(Self::error(
                    LexErrorKind::InvalidNumber,
                    self.cursor.position(),
                ));
            }
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let signed = matches!(self.cursor.peek_next(), Some('+' | '-'));
            if is_digit(self.cursor.peek_next())
                || (signed && is_digit(self.cursor.peek_next_next()))
            {
                self.cursor.forward_by(if signed { 2 } else { 1 });
                self.eat_digits();
            }
        }

        let value = self
            .cursor
            .slice_from(start)
            .parse::<f64>()
            .map_err(|_| Self::error(LexErrorKind::InvalidNumber, start_pos))?;
        Ok(Some(TokenKind::Number(value)))
    }

    fn string(&mut self) -> Result<Option<TokenKind>, LexError> {
        if self.cursor.peek() != Some('"') {
            return Ok(None);
        }
        self.cursor.forward();

        let mut value = String::new();
        loop {
            match self.cursor.peek() {
                None | Some('\n') => {
                    return Err(Self::error(
                        LexErrorKind::UnterminatedString,
                        self.cursor.position(),
                    ));
                }
                Some('"') => {
                    self.cursor.forward();
                    break;
                }
                Some('\\') => {
                    self.cursor.forward();
                    match self.cursor.peek() {
                        None | Some('\n') => {
                            return Err(Self::error(
                                LexErrorKind::UnterminatedString,
                                self.cursor.position(),
                            ));
                        }
                        Some(c) => {
                            match c {
                                '"' => value.push('"'),
                                '\\' => value.push('\\'),
                                'n' => value.push('\n'),
                                't' => value.push('\t'),
                                'r' => value.push('\r'),
                                other => {
                                    value.push('\\');
                                    value.push(other);
                                }
                            }
                            self.cursor.forward();
                        }
                    }
                }
                Some(c) => {
                    value.push(c);
                    self.cursor.forward();
                }
            }
        }

        Ok(Some(TokenKind::String(value)))
    }

    fn identifier(&mut self) -> Option<TokenKind> {
        if !self
            .cursor
            .peek()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        {
            return None;
        }
        let start = self.cursor.offset();
        while self
            .cursor
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            self.cursor.forward();
        }
        Some(TokenKind::Identifier(
            self.cursor.slice_from(start).to_string(),
        ))
    }
}
