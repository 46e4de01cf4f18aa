use std::fmt;
use std::iter::Peekable;
use std::vec::IntoIter;

use crate::ast::{
    Attribute, Block, Body, ConfigFile, Expression, Identifier, Label, StringLiteral, Structure,
};
use crate::token::{Position, Token, TokenKind};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token the grammar cannot accept at this point.
    UnexpectedToken {
        /// Raw lexeme of the offending token.
        found: String,
        /// Kind name of the offending token.
        token: &'static str,
    },
    /// Input ended in the middle of a statement or block.
    UnexpectedEof { expected: &'static str },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, token } => {
                write!(f, "unexpected {token} '{}'", found.escape_debug())
            }
            Self::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {expected}")
            }
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", position.line, position.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub position: Position,
}

impl ParseError {
    fn unexpected(token: &Token) -> Self {
        Self {
            kind: ParseErrorKind::UnexpectedToken {
                found: token.text.clone(),
                token: token.kind.name(),
            },
            position: token.span.start,
        }
    }
}

/// Drop comments and collapse runs of newlines into one.
///
/// Applying this to its own output returns the same sequence.
#[must_use]
pub fn preprocess(tokens: Vec<Token>) -> Vec<Token> {
    let mut out: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens {
        if token.kind.is_comment() {
            continue;
        }
        if token.is_newline() && out.last().is_some_and(Token::is_newline) {
            continue;
        }
        out.push(token);
    }
    out
}

/// Parse a token stream into a `ConfigFile` tree.
///
/// The stream is preprocessed first, so it may contain comments and
/// blank lines exactly as the lexer produced them.
///
/// # Errors
///
/// Returns `ParseError` at the first token the grammar cannot
/// accept, or when input ends inside a block.
pub fn parse(tokens: Vec<Token>) -> Result<ConfigFile, ParseError> {
    let config = Parser::new(preprocess(tokens)).parse()?;
    tracing::debug!(statements = config.body.len(), "parsed");
    Ok(config)
}

struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    last: Position,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            last: Position::START,
        }
    }

    fn parse(mut self) -> Result<ConfigFile, ParseError> {
        let body = self.parse_body()?;

        // Only a stray closer can stop the top-level body early.
        if let Some(token) = self.tokens.peek() {
            return Err(ParseError::unexpected(token));
        }

        Ok(ConfigFile { body })
    }

    fn parse_body(&mut self) -> Result<Body, ParseError> {
        let mut children = Vec::new();

        loop {
            self.skip_newline();

            let Some(token) = self.advance_if(|k| matches!(k, TokenKind::Identifier(_))) else {
                break;
            };
            let name = Identifier { token };

            match self.tokens.peek().map(|t| &t.kind) {
                Some(TokenKind::Equal) => {
                    self.advance();
                    let expression = self.parse_expression();
                    children.push(Structure::Attribute(Attribute { name, expression }));
                }
                Some(TokenKind::Identifier(_) | TokenKind::String(_) | TokenKind::LeftBrace) => {
                    children.push(Structure::Block(self.parse_block(name)?));
                }
                _ => return Err(self.unexpected_or_eof("'=' or '{'")),
            }
        }

        Ok(Body { children })
    }

    /// Collect tokens up to the newline that ends the attribute.
    ///
    /// Newlines nested in brackets belong to the expression; a closing
    /// bracket at depth zero belongs to the enclosing block.
    fn parse_expression(&mut self) -> Expression {
        let mut tokens = Vec::new();
        let mut depth = 0usize;

        while let Some(token) = self.tokens.peek() {
            match token.kind {
                TokenKind::Newline if depth == 0 => break,
                TokenKind::LeftParen
                | TokenKind::LeftBracket
                | TokenKind::LeftBrace
                | TokenKind::DollarLeftBrace
                | TokenKind::PercentLeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                _ => {}
            }
            if let Some(token) = self.advance() {
                tokens.push(token);
            }
        }

        Expression { tokens }
    }

    fn parse_block(&mut self, block_type: Identifier) -> Result<Block, ParseError> {
        let mut labels = Vec::new();

        loop {
            let Some(token) = self.advance() else {
                return Err(self.eof_error("'{'"));
            };
            match token.kind {
                TokenKind::Identifier(_) => labels.push(Label::Identifier(Identifier { token })),
                TokenKind::String(_) => labels.push(Label::String(StringLiteral { token })),
                TokenKind::LeftBrace => break,
                _ => return Err(ParseError::unexpected(&token)),
            }
        }

        self.skip_newline();
        let body = self.parse_body()?;

        match self.advance() {
            Some(token) if token.kind == TokenKind::RightBrace => {}
            Some(token) => return Err(ParseError::unexpected(&token)),
            None => return Err(self.eof_error("'}'")),
        }

        Ok(Block {
            block_type,
            labels,
            body,
        })
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.next()?;
        self.last = token.span.end;
        Some(token)
    }

    fn advance_if(&mut self, accept: impl Fn(&TokenKind) -> bool) -> Option<Token> {
        if self.tokens.peek().is_some_and(|t| accept(&t.kind)) {
            self.advance()
        } else {
            None
        }
    }

    fn skip_newline(&mut self) {
        self.advance_if(|k| matches!(k, TokenKind::Newline));
    }

    fn unexpected_or_eof(&mut self, expected: &'static str) -> ParseError {
        match self.tokens.peek() {
            Some(token) => ParseError::unexpected(token),
            None => self.eof_error(expected),
        }
    }

    const fn eof_error(&self, expected: &'static str) -> ParseError {
        ParseError {
            kind: ParseErrorKind::UnexpectedEof { expected },
            position: self.last,
        }
    }
}
