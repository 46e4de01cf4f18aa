use crate::ast::{
    Attribute, Block, Body, ConfigFile, Expression, Identifier, Label, StringLiteral, Structure,
};
use crate::lexer::{LexError, tokenize};
use crate::token::{Token, TokenKind, quote};

impl ConfigFile {
    /// Create a new empty file.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            body: Body {
                children: Vec::new(),
            },
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn attribute(mut self, name: &str, expression: Expression) -> Self {
        self.body.push_attribute(name, expression);
        self
    }

    /// Add a block.
    #[must_use]
    pub fn block(mut self, block: Block) -> Self {
        self.body.children.push(Structure::Block(block));
        self
    }
}

impl Body {
    fn push_attribute(&mut self, name: &str, expression: Expression) {
        self.children.push(Structure::Attribute(Attribute {
            name: Identifier::new(name),
            expression,
        }));
    }
}

impl Block {
    /// Create a block of the given type with no labels and an empty body.
    #[must_use]
    pub fn new(block_type: &str) -> Self {
        Self {
            block_type: Identifier::new(block_type),
            labels: Vec::new(),
            body: Body::default(),
        }
    }

    /// Add a bare identifier label.
    #[must_use]
    pub fn label(mut self, name: &str) -> Self {
        self.labels.push(Label::Identifier(Identifier::new(name)));
        self
    }

    /// Add a quoted string label.
    #[must_use]
    pub fn string_label(mut self, value: &str) -> Self {
        self.labels.push(Label::String(StringLiteral::new(value)));
        self
    }

    /// Add an attribute to the block body.
    #[must_use]
    pub fn attribute(mut self, name: &str, expression: Expression) -> Self {
        self.body.push_attribute(name, expression);
        self
    }

    /// Add a nested block.
    #[must_use]
    pub fn block(mut self, block: Self) -> Self {
        self.body.children.push(Structure::Block(block));
        self
    }
}

impl Identifier {
    /// Identifier with a synthetic token.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            token: Token::synthetic(TokenKind::Identifier(name.to_string()), name),
        }
    }
}

impl StringLiteral {
    /// String literal with a synthetic token.
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            token: Token::synthetic(TokenKind::String(value.to_string()), quote(value)),
        }
    }
}

impl Expression {
    /// Tokenize `source` into an expression span.
    ///
    /// Comments and blank lines are dropped the same way the parser
    /// drops them; leading and trailing newlines are trimmed.
    pub fn parse(source: &str) -> Result<Self, LexError> {
        let mut tokens = crate::parser::preprocess(tokenize(source)?);
        while tokens.last().is_some_and(Token::is_newline) {
            tokens.pop();
        }
        let leading = tokens.iter().take_while(|t| t.is_newline()).count();
        tokens.drain(..leading);
        Ok(Self { tokens })
    }

    /// A single string literal.
    #[must_use]
    pub fn string(value: &str) -> Self {
        Self {
            tokens: vec![StringLiteral::new(value).token],
        }
    }

    /// A numeric literal, or `None` for NaN and infinities.
    ///
    /// Negative values become a `-` token followed by the magnitude,
    /// which is how the lexer reads them back.
    #[must_use]
    pub fn number(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let magnitude = value.abs();
        let literal = Token::synthetic(TokenKind::Number(magnitude), magnitude.to_string());
        let tokens = if value < 0.0 {
            vec![Token::synthetic(TokenKind::Minus, "-"), literal]
        } else {
            vec![literal]
        };
        Some(Self { tokens })
    }

    /// A single identifier, e.g. `true` or `null`.
    #[must_use]
    pub fn identifier(name: &str) -> Self {
        Self {
            tokens: vec![Identifier::new(name).token],
        }
    }
}
