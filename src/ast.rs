//! Concrete syntax tree for a parsed configuration file.
//!
//! Attribute values are kept as raw token spans; evaluating them is
//! left to a separate expression stage.

use serde::Serialize;

use crate::token::{Token, TokenKind};

/// Complete configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConfigFile {
    pub body: Body,
}

/// Ordered attributes and blocks of a file or block.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Body {
    pub children: Vec<Structure>,
}

/// A single body entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Structure {
    Attribute(Attribute),
    Block(Block),
}

/// `name = expression`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Attribute {
    pub name: Identifier,
    pub expression: Expression,
}

/// `type label... { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub block_type: Identifier,
    pub labels: Vec<Label>,
    pub body: Body,
}

/// Block label, bare or quoted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Label {
    Identifier(Identifier),
    String(StringLiteral),
}

/// An identifier token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Identifier {
    pub token: Token,
}

/// A string literal token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StringLiteral {
    pub token: Token,
}

/// Unparsed right-hand side of an attribute.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Expression {
    pub tokens: Vec<Token>,
}

impl ConfigFile {
    #[must_use]
    pub fn attributes(&self) -> Attributes<'_> {
        self.body.attributes()
    }

    #[must_use]
    pub fn blocks(&self) -> Blocks<'_> {
        self.body.blocks()
    }
}

impl Body {
    /// Attributes in source order.
    #[must_use]
    pub fn attributes(&self) -> Attributes<'_> {
        Attributes {
            inner: self.children.as_slice().iter(),
        }
    }

    /// Blocks in source order.
    #[must_use]
    pub fn blocks(&self) -> Blocks<'_> {
        Blocks {
            inner: self.children.as_slice().iter(),
        }
    }

    /// First attribute named `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes().find(|a| a.name.name() == name)
    }

    /// Blocks whose type is `block_type`, in source order.
    pub fn blocks_of_type<'a>(&'a self, block_type: &'a str) -> impl Iterator<Item = &'a Block> {
        self.blocks()
            .filter(move |b| b.block_type.name() == block_type)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.children.len()
    }
}

/// Iterator over the attributes of a [`Body`].
#[derive(Debug, Clone)]
pub struct Attributes<'a> {
    inner: std::slice::Iter<'a, Structure>,
}

impl<'a> Iterator for Attributes<'a> {
    type Item = &'a Attribute;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|s| match s {
            Structure::Attribute(a) => Some(a),
            Structure::Block(_) => None,
        })
    }
}

/// Iterator over the blocks of a [`Body`].
#[derive(Debug, Clone)]
pub struct Blocks<'a> {
    inner: std::slice::Iter<'a, Structure>,
}

impl<'a> Iterator for Blocks<'a> {
    type Item = &'a Block;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.by_ref().find_map(|s| match s {
            Structure::Block(b) => Some(b),
            Structure::Attribute(_) => None,
        })
    }
}

impl Block {
    /// Label values with quoting removed.
    #[must_use]
    pub fn label_values(&self) -> Vec<&str> {
        self.labels.iter().map(Label::value).collect()
    }
}

impl Label {
    /// The identifier name or decoded string value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Identifier(i) => i.name(),
            Self::String(s) => s.value(),
        }
    }

    #[must_use]
    pub const fn token(&self) -> &Token {
        match self {
            Self::Identifier(Identifier { token }) | Self::String(StringLiteral { token }) => token,
        }
    }
}

impl Identifier {
    #[must_use]
    pub fn name(&self) -> &str {
        self.token.as_identifier().unwrap_or(&self.token.text)
    }
}

impl StringLiteral {
    #[must_use]
    pub fn value(&self) -> &str {
        self.token.as_string().unwrap_or(&self.token.text)
    }
}

impl Expression {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Source lexemes of the span, joined by single spaces.
    #[must_use]
    pub fn source(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Whether any token in the span is unrecognized.
    #[must_use]
    pub fn has_unknown(&self) -> bool {
        self.tokens
            .iter()
            .any(|t| matches!(t.kind, TokenKind::Unknown(_)))
    }
}
