//! Lexer and parser for Terraform-style configuration files.
//!
//! Source text is scanned into a flat token sequence, then parsed into
//! a concrete syntax tree of attributes and nested, labeled blocks.
//! Attribute values are kept as raw token spans for a later expression
//! stage to evaluate.
//!
//! # Quick start
//!
//! ## Tokenize and parse
//!
//! ```
//! use tf_syntax::{tokenize, parse};
//!
//! let input = "resource \"aws_instance\" \"web\" {\n  ami = \"abc\"\n}\n";
//! let tokens = tokenize(input).unwrap();
//! let config = parse(tokens).unwrap();
//!
//! let block = config.blocks().next().unwrap();
//! assert_eq!(block.block_type.name(), "resource");
//! assert_eq!(block.label_values(), ["aws_instance", "web"]);
//! assert!(block.body.attribute("ami").is_some());
//! ```
//!
//! ## Build and format a file programmatically
//!
//! ```
//! use tf_syntax::{Block, ConfigFile, Expression, format};
//!
//! let config = ConfigFile::new().block(
//!     Block::new("variable")
//!         .string_label("region")
//!         .attribute("default", Expression::string("eu-west-1")),
//! );
//!
//! let output = format(&config);
//! assert!(output.contains("default = \"eu-west-1\""));
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod ast;
pub mod builder;
pub mod cursor;
pub mod formatter;
pub mod inputs;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{
    Attribute, Block, Body, ConfigFile, Expression, Identifier, Label, StringLiteral, Structure,
};
pub use cursor::Cursor;
pub use formatter::format;
pub use lexer::{LexError, LexErrorKind, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse, preprocess};
pub use token::{Position, Span, Token, TokenKind};

/// Unified error type covering both lexing and parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

impl Error {
    /// Where in the source the error was detected.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Lex(e) => e.position,
            Self::Parse(e) => e.position,
        }
    }
}

/// Tokenize and parse a configuration source string in one step.
pub fn parse_str(input: &str) -> Result<ConfigFile, Error> {
    let tokens = tokenize(input)?;
    Ok(parse(tokens)?)
}
