//! CLI tool to tokenize, parse, validate, and format configuration files.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tf_syntax::{Body, Position, Structure, Token, TokenKind, inputs};

#[derive(Parser)]
#[command(
    name = "tfsyntax",
    version,
    about = "Tokenize, parse, and format Terraform-style configuration files"
)]
struct Cli {
    /// Fail a file if it contains characters the lexer does not recognize.
    #[arg(long, global = true)]
    deny_unknown: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the token sequence of each file as JSON.
    Tokens(Inputs),
    /// Print the syntax tree of each file as JSON.
    Parse(Inputs),
    /// Check that each file parses.
    Validate(Inputs),
    /// Print each file in canonical formatting.
    Fmt(Inputs),
}

#[derive(Args)]
struct Inputs {
    /// Files, or directories whose `.tf` files are processed.
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

impl Command {
    const fn inputs(&self) -> &Inputs {
        match self {
            Self::Tokens(i) | Self::Parse(i) | Self::Validate(i) | Self::Fmt(i) => i,
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum FileError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Syntax(#[from] tf_syntax::Error),
    #[error("unrecognized input '{text}' at line {}, column {}", position.line, position.column)]
    Unknown { text: String, position: Position },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl From<tf_syntax::LexError> for FileError {
    fn from(e: tf_syntax::LexError) -> Self {
        Self::Syntax(e.into())
    }
}

impl From<tf_syntax::ParseError> for FileError {
    fn from(e: tf_syntax::ParseError) -> Self {
        Self::Syntax(e.into())
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut had_error = false;

    for path in &cli.command.inputs().paths {
        let files = match inputs::expand(path) {
            Ok(files) => files,
            Err(e) => {
                eprintln!("{}: {e}", path.display());
                had_error = true;
                continue;
            }
        };

        for file in files {
            tracing::info!(file = %file.display(), "processing");
            if let Err(e) = process(&file, &cli.command, cli.deny_unknown) {
                eprintln!("{}: {e}", file.display());
                had_error = true;
            }
        }
    }

    if had_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn process(path: &Path, command: &Command, deny_unknown: bool) -> Result<(), FileError> {
    let content = fs::read_to_string(path)?;
    let tokens = tf_syntax::tokenize(&content)?;

    if deny_unknown {
        check_unknown(&tokens)?;
    }

    match command {
        Command::Tokens(_) => print_json(path, "tokens", &tokens)?,
        Command::Parse(_) => {
            let config = tf_syntax::parse(tokens)?;
            print_json(path, "config", &config)?;
        }
        Command::Validate(_) => {
            let config = tf_syntax::parse(tokens)?;
            let (attributes, blocks) = count(&config.body);
            eprintln!(
                "{}: valid ({attributes} attribute(s), {blocks} block(s))",
                path.display()
            );
        }
        Command::Fmt(_) => {
            let config = tf_syntax::parse(tokens)?;
            print!("{}", tf_syntax::format(&config));
        }
    }

    Ok(())
}

fn print_json(path: &Path, key: &str, value: &impl Serialize) -> Result<(), FileError> {
    let mut out = serde_json::Map::new();
    out.insert("file".to_string(), path.display().to_string().into());
    out.insert(key.to_string(), serde_json::to_value(value)?);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

fn check_unknown(tokens: &[Token]) -> Result<(), FileError> {
    match tokens
        .iter()
        .find(|t| matches!(t.kind, TokenKind::Unknown(_)))
    {
        Some(token) => Err(FileError::Unknown {
            text: token.text.clone(),
            position: token.span.start,
        }),
        None => Ok(()),
    }
}

/// Attribute and block counts over the whole tree.
fn count(body: &Body) -> (usize, usize) {
    body.children
        .iter()
        .fold((0, 0), |(attributes, blocks), child| match child {
            Structure::Attribute(_) => (attributes + 1, blocks),
            Structure::Block(block) => {
                let (a, b) = count(&block.body);
                (attributes + a, blocks + b + 1)
            }
        })
}
