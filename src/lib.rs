//! MiniJava compiler front end.
//!
//! The pipeline is pull-driven from the parser:
//!
//! ```text
//! CharSource ─▶ Scanner ─▶ Parser ──(ParseListener)──▶ Builder ─▶ SymbolTable
//!                                                                   │
//!                  check_declarations ─▶ consolidate ─▶ check_program
//! ```
//!
//! [`tokenize`] runs the lexer alone, [`parser::validate`] stops after the
//! grammar, and [`analyze`] runs every stage and returns the checked
//! [`CompilationContext`].

pub mod ast;
pub mod ast_printer;
pub mod builder;
pub mod checker;
pub mod error;
pub mod grammar;
pub mod hierarchy;
pub mod parser;
pub mod scanner;
pub mod source;
pub mod symbols;
pub mod token;

use log::info;

use crate::builder::Builder;
use crate::error::{CompileError, Result};
use crate::parser::Parser;
use crate::scanner::Scanner;
use crate::source::{CharSource, SourceBuffer};
use crate::symbols::SymbolTable;
use crate::token::Token;

/// What the lexer does after a lexical error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LexMode {
    /// Keep scanning and collect every error of the unit.
    Diagnostic,
    /// Stop at the first error.
    #[default]
    Compiling,
}

/// Library-side options of one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Config {
    pub mode: LexMode,
}

/// Output of [`tokenize`]: every token produced and every error met.
#[derive(Debug, Default)]
pub struct TokenStream {
    pub tokens: Vec<Token>,
    pub errors: Vec<CompileError>,
}

impl TokenStream {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Run only the lexer over `source`.
///
/// In [`LexMode::Compiling`] scanning stops at the first error; in
/// [`LexMode::Diagnostic`] it resumes after each one until `EOF`.  I/O
/// failures always stop it.
pub fn tokenize<S: CharSource>(source: S, config: &Config) -> TokenStream {
    info!("Tokenizing in {:?} mode", config.mode);

    let mut stream = TokenStream::default();

    for result in Scanner::new(source) {
        match result {
            Ok(token) => stream.tokens.push(token),
            Err(error) => {
                let fatal = config.mode == LexMode::Compiling || matches!(error, CompileError::Io(_));
                stream.errors.push(error);

                if fatal {
                    break;
                }
            }
        }
    }

    info!(
        "Tokenized {} token(s), {} error(s)",
        stream.tokens.len(),
        stream.errors.len()
    );

    stream
}

/// A unit that went through every stage.  Bodies live in the table, attached
/// to their methods and constructors.
#[derive(Debug)]
pub struct CompilationContext {
    pub table: SymbolTable,
}

/// Parse, build, consolidate and check one unit.  Syntactic and semantic
/// errors abort on the first occurrence.
pub fn analyze<S: CharSource>(source: S) -> Result<CompilationContext> {
    let mut builder = Builder::new();

    Parser::new(Scanner::new(source))?.parse_unit(&mut builder)?;

    let mut table = builder.finish();

    table.check_declarations()?;
    table.consolidate()?;
    checker::check_program(&table)?;

    info!("Unit is semantically valid");

    Ok(CompilationContext { table })
}

/// [`analyze`] over in-memory text.
pub fn analyze_str(text: &str) -> Result<CompilationContext> {
    analyze(SourceBuffer::new(text))
}
