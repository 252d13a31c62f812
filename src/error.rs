//! Centralised error hierarchy for the **MiniJava front end**.
//!
//! Every stage (scanner, parser, declaration builder, hierarchy
//! consolidation, checker, CLI) converts its failure modes into one of the
//! records defined here.  Stage errors keep enough positional detail to
//! render the classic report ending in the `[Error:<lexeme>|<line>]` trailer,
//! and they all fold into [`CompileError`] so the crate can use a single
//! `Result<T>` alias.
//!
//! The module **does not** print diagnostics itself; `report()` only renders
//! them.

use std::io;
use std::path::PathBuf;

use log::info;
use thiserror::Error;

use crate::grammar::NonTerminal;
use crate::token::{Token, TokenKind};

// ─────────────────────────────────────────────────────────────────────────────
// Lexical errors
// ─────────────────────────────────────────────────────────────────────────────

/// What went wrong while building a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexicalErrorKind {
    InvalidSymbol,
    IntLiteralTooLong,
    EmptyChar,
    UnterminatedChar,
    NewLineInChar,
    InvalidEscape,
    InvalidUnicodeEscape,
    MultiCharLiteral,
    UnterminatedString,
    UnterminatedCompoundOperator,
    UnterminatedComment,
}

/// A lexical error with its full source position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexical error at line {line}, column {column}: {message}")]
pub struct LexicalError {
    pub kind: LexicalErrorKind,

    /// Human‑readable description.
    pub message: String,

    /// Partial lexeme built up to (and including) the offending character.
    pub lexeme: String,

    /// 1‑based line of the offending character.
    pub line: usize,

    /// 1‑based column of the offending character.
    pub column: usize,

    /// Raw text of the offending line, without its terminator.
    pub source_line: String,
}

impl LexicalError {
    pub fn new<S: Into<String>>(
        kind: LexicalErrorKind,
        message: S,
        lexeme: String,
        line: usize,
        column: usize,
        source_line: String,
    ) -> Self {
        let message: String = message.into();

        info!(
            "Creating Lexical error: kind={:?}, line={}, column={}, msg={}",
            kind, line, column, message
        );

        Self {
            kind,
            message,
            lexeme,
            line,
            column,
            source_line,
        }
    }

    /// Multi-line report: message, offending line, caret, trailer.
    pub fn report(&self) -> String {
        const DETAIL: &str = "Detail: ";

        // Keep tabs so the caret lines up with the rendered source line.
        let padding: String = self
            .source_line
            .chars()
            .take(self.column.saturating_sub(1))
            .map(|c| if c == '\t' { '\t' } else { ' ' })
            .collect();

        format!(
            "{}\n{}{}\n{}{}^\n{}",
            self,
            DETAIL,
            self.source_line,
            " ".repeat(DETAIL.len()),
            padding,
            trailer(&self.lexeme, self.line)
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Syntactic errors
// ─────────────────────────────────────────────────────────────────────────────

/// The first place where the token stream left the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntacticError {
    /// The top of the stack was a terminal and the lookahead differs.
    #[error(
        "Syntax error at line {}: expected {}, but found {}.",
        .found.line,
        .expected.describe(),
        describe_found(.found)
    )]
    Mismatch { expected: TokenKind, found: Token },

    /// No production of `non_terminal` starts with the lookahead.
    #[error(
        "Syntax error at line {}: expected one of {}, but found {}.",
        .found.line,
        describe_expected(.expected),
        describe_found(.found)
    )]
    NotInFirsts {
        non_terminal: NonTerminal,
        expected: Vec<TokenKind>,
        found: Token,
    },
}

impl SyntacticError {
    pub fn mismatch(expected: TokenKind, found: Token) -> Self {
        info!(
            "Creating Mismatch error: expected={:?}, found={}",
            expected, found
        );

        SyntacticError::Mismatch { expected, found }
    }

    pub fn not_in_firsts(non_terminal: NonTerminal, expected: Vec<TokenKind>, found: Token) -> Self {
        info!(
            "Creating NotInFirsts error: non_terminal={:?}, found={}",
            non_terminal, found
        );

        SyntacticError::NotInFirsts {
            non_terminal,
            expected,
            found,
        }
    }

    /// The token that could not be accepted.
    pub fn found(&self) -> &Token {
        match self {
            SyntacticError::Mismatch { found, .. } | SyntacticError::NotInFirsts { found, .. } => {
                found
            }
        }
    }

    pub fn report(&self) -> String {
        let found = self.found();

        format!("{}\n{}", self, trailer(&found.lexeme, found.line))
    }
}

fn describe_expected(expected: &[TokenKind]) -> String {
    expected
        .iter()
        .map(|kind| kind.describe())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn describe_found(found: &Token) -> String {
    match found.kind {
        TokenKind::EOF => TokenKind::EOF.describe().to_owned(),
        _ => format!("'{}'", found.lexeme),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Semantic errors
// ─────────────────────────────────────────────────────────────────────────────

/// Declaration, hierarchy and body checks share one record type; the kind
/// says which rule was broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticErrorKind {
    RepeatedDeclaration,
    CircularInheritance,
    BadlyNamedConstructor,
    MultipleConstructorDeclarations,
    InvalidConstructorDeclaration,
    InvalidClassName,
    UndeclaredClass,
    InvalidMethodDeclaration,
    InvalidInheritance,
    InvalidRedefinition,
    InvalidClassDeclaration,
    TypeMismatch,
    InvalidOperator,
    InvalidCall,
    InvalidVariableAccess,
    InvalidAssignment,
    UnexpectedNullOperand,
    InvalidChaining,
    AccessToInstanceMemberFromStaticContext,
    InvalidReturn,
    InvalidVariableInitialization,
    InvalidSentence,
    MissingMain,
    MultipleMain,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Semantic error at line {line}: {message}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub message: String,
    pub lexeme: String,
    pub line: usize,
}

impl SemanticError {
    /// Build an error anchored at `token`.
    pub fn new<S: Into<String>>(kind: SemanticErrorKind, token: &Token, msg: S) -> Self {
        let message: String = msg.into();

        info!(
            "Creating Semantic error: kind={:?}, line={}, msg={}",
            kind, token.line, message
        );

        Self {
            kind,
            message,
            lexeme: token.lexeme.clone(),
            line: token.line,
        }
    }

    pub fn report(&self) -> String {
        format!("{}\n\n{}", self, trailer(&self.lexeme, self.line))
    }
}

fn trailer(lexeme: &str, line: usize) -> String {
    format!("[Error:{}|{}]", lexeme, line)
}

// ─────────────────────────────────────────────────────────────────────────────
// Crate-wide error
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical error type used throughout the compiler.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    #[error(transparent)]
    Syntactic(#[from] SyntacticError),

    #[error(transparent)]
    Semantic(#[from] SemanticError),

    /// The unit to compile does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting the source file.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl CompileError {
    /// Full diagnostic as printed by the command line driver.
    pub fn report(&self) -> String {
        match self {
            CompileError::Lexical(e) => e.report(),
            CompileError::Syntactic(e) => e.report(),
            CompileError::Semantic(e) => e.report(),
            CompileError::FileNotFound(_) => self.to_string(),
            CompileError::Io(e) => format!("I/O error: {}", e),
            CompileError::Utf8(e) => format!("Source is not valid UTF-8: {}", e),
        }
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, CompileError>;
