//! Module `scanner` implements the pull-based, finite-state lexer for MiniJava.
//!
//! Each call to [`Scanner::next_token`] starts in the idle state and runs the
//! automaton until an accepting state produces exactly one [`Token`], the
//! input is exhausted (an `EOF` token), or a lexical error is found.  The
//! scanner is also a `FusedIterator` that yields the `EOF` token once and
//! then stops.
//!
//! # States
//!
//! | State                       | Entered on          | Leaves with                          |
//! |-----------------------------|---------------------|--------------------------------------|
//! | `Idle`                      | every call          | first significant character          |
//! | `ClassIdentifier`           | uppercase letter    | `CLASS_IDENTIFIER`                   |
//! | `IdentifierOrKeyword`       | lowercase letter    | keyword or `MET_VAR_IDENTIFIER`      |
//! | `Integer`                   | digit               | `INTEGER_LITERAL` (≤ 9 digits)       |
//! | `PotentialComment`          | `/`                 | `DIVISION` or a comment state        |
//! | `SingleLineComment`         | `//`                | newline or end of file               |
//! | `MultiLineComment`          | `/*`                | `*`                                  |
//! | `ClosingMultiLineComment`   | `*` inside `/* */`  | `/` (done) or back to the comment    |
//! | `Char`                      | `'`                 | escape or the single character       |
//! | `EscapedChar`               | `'\`                | escaped character or `\u`            |
//! | `UnicodeEscape`             | `'\u`               | closing quote after 0 or 4 hex digits|
//! | `ClosingChar`               | one character read  | `CHAR_LITERAL`                       |
//! | `String`                    | `"`                 | `STRING_LITERAL`                     |
//! | `EscapedString`             | `\` inside a string | back to `String`                     |
//! | `Operator`                  | `< > = ! & \| + -`  | one or two character operator        |
//!
//! # Lookahead
//!
//! The character that ends a lexeme without belonging to it is pushed back
//! (one slot) and becomes the first character seen by the next call.  A
//! token's line is the line of its first character.
//!
//! # Errors
//!
//! Errors never retry: the offending character is consumed and the next call
//! starts again from the idle state, so a caller in diagnostic mode can keep
//! pulling tokens and collect every error of the unit.  The unterminated
//! comment error is fatal: every later call returns `EOF`.

use crate::error::{CompileError, LexicalError, LexicalErrorKind, Result};
use crate::source::CharSource;
use crate::token::{Token, TokenKind};
use log::{debug, info};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static keyword map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "extends"  => TokenKind::EXTENDS,
    "class"    => TokenKind::CLASS,
    "public"   => TokenKind::PUBLIC,
    "static"   => TokenKind::STATIC,
    "void"     => TokenKind::VOID,
    "boolean"  => TokenKind::BOOLEAN,
    "char"     => TokenKind::CHAR,
    "int"      => TokenKind::INT,
    "abstract" => TokenKind::ABSTRACT,
    "final"    => TokenKind::FINAL,
    "if"       => TokenKind::IF,
    "else"     => TokenKind::ELSE,
    "while"    => TokenKind::WHILE,
    "return"   => TokenKind::RETURN,
    "var"      => TokenKind::VAR,
    "this"     => TokenKind::THIS,
    "new"      => TokenKind::NEW,
    "null"     => TokenKind::NULL,
    "true"     => TokenKind::TRUE,
    "false"    => TokenKind::FALSE,
};

/// Longest accepted integer literal, in digits.
pub const MAX_INT_DIGITS: usize = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    ClassIdentifier,
    IdentifierOrKeyword,
    Integer,
    PotentialComment,
    SingleLineComment,
    MultiLineComment,
    ClosingMultiLineComment,
    Char,
    EscapedChar,
    UnicodeEscape { digits: u8 },
    ClosingChar,
    String,
    EscapedString,
    Operator,
}

/// A character together with the position it was read at.  `ch == None`
/// stands for end of file.
#[derive(Debug, Clone, Copy)]
struct Lookahead {
    ch: Option<char>,
    line: usize,
    column: usize,
}

/// The MiniJava lexer, generic over where its characters come from.
pub struct Scanner<S: CharSource> {
    source: S,
    lexeme: String,              // text of the lexeme being built
    pushed_back: Option<Lookahead>,
    start_line: usize,           // position of the lexeme's first character
    start_column: usize,
    halted: bool,                // fatal error seen, only EOF from now on
    done: bool,                  // EOF already yielded by the iterator
}

impl<S: CharSource> Scanner<S> {
    pub fn new(source: S) -> Self {
        info!("Scanner created");

        Self {
            source,
            lexeme: String::new(),
            pushed_back: None,
            start_line: 1,
            start_column: 1,
            halted: false,
            done: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Take the pushed back character if any, else pull from the source.
    #[inline(always)]
    fn read(&mut self) -> Result<Lookahead> {
        if let Some(look) = self.pushed_back.take() {
            return Ok(look);
        }

        let ch = self.source.next_char()?;

        Ok(Lookahead {
            ch,
            line: self.source.line(),
            column: self.source.column(),
        })
    }

    #[inline(always)]
    fn push_back(&mut self, look: Lookahead) {
        self.pushed_back = Some(look);
    }

    /// Position of the current lexeme's first character, for errors that
    /// concern the whole lexeme rather than the character just read.
    #[inline(always)]
    fn lexeme_start(&self) -> Lookahead {
        Lookahead {
            ch: None,
            line: self.start_line,
            column: self.start_column,
        }
    }

    /// Finish the current lexeme as a token of `kind`.
    #[inline(always)]
    fn token(&mut self, kind: TokenKind) -> Token {
        Token::new(kind, std::mem::take(&mut self.lexeme), self.start_line)
    }

    fn error<M: Into<String>>(
        &mut self,
        kind: LexicalErrorKind,
        look: Lookahead,
        message: M,
    ) -> CompileError {
        if let Some(c) = look.ch.filter(|c| *c != '\n') {
            self.lexeme.push(c);
        }

        LexicalError::new(
            kind,
            message,
            std::mem::take(&mut self.lexeme),
            look.line,
            look.column,
            self.source.line_text(),
        )
        .into()
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Run the automaton from the idle state until one token is accepted.
    pub fn next_token(&mut self) -> Result<Token> {
        if self.halted {
            return Ok(Token::eof(self.source.line()));
        }

        self.lexeme.clear();
        let mut state = State::Idle;

        loop {
            let look = self.read()?;

            match state {
                State::Idle => {
                    let Some(c) = look.ch else {
                        debug!("Reached end of input at line {}", look.line);

                        return Ok(Token::eof(look.line));
                    };

                    if c.is_whitespace() {
                        continue;
                    }

                    self.start_line = look.line;
                    self.start_column = look.column;
                    self.lexeme.push(c);

                    state = match c {
                        '%' => return Ok(self.token(TokenKind::MODULUS)),
                        '*' => return Ok(self.token(TokenKind::MULTIPLICATION)),
                        '(' => return Ok(self.token(TokenKind::LEFT_BRACKET)),
                        ')' => return Ok(self.token(TokenKind::RIGHT_BRACKET)),
                        '{' => return Ok(self.token(TokenKind::LEFT_CURLY_BRACKET)),
                        '}' => return Ok(self.token(TokenKind::RIGHT_CURLY_BRACKET)),
                        ';' => return Ok(self.token(TokenKind::SEMICOLON)),
                        ',' => return Ok(self.token(TokenKind::COMMA)),
                        '.' => return Ok(self.token(TokenKind::DOT)),
                        ':' => return Ok(self.token(TokenKind::COLON)),
                        '<' | '>' | '=' | '!' | '&' | '|' | '+' | '-' => State::Operator,
                        '/' => State::PotentialComment,
                        '\'' => State::Char,
                        '"' => State::String,
                        c if c.is_ascii_digit() => State::Integer,
                        c if c.is_uppercase() => State::ClassIdentifier,
                        c if c.is_lowercase() => State::IdentifierOrKeyword,
                        _ => {
                            self.lexeme.clear();

                            return Err(self.error(
                                LexicalErrorKind::InvalidSymbol,
                                look,
                                format!("'{}' is not a valid symbol", c.escape_default()),
                            ));
                        }
                    };
                }

                State::ClassIdentifier | State::IdentifierOrKeyword => match look.ch {
                    Some(c) if is_identifier_char(c) => self.lexeme.push(c),
                    _ => {
                        self.push_back(look);

                        let kind = if state == State::ClassIdentifier {
                            TokenKind::CLASS_IDENTIFIER
                        } else {
                            KEYWORDS
                                .get(self.lexeme.as_str())
                                .copied()
                                .unwrap_or(TokenKind::MET_VAR_IDENTIFIER)
                        };

                        return Ok(self.token(kind));
                    }
                },

                State::Integer => match look.ch {
                    Some(c) if c.is_ascii_digit() => self.lexeme.push(c),
                    _ => {
                        self.push_back(look);

                        if self.lexeme.len() > MAX_INT_DIGITS {
                            let digits = self.lexeme.len();

                            return Err(self.error(
                                LexicalErrorKind::IntLiteralTooLong,
                                self.lexeme_start(),
                                format!(
                                    "integer literal has {} digits, at most {} are allowed",
                                    digits, MAX_INT_DIGITS
                                ),
                            ));
                        }

                        return Ok(self.token(TokenKind::INTEGER_LITERAL));
                    }
                },

                // ── comments ─────────────────────────────────────────────
                State::PotentialComment => match look.ch {
                    Some('/') => {
                        self.lexeme.clear();
                        state = State::SingleLineComment;
                    }
                    Some('*') => {
                        self.lexeme.clear();
                        state = State::MultiLineComment;
                    }
                    _ => {
                        self.push_back(look);

                        return Ok(self.token(TokenKind::DIVISION));
                    }
                },

                State::SingleLineComment => match look.ch {
                    Some('\n') => state = State::Idle,
                    Some(_) => {}
                    None => {
                        self.push_back(look);
                        state = State::Idle;
                    }
                },

                State::MultiLineComment => match look.ch {
                    Some('*') => state = State::ClosingMultiLineComment,
                    Some(_) => {}
                    None => return Err(self.unterminated_comment(look)),
                },

                State::ClosingMultiLineComment => match look.ch {
                    Some('/') => state = State::Idle,
                    Some('*') => {}
                    Some(_) => state = State::MultiLineComment,
                    None => return Err(self.unterminated_comment(look)),
                },

                // ── char literals ────────────────────────────────────────
                State::Char => match look.ch {
                    Some('\'') => {
                        return Err(self.error(
                            LexicalErrorKind::EmptyChar,
                            look,
                            "empty char literal",
                        ))
                    }
                    Some('\\') => {
                        self.lexeme.push('\\');
                        state = State::EscapedChar;
                    }
                    Some('\n') => return Err(self.newline_in_char(look)),
                    Some(c) => {
                        self.lexeme.push(c);
                        state = State::ClosingChar;
                    }
                    None => return Err(self.unterminated_char(look)),
                },

                State::EscapedChar => match look.ch {
                    Some(' ') | Some('\t') => {
                        return Err(self.error(
                            LexicalErrorKind::InvalidEscape,
                            look,
                            "spaces and tabs cannot be escaped",
                        ))
                    }
                    Some('u') => {
                        self.lexeme.push('u');
                        state = State::UnicodeEscape { digits: 0 };
                    }
                    Some('\n') => return Err(self.newline_in_char(look)),
                    Some(c) => {
                        self.lexeme.push(c);
                        state = State::ClosingChar;
                    }
                    None => return Err(self.unterminated_char(look)),
                },

                State::UnicodeEscape { digits } => match look.ch {
                    Some('\'') if digits == 0 || digits == 4 => {
                        self.lexeme.push('\'');

                        return Ok(self.token(TokenKind::CHAR_LITERAL));
                    }
                    Some(c) if c.is_ascii_hexdigit() && digits < 4 => {
                        self.lexeme.push(c);
                        state = State::UnicodeEscape { digits: digits + 1 };
                    }
                    Some('\n') => return Err(self.newline_in_char(look)),
                    Some(_) => {
                        return Err(self.error(
                            LexicalErrorKind::InvalidUnicodeEscape,
                            look,
                            "a unicode escape takes exactly four hexadecimal digits",
                        ))
                    }
                    None => return Err(self.unterminated_char(look)),
                },

                State::ClosingChar => match look.ch {
                    Some('\'') => {
                        self.lexeme.push('\'');

                        return Ok(self.token(TokenKind::CHAR_LITERAL));
                    }
                    Some('\n') => return Err(self.newline_in_char(look)),
                    Some(_) => {
                        return Err(self.error(
                            LexicalErrorKind::MultiCharLiteral,
                            look,
                            "a char literal holds a single character",
                        ))
                    }
                    None => return Err(self.unterminated_char(look)),
                },

                // ── string literals ──────────────────────────────────────
                State::String => match look.ch {
                    Some('"') => {
                        self.lexeme.push('"');

                        return Ok(self.token(TokenKind::STRING_LITERAL));
                    }
                    Some('\\') => {
                        self.lexeme.push('\\');
                        state = State::EscapedString;
                    }
                    Some('\n') | None => return Err(self.unterminated_string(look)),
                    Some(c) => self.lexeme.push(c),
                },

                State::EscapedString => match look.ch {
                    Some(' ') | Some('\t') => {
                        return Err(self.error(
                            LexicalErrorKind::InvalidEscape,
                            look,
                            "spaces and tabs cannot be escaped",
                        ))
                    }
                    Some('\n') | None => return Err(self.unterminated_string(look)),
                    Some(c) => {
                        self.lexeme.push(c);
                        state = State::String;
                    }
                },

                // ── operators ────────────────────────────────────────────
                State::Operator => {
                    let first = self.lexeme.chars().next().unwrap_or_default();

                    let compound = match (first, look.ch) {
                        ('<', Some('=')) => Some(TokenKind::LESS_THAN_OR_EQUAL),
                        ('>', Some('=')) => Some(TokenKind::GREATER_THAN_OR_EQUAL),
                        ('=', Some('=')) => Some(TokenKind::EQUALS),
                        ('!', Some('=')) => Some(TokenKind::DIFFERENT),
                        ('&', Some('&')) => Some(TokenKind::AND),
                        ('|', Some('|')) => Some(TokenKind::OR),
                        ('+', Some('+')) => Some(TokenKind::INCREMENT),
                        ('-', Some('-')) => Some(TokenKind::DECREMENT),
                        _ => None,
                    };

                    if let Some(kind) = compound {
                        self.lexeme.extend(look.ch);

                        return Ok(self.token(kind));
                    }

                    self.push_back(look);

                    let kind = match first {
                        '<' => TokenKind::LESS_THAN,
                        '>' => TokenKind::GREATER_THAN,
                        '=' => TokenKind::ASSIGNMENT,
                        '!' => TokenKind::NOT,
                        '+' => TokenKind::ADDITION,
                        '-' => TokenKind::SUBTRACTION,
                        _ => {
                            return Err(self.error(
                                LexicalErrorKind::UnterminatedCompoundOperator,
                                self.lexeme_start(),
                                format!("'{}' must be followed by '{}'", first, first),
                            ))
                        }
                    };

                    return Ok(self.token(kind));
                }
            }
        }
    }

    fn unterminated_comment(&mut self, look: Lookahead) -> CompileError {
        self.halted = true;

        self.error(
            LexicalErrorKind::UnterminatedComment,
            look,
            "multi-line comment is never closed",
        )
    }

    fn unterminated_char(&mut self, look: Lookahead) -> CompileError {
        self.error(
            LexicalErrorKind::UnterminatedChar,
            look,
            "char literal is never closed",
        )
    }

    fn newline_in_char(&mut self, look: Lookahead) -> CompileError {
        self.error(
            LexicalErrorKind::NewLineInChar,
            look,
            "char literals cannot contain line breaks",
        )
    }

    fn unterminated_string(&mut self, look: Lookahead) -> CompileError {
        self.error(
            LexicalErrorKind::UnterminatedString,
            look,
            "string literal is never closed",
        )
    }
}

/// Continuation characters of both identifier kinds.
#[inline(always)]
fn is_identifier_char(c: char) -> bool {
    c.is_uppercase() || c.is_lowercase() || c.is_ascii_digit() || c == '_'
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<S: CharSource> Iterator for Scanner<S> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.next_token();

        match &result {
            Ok(token) if token.kind == TokenKind::EOF => self.done = true,
            Err(CompileError::Io(_)) => self.done = true,
            _ => {}
        }

        Some(result)
    }
}

impl<S: CharSource> FusedIterator for Scanner<S> {}
