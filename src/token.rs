use log::debug;
use serde::Serialize;
use std::fmt;

/// The terminals of the MiniJava grammar.
///
/// Variant names double as the `KIND` column of the debug token rendering
/// `(KIND, lexeme, line)`, which is why they keep the screaming case.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    /// End-of-file marker (empty lexeme)
    EOF,

    // ── punctuation ─────────────────────────────────────────────────────
    /// '('
    LEFT_BRACKET,

    /// ')'
    RIGHT_BRACKET,

    /// '{'
    LEFT_CURLY_BRACKET,

    /// '}'
    RIGHT_CURLY_BRACKET,

    /// ';'
    SEMICOLON,

    /// ','
    COMMA,

    /// ':'
    COLON,

    /// '.'
    DOT,

    // ── operators ───────────────────────────────────────────────────────
    /// '%'
    MODULUS,

    /// '*'
    MULTIPLICATION,

    /// '/'
    DIVISION,

    /// '>'
    GREATER_THAN,

    /// '>='
    GREATER_THAN_OR_EQUAL,

    /// '<'
    LESS_THAN,

    /// '<='
    LESS_THAN_OR_EQUAL,

    /// '='
    ASSIGNMENT,

    /// '=='
    EQUALS,

    /// '!='
    DIFFERENT,

    /// '!'
    NOT,

    /// '&&'
    AND,

    /// '||'
    OR,

    /// '+'
    ADDITION,

    /// '++'
    INCREMENT,

    /// '-'
    SUBTRACTION,

    /// '--'
    DECREMENT,

    // ── identifiers and literals ────────────────────────────────────────
    /// Identifier starting with an uppercase letter
    CLASS_IDENTIFIER,

    /// Identifier starting with a lowercase letter
    MET_VAR_IDENTIFIER,

    /// Decimal integer literal, at most nine digits
    INTEGER_LITERAL,

    /// Character literal, lexeme keeps the quotes
    CHAR_LITERAL,

    /// String literal, lexeme keeps the quotes
    STRING_LITERAL,

    // ── keywords ────────────────────────────────────────────────────────
    EXTENDS,
    CLASS,
    PUBLIC,
    STATIC,
    VOID,
    BOOLEAN,
    CHAR,
    INT,
    ABSTRACT,
    FINAL,
    IF,
    ELSE,
    WHILE,
    RETURN,
    VAR,
    THIS,
    NEW,
    NULL,
    TRUE,
    FALSE,
}

impl TokenKind {
    /// How the terminal is spelled in source, used when listing what the
    /// parser expected.  Open classes (identifiers, literals) get a
    /// descriptive placeholder instead.
    pub const fn describe(self) -> &'static str {
        match self {
            TokenKind::EOF => "end of file",
            TokenKind::LEFT_BRACKET => "(",
            TokenKind::RIGHT_BRACKET => ")",
            TokenKind::LEFT_CURLY_BRACKET => "{",
            TokenKind::RIGHT_CURLY_BRACKET => "}",
            TokenKind::SEMICOLON => ";",
            TokenKind::COMMA => ",",
            TokenKind::COLON => ":",
            TokenKind::DOT => ".",
            TokenKind::MODULUS => "%",
            TokenKind::MULTIPLICATION => "*",
            TokenKind::DIVISION => "/",
            TokenKind::GREATER_THAN => ">",
            TokenKind::GREATER_THAN_OR_EQUAL => ">=",
            TokenKind::LESS_THAN => "<",
            TokenKind::LESS_THAN_OR_EQUAL => "<=",
            TokenKind::ASSIGNMENT => "=",
            TokenKind::EQUALS => "==",
            TokenKind::DIFFERENT => "!=",
            TokenKind::NOT => "!",
            TokenKind::AND => "&&",
            TokenKind::OR => "||",
            TokenKind::ADDITION => "+",
            TokenKind::INCREMENT => "++",
            TokenKind::SUBTRACTION => "-",
            TokenKind::DECREMENT => "--",
            TokenKind::CLASS_IDENTIFIER => "class identifier",
            TokenKind::MET_VAR_IDENTIFIER => "method or variable identifier",
            TokenKind::INTEGER_LITERAL => "integer literal",
            TokenKind::CHAR_LITERAL => "char literal",
            TokenKind::STRING_LITERAL => "string literal",
            TokenKind::EXTENDS => "extends",
            TokenKind::CLASS => "class",
            TokenKind::PUBLIC => "public",
            TokenKind::STATIC => "static",
            TokenKind::VOID => "void",
            TokenKind::BOOLEAN => "boolean",
            TokenKind::CHAR => "char",
            TokenKind::INT => "int",
            TokenKind::ABSTRACT => "abstract",
            TokenKind::FINAL => "final",
            TokenKind::IF => "if",
            TokenKind::ELSE => "else",
            TokenKind::WHILE => "while",
            TokenKind::RETURN => "return",
            TokenKind::VAR => "var",
            TokenKind::THIS => "this",
            TokenKind::NEW => "new",
            TokenKind::NULL => "null",
            TokenKind::TRUE => "true",
            TokenKind::FALSE => "false",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A scanned token: its kind, the exact source text and the line of its
/// first character.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    /// The category of this token.
    pub kind: TokenKind,

    /// The exact source text that produced this token.
    pub lexeme: String,

    /// 1‑based line number in the source.
    pub line: usize,
}

impl Token {
    /// Create a new Token with the given kind, lexeme, and line.
    pub fn new<S: Into<String>>(kind: TokenKind, lexeme: S, line: usize) -> Self {
        let lexeme: String = lexeme.into();

        debug!(
            "Creating new token: kind={:?}, lexeme={}, line={}",
            kind, lexeme, line
        );

        Self { kind, lexeme, line }
    }

    /// The end-of-file token closing every stream.
    pub fn eof(line: usize) -> Self {
        Self::new(TokenKind::EOF, "", line)
    }

    /// Tokens for members of the built-in classes, which have no source line.
    pub(crate) fn synthetic(kind: TokenKind, lexeme: &str) -> Self {
        Self {
            kind,
            lexeme: lexeme.to_owned(),
            line: 0,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.kind, self.lexeme, self.line)
    }
}
