//! Program tree for method and constructor bodies.
//!
//! Every node family is a closed enum; shared data lives in small records
//! (`Reference`, `Block`).  Nodes own their children and keep the tokens
//! needed to anchor diagnostics.

use crate::token::{Token, TokenKind};

/// Infix operators, in the grammar's order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Or,
    And,
    Equals,
    Different,
    Less,
    Greater,
    LessOrEqual,
    GreaterOrEqual,
    Addition,
    Subtraction,
    Multiplication,
    Division,
    Modulus,
}

impl BinaryOperator {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::OR => BinaryOperator::Or,
            TokenKind::AND => BinaryOperator::And,
            TokenKind::EQUALS => BinaryOperator::Equals,
            TokenKind::DIFFERENT => BinaryOperator::Different,
            TokenKind::LESS_THAN => BinaryOperator::Less,
            TokenKind::GREATER_THAN => BinaryOperator::Greater,
            TokenKind::LESS_THAN_OR_EQUAL => BinaryOperator::LessOrEqual,
            TokenKind::GREATER_THAN_OR_EQUAL => BinaryOperator::GreaterOrEqual,
            TokenKind::ADDITION => BinaryOperator::Addition,
            TokenKind::SUBTRACTION => BinaryOperator::Subtraction,
            TokenKind::MULTIPLICATION => BinaryOperator::Multiplication,
            TokenKind::DIVISION => BinaryOperator::Division,
            TokenKind::MODULUS => BinaryOperator::Modulus,
            _ => return None,
        };

        Some(op)
    }

    /// `|| &&`
    pub fn is_logical(self) -> bool {
        matches!(self, BinaryOperator::Or | BinaryOperator::And)
    }

    /// `+ - * / %`
    pub fn is_arithmetic(self) -> bool {
        matches!(
            self,
            BinaryOperator::Addition
                | BinaryOperator::Subtraction
                | BinaryOperator::Multiplication
                | BinaryOperator::Division
                | BinaryOperator::Modulus
        )
    }

    /// `< > <= >=`
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOperator::Less
                | BinaryOperator::Greater
                | BinaryOperator::LessOrEqual
                | BinaryOperator::GreaterOrEqual
        )
    }

    /// `== !=`
    pub fn is_equality(self) -> bool {
        matches!(self, BinaryOperator::Equals | BinaryOperator::Different)
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Plus,
    Increment,
    Minus,
    Decrement,
    Not,
}

impl UnaryOperator {
    pub fn from_kind(kind: TokenKind) -> Option<Self> {
        let op = match kind {
            TokenKind::ADDITION => UnaryOperator::Plus,
            TokenKind::INCREMENT => UnaryOperator::Increment,
            TokenKind::SUBTRACTION => UnaryOperator::Minus,
            TokenKind::DECREMENT => UnaryOperator::Decrement,
            TokenKind::NOT => UnaryOperator::Not,
            _ => return None,
        };

        Some(op)
    }
}

/// A literal operand: `null true false 42 'c'`.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null(Token),
    True(Token),
    False(Token),
    Int(Token),
    Char(Token),
}

impl Literal {
    pub fn token(&self) -> &Token {
        match self {
            Literal::Null(t) | Literal::True(t) | Literal::False(t) | Literal::Int(t) | Literal::Char(t) => t,
        }
    }
}

/// Head of an access chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Primary {
    /// `this`
    This(Token),

    /// `"text"`
    StringLiteral(Token),

    /// `name` resolved against locals, parameters and attributes.
    VariableAccess(Token),

    /// `name(args)` on the enclosing class.
    MethodCall { name: Token, arguments: Vec<Expr> },

    /// `new Class(args)`
    ConstructorCall { class: Token, arguments: Vec<Expr> },

    /// `Class.name(args)`
    StaticMethodCall {
        class: Token,
        name: Token,
        arguments: Vec<Expr>,
    },

    /// `( expression )`
    Parenthesized { open: Token, expression: Box<Expr> },
}

impl Primary {
    pub fn token(&self) -> &Token {
        match self {
            Primary::This(t) | Primary::StringLiteral(t) | Primary::VariableAccess(t) => t,
            Primary::MethodCall { name, .. } => name,
            Primary::ConstructorCall { class, .. } => class,
            Primary::StaticMethodCall { name, .. } => name,
            Primary::Parenthesized { open, .. } => open,
        }
    }
}

/// One `.name` or `.name(args)` link of a chain.
#[derive(Debug, Clone, PartialEq)]
pub enum ChainLink {
    Attribute(Token),
    Method { name: Token, arguments: Vec<Expr> },
}

impl ChainLink {
    pub fn token(&self) -> &Token {
        match self {
            ChainLink::Attribute(name) | ChainLink::Method { name, .. } => name,
        }
    }
}

/// `primary.link.link…`
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    pub primary: Primary,
    pub chain: Vec<ChainLink>,
}

impl Reference {
    /// Whether the reference denotes a variable slot (a plain variable or an
    /// attribute at the end of the chain).
    pub fn ends_in_variable(&self) -> bool {
        match self.chain.last() {
            Some(link) => matches!(link, ChainLink::Attribute(_)),
            None => matches!(self.primary, Primary::VariableAccess(_)),
        }
    }

    /// Whether the reference ends in a method or constructor call.
    pub fn ends_in_call(&self) -> bool {
        match self.chain.last() {
            Some(link) => matches!(link, ChainLink::Method { .. }),
            None => matches!(
                self.primary,
                Primary::MethodCall { .. }
                    | Primary::StaticMethodCall { .. }
                    | Primary::ConstructorCall { .. }
            ),
        }
    }
}

/// Expression nodes.  Binary chains nest to the right, without precedence.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `target = value`
    Assignment {
        target: Box<Expr>,
        operator: Token,
        value: Box<Expr>,
    },

    /// `left op right`
    Binary {
        left: Box<Expr>,
        operator: BinaryOperator,
        token: Token,
        right: Box<Expr>,
    },

    /// `op operand`
    Unary {
        operator: UnaryOperator,
        token: Token,
        operand: Box<Expr>,
    },

    Literal(Literal),

    Reference(Reference),
}

impl Expr {
    /// Token used to anchor diagnostics about this expression.
    pub fn token(&self) -> &Token {
        match self {
            Expr::Assignment { operator, .. } => operator,
            Expr::Binary { token, .. } => token,
            Expr::Unary { token, .. } => token,
            Expr::Literal(literal) => literal.token(),
            Expr::Reference(reference) => reference.primary.token(),
        }
    }
}

/// `{ statements }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub open: Token,
    pub statements: Vec<Stmt>,
}

/// Statement nodes.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// A lone `;`.
    Empty(Token),

    /// `expression ;`
    Expression(Expr),

    /// `var name = initializer ;`
    LocalVariable {
        keyword: Token,
        name: Token,
        initializer: Expr,
    },

    /// `return value? ;`
    Return { keyword: Token, value: Option<Expr> },

    If {
        keyword: Token,
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<(Token, Box<Stmt>)>,
    },

    While {
        keyword: Token,
        condition: Expr,
        body: Box<Stmt>,
    },

    Block(Block),
}
