/*!
Parse listener that turns the derivation into declarations and bodies.

The predictive driver never calls back into productions, so the tree is
assembled bottom-up from its notifications:

* every matched terminal is pushed on a value stack as an [`Item::Token`];
* every expansion records a *frame*: the nonterminal and the height of the
  value stack at that point;
* every completion splits the stack at the frame's height and folds the
  children into a single item (or nothing, for members and classes, which go
  straight into the symbol table).

Nonterminals that only forward their children (`Type`, `OptionalElse`,
`RestOfReference`, …) leave them in place, so their parent sees the flat
sequence.  Their completion only pops the frame: a right-recursive list
(`SentenceList`, `RestOfCompoundExpression`, `MemberList`) is split once,
by the frame that folds it, and building stays linear in the token count.

Class headers are registered when the class's `{` is matched, before any
member is built, so member checks can see the class's modifier.

### Logging Policy

| Location                   | Level   | Purpose                               |
|----------------------------|---------|---------------------------------------|
| Class and member insertion | `info`  | Declarations entering the table.      |
| Folds                      | `debug` | Trace of the built nodes.             |
*/

use log::{debug, info};

use crate::ast::{
    BinaryOperator, Block, ChainLink, Expr, Literal, Primary, Reference, Stmt, UnaryOperator,
};
use crate::error::{Result, SemanticError, SemanticErrorKind};
use crate::grammar::NonTerminal;
use crate::parser::ParseListener;
use crate::symbols::{
    Attribute, Class, Constructor, FormalArgument, Method, Modifier, SymbolTable,
};
use crate::token::{Token, TokenKind};

/// Partially built node on the value stack.
#[derive(Debug)]
enum Item {
    Token(Token),
    Param(FormalArgument),
    Params(Vec<FormalArgument>),
    /// `OptionalBlock`: a body, or `;`.
    Body(Option<Block>),
    Block(Block),
    Stmt(Stmt),
    Expr(Expr),
    Primary(Primary),
    Link(ChainLink),
    Arguments(Vec<Expr>),
}

/// Builds the [`SymbolTable`] of one unit while it is being parsed.
pub struct Builder {
    table: SymbolTable,
    items: Vec<Item>,
    frames: Vec<(NonTerminal, usize)>,
    class: Option<String>,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    pub fn new() -> Self {
        Self {
            table: SymbolTable::new(),
            items: Vec::new(),
            frames: Vec::new(),
            class: None,
        }
    }

    /// The table built so far.
    pub fn finish(self) -> SymbolTable {
        self.table
    }

    fn current_class(&mut self) -> &mut Class {
        let Some(class) = self.class.as_deref().and_then(|name| self.table.class_mut(name)) else {
            unreachable!("member outside of a class body");
        };

        class
    }

    fn current_class_name(&self) -> String {
        self.class.clone().unwrap_or_default()
    }

    // ───────────────────────────── class header ─────────────────────────────

    /// `modifier? class Name (extends Parent)?` followed by `{`.
    fn declare_class(&mut self, header: Vec<Item>) -> Result<()> {
        let tokens: Vec<Token> = header.into_iter().map(into_token).collect();

        let (modifier, rest) = match tokens.split_first() {
            Some((first, rest)) if first.kind != TokenKind::CLASS => {
                (Modifier::from_kind(first.kind), rest)
            }
            _ => (None, &tokens[..]),
        };

        let (name, parent) = match rest {
            [_, name] => (name.clone(), None),
            [_, name, _, parent] => (name.clone(), Some(parent.clone())),
            _ => unreachable!("malformed class header"),
        };

        if let Some(parent) = &parent {
            if parent.lexeme == name.lexeme {
                return Err(SemanticError::new(
                    SemanticErrorKind::CircularInheritance,
                    parent,
                    format!("class {} cannot extend itself", name.lexeme),
                )
                .into());
            }
        }

        info!("Class header {} (parent: {:?})", name.lexeme, parent.as_ref().map(|p| &p.lexeme));

        self.class = Some(name.lexeme.clone());
        self.table.declare_class(Class::new(name, modifier, parent))?;

        Ok(())
    }

    // ───────────────────────────── members ──────────────────────────────────

    fn declare_member(&mut self, children: Vec<Item>) -> Result<()> {
        let mut children = children.into_iter();

        let Some(Item::Token(first)) = children.next() else {
            unreachable!("member starts with a terminal");
        };

        match first.kind {
            TokenKind::PUBLIC => {
                let (name, params, body) = match (children.next(), children.next(), children.next()) {
                    (Some(Item::Token(name)), Some(Item::Params(params)), Some(Item::Block(body))) => {
                        (name, params, body)
                    }
                    _ => unreachable!("malformed constructor"),
                };

                self.declare_constructor(name, params, body)
            }

            TokenKind::ABSTRACT | TokenKind::STATIC | TokenKind::FINAL => {
                let (return_type, name, params, body) =
                    match (children.next(), children.next(), children.next(), children.next()) {
                        (
                            Some(Item::Token(return_type)),
                            Some(Item::Token(name)),
                            Some(Item::Params(params)),
                            Some(Item::Body(body)),
                        ) => (return_type, name, params, body),
                        _ => unreachable!("malformed modified method"),
                    };

                self.declare_method(Modifier::from_kind(first.kind), return_type, name, params, body)
            }

            _ => {
                let name = match children.next() {
                    Some(Item::Token(name)) => name,
                    _ => unreachable!("member without a name"),
                };

                match (children.next(), children.next()) {
                    (Some(Item::Token(_)), None) => self.declare_attribute(first, name),
                    (Some(Item::Params(params)), Some(Item::Body(body))) => {
                        self.declare_method(None, first, name, params, body)
                    }
                    _ => unreachable!("malformed member"),
                }
            }
        }
    }

    fn declare_attribute(&mut self, ty: Token, name: Token) -> Result<()> {
        let owner = self.current_class_name();

        info!("Attribute {}.{}", owner, name.lexeme);

        self.current_class()
            .add_attribute(Attribute { name, ty, owner })?;

        Ok(())
    }

    fn declare_constructor(
        &mut self,
        name: Token,
        params: Vec<FormalArgument>,
        body: Block,
    ) -> Result<()> {
        let owner = self.current_class_name();

        if name.lexeme != owner {
            return Err(SemanticError::new(
                SemanticErrorKind::BadlyNamedConstructor,
                &name,
                format!("constructor of class {} is named {}", owner, name.lexeme),
            )
            .into());
        }

        if self.current_class().is_abstract() {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidConstructorDeclaration,
                &name,
                format!("abstract class {} cannot declare a constructor", owner),
            )
            .into());
        }

        info!("Constructor {}({} params)", owner, params.len());

        self.current_class().set_constructor(Constructor {
            name,
            params,
            body,
            owner,
        })?;

        Ok(())
    }

    fn declare_method(
        &mut self,
        modifier: Option<Modifier>,
        return_type: Token,
        name: Token,
        params: Vec<FormalArgument>,
        body: Option<Block>,
    ) -> Result<()> {
        let owner = self.current_class_name();
        let is_abstract = modifier == Some(Modifier::Abstract);

        let problem = match (is_abstract, body.is_some()) {
            (true, true) => Some("an abstract method cannot have a body"),
            (false, false) => Some("a non-abstract method must have a body"),
            (true, false) if !self.current_class().is_abstract() => {
                Some("abstract methods are only allowed in abstract classes")
            }
            _ => None,
        };

        if let Some(problem) = problem {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidMethodDeclaration,
                &name,
                format!("method {}.{}: {}", owner, name.lexeme, problem),
            )
            .into());
        }

        info!("Method {}.{}({} params)", owner, name.lexeme, params.len());

        self.current_class().add_method(Method {
            name,
            modifier,
            return_type,
            params,
            body,
            owner,
        })?;

        Ok(())
    }

    // ───────────────────────────── folds ────────────────────────────────────

    fn fold(&mut self, non_terminal: NonTerminal, children: Vec<Item>) -> Result<Option<Item>> {
        use NonTerminal as N;

        let item = match non_terminal {
            N::Initial | N::Class => {
                self.class = None;
                return Ok(None);
            }

            N::Member => {
                self.declare_member(children)?;
                return Ok(None);
            }

            N::FormalArgument => match <[Item; 2]>::try_from(children) {
                Ok([Item::Token(ty), Item::Token(name)]) => Item::Param(FormalArgument { name, ty }),
                _ => unreachable!("malformed formal argument"),
            },

            N::FormalArguments => {
                let mut params: Vec<FormalArgument> = Vec::new();

                for child in children {
                    if let Item::Param(param) = child {
                        if params.iter().any(|p| p.name.lexeme == param.name.lexeme) {
                            return Err(SemanticError::new(
                                SemanticErrorKind::RepeatedDeclaration,
                                &param.name,
                                format!("parameter '{}' is declared twice", param.name.lexeme),
                            )
                            .into());
                        }

                        params.push(param);
                    }
                }

                Item::Params(params)
            }

            N::OptionalBlock => match children.into_iter().next() {
                Some(Item::Block(block)) => Item::Body(Some(block)),
                _ => Item::Body(None),
            },

            N::Block => {
                let mut children = children.into_iter();
                let open = into_token(children.next().unwrap_or_else(|| unreachable!("block without '{{'")));

                let statements = children
                    .filter_map(|child| match child {
                        Item::Stmt(stmt) => Some(stmt),
                        _ => None,
                    })
                    .collect();

                Item::Block(Block { open, statements })
            }

            N::Sentence => {
                let stmt = match children.into_iter().next() {
                    Some(Item::Token(semicolon)) => Stmt::Empty(semicolon),
                    Some(Item::Expr(expr)) => Stmt::Expression(expr),
                    Some(Item::Stmt(stmt)) => stmt,
                    Some(Item::Block(block)) => Stmt::Block(block),
                    _ => unreachable!("malformed sentence"),
                };

                Item::Stmt(stmt)
            }

            N::LocalVariable => match <[Item; 4]>::try_from(children) {
                Ok([Item::Token(keyword), Item::Token(name), Item::Token(_), Item::Expr(initializer)]) => {
                    Item::Stmt(Stmt::LocalVariable {
                        keyword,
                        name,
                        initializer,
                    })
                }
                _ => unreachable!("malformed local variable"),
            },

            N::Return => {
                let mut children = children.into_iter();
                let keyword = into_token(children.next().unwrap_or_else(|| unreachable!("return without keyword")));
                let value = children.next().map(into_expr);

                Item::Stmt(Stmt::Return { keyword, value })
            }

            N::If => {
                let mut children = children.into_iter();
                let keyword = into_token(children.next().unwrap_or_else(|| unreachable!("if without keyword")));
                let condition = into_expr(children.nth(1).unwrap_or_else(|| unreachable!("if without condition")));
                let then_branch = Box::new(into_stmt(
                    children.nth(1).unwrap_or_else(|| unreachable!("if without body")),
                ));

                let else_branch = match (children.next(), children.next()) {
                    (Some(Item::Token(keyword)), Some(Item::Stmt(stmt))) => Some((keyword, Box::new(stmt))),
                    _ => None,
                };

                Item::Stmt(Stmt::If {
                    keyword,
                    condition,
                    then_branch,
                    else_branch,
                })
            }

            N::While => match <[Item; 5]>::try_from(children) {
                Ok([Item::Token(keyword), _, Item::Expr(condition), _, Item::Stmt(body)]) => {
                    Item::Stmt(Stmt::While {
                        keyword,
                        condition,
                        body: Box::new(body),
                    })
                }
                _ => unreachable!("malformed while"),
            },

            N::Expression => {
                let mut children = children.into_iter();
                let target = into_expr(children.next().unwrap_or_else(|| unreachable!("empty expression")));

                match (children.next(), children.next()) {
                    (Some(Item::Token(operator)), Some(Item::Expr(value))) => Item::Expr(Expr::Assignment {
                        target: Box::new(target),
                        operator,
                        value: Box::new(value),
                    }),
                    _ => Item::Expr(target),
                }
            }

            N::CompoundExpression => Item::Expr(fold_binary(children)),

            N::BasicExpression => {
                let mut children = children.into_iter();

                match (children.next(), children.next()) {
                    (Some(Item::Token(token)), Some(Item::Expr(operand))) => {
                        let Some(operator) = UnaryOperator::from_kind(token.kind) else {
                            unreachable!("invalid unary operator");
                        };

                        Item::Expr(Expr::Unary {
                            operator,
                            token,
                            operand: Box::new(operand),
                        })
                    }
                    (Some(Item::Expr(expr)), None) => Item::Expr(expr),
                    _ => unreachable!("malformed basic expression"),
                }
            }

            N::Primitive => {
                let token = into_token(children.into_iter().next().unwrap_or_else(|| unreachable!("empty literal")));

                let literal = match token.kind {
                    TokenKind::NULL => Literal::Null(token),
                    TokenKind::TRUE => Literal::True(token),
                    TokenKind::FALSE => Literal::False(token),
                    TokenKind::INTEGER_LITERAL => Literal::Int(token),
                    TokenKind::CHAR_LITERAL => Literal::Char(token),
                    _ => unreachable!("invalid literal"),
                };

                Item::Expr(Expr::Literal(literal))
            }

            N::Reference => {
                let mut children = children.into_iter();

                let Some(Item::Primary(primary)) = children.next() else {
                    unreachable!("reference without a primary");
                };

                let chain = children
                    .filter_map(|child| match child {
                        Item::Link(link) => Some(link),
                        _ => None,
                    })
                    .collect();

                Item::Expr(Expr::Reference(Reference { primary, chain }))
            }

            N::Primary => match children.into_iter().next() {
                Some(Item::Token(token)) if token.kind == TokenKind::THIS => Item::Primary(Primary::This(token)),
                Some(Item::Token(token)) => Item::Primary(Primary::StringLiteral(token)),
                Some(primary @ Item::Primary(_)) => primary,
                _ => unreachable!("malformed primary"),
            },

            N::VarAccessOrMetCall => {
                let mut children = children.into_iter();
                let name = into_token(children.next().unwrap_or_else(|| unreachable!("access without a name")));

                match children.next() {
                    Some(Item::Arguments(arguments)) => Item::Primary(Primary::MethodCall { name, arguments }),
                    _ => Item::Primary(Primary::VariableAccess(name)),
                }
            }

            N::ConstructorCall => match <[Item; 3]>::try_from(children) {
                Ok([_, Item::Token(class), Item::Arguments(arguments)]) => {
                    Item::Primary(Primary::ConstructorCall { class, arguments })
                }
                _ => unreachable!("malformed constructor call"),
            },

            N::StaticMethodCall => match <[Item; 4]>::try_from(children) {
                Ok([Item::Token(class), _, Item::Token(name), Item::Arguments(arguments)]) => {
                    Item::Primary(Primary::StaticMethodCall {
                        class,
                        name,
                        arguments,
                    })
                }
                _ => unreachable!("malformed static method call"),
            },

            N::ParenthesizedExpression => match <[Item; 3]>::try_from(children) {
                Ok([Item::Token(open), Item::Expr(expression), _]) => Item::Primary(Primary::Parenthesized {
                    open,
                    expression: Box::new(expression),
                }),
                _ => unreachable!("malformed parenthesized expression"),
            },

            N::ActualArguments => Item::Arguments(
                children
                    .into_iter()
                    .filter_map(|child| match child {
                        Item::Expr(expr) => Some(expr),
                        _ => None,
                    })
                    .collect(),
            ),

            N::ChainedMetVar => {
                let mut children = children.into_iter();
                let name = into_token(children.nth(1).unwrap_or_else(|| unreachable!("chain without a name")));

                match children.next() {
                    Some(Item::Arguments(arguments)) => Item::Link(ChainLink::Method { name, arguments }),
                    _ => Item::Link(ChainLink::Attribute(name)),
                }
            }

            _ => unreachable!("{:?} only forwards its children", non_terminal),
        };

        debug!("Folded {:?}", non_terminal);

        Ok(Some(item))
    }
}

/// Whether `non_terminal` builds something from its children.  The others
/// leave their children on the value stack for the enclosing frame.
fn folds(non_terminal: NonTerminal) -> bool {
    use NonTerminal as N;

    matches!(
        non_terminal,
        N::Initial
            | N::Class
            | N::Member
            | N::FormalArgument
            | N::FormalArguments
            | N::OptionalBlock
            | N::Block
            | N::Sentence
            | N::LocalVariable
            | N::Return
            | N::If
            | N::While
            | N::Expression
            | N::CompoundExpression
            | N::BasicExpression
            | N::Primitive
            | N::Reference
            | N::Primary
            | N::VarAccessOrMetCall
            | N::ConstructorCall
            | N::StaticMethodCall
            | N::ParenthesizedExpression
            | N::ActualArguments
            | N::ChainedMetVar
    )
}

fn into_token(item: Item) -> Token {
    match item {
        Item::Token(token) => token,
        other => unreachable!("expected a terminal, found {:?}", other),
    }
}

fn into_expr(item: Item) -> Expr {
    match item {
        Item::Expr(expr) => expr,
        other => unreachable!("expected an expression, found {:?}", other),
    }
}

fn into_stmt(item: Item) -> Stmt {
    match item {
        Item::Stmt(stmt) => stmt,
        other => unreachable!("expected a statement, found {:?}", other),
    }
}

/// `e0 op1 e1 op2 e2 …` nested to the right: `e0 op1 (e1 op2 (e2 …))`.
fn fold_binary(children: Vec<Item>) -> Expr {
    let mut operands = Vec::new();
    let mut operators = Vec::new();

    for child in children {
        match child {
            Item::Expr(expr) => operands.push(expr),
            Item::Token(token) => operators.push(token),
            other => unreachable!("unexpected {:?} in a compound expression", other),
        }
    }

    let Some(mut result) = operands.pop() else {
        unreachable!("compound expression without operands");
    };

    while let (Some(left), Some(token)) = (operands.pop(), operators.pop()) {
        let Some(operator) = BinaryOperator::from_kind(token.kind) else {
            unreachable!("invalid binary operator");
        };

        result = Expr::Binary {
            left: Box::new(left),
            operator,
            token,
            right: Box::new(result),
        };
    }

    result
}

impl ParseListener for Builder {
    fn on_expand(&mut self, non_terminal: NonTerminal, _lookahead: &Token) -> Result<()> {
        self.frames.push((non_terminal, self.items.len()));

        Ok(())
    }

    fn on_match(&mut self, token: &Token) -> Result<()> {
        let in_class_header = matches!(self.frames.last(), Some((NonTerminal::Class, _)))
            && self.class.is_none();

        if in_class_header && token.kind == TokenKind::LEFT_CURLY_BRACKET {
            let start = self.frames.last().map_or(0, |(_, start)| *start);
            let header = self.items.split_off(start);

            return self.declare_class(header);
        }

        self.items.push(Item::Token(token.clone()));

        Ok(())
    }

    fn on_complete(&mut self, non_terminal: NonTerminal) -> Result<()> {
        let Some((opened, start)) = self.frames.pop() else {
            unreachable!("completion without an expansion");
        };

        debug_assert_eq!(opened, non_terminal);

        if !folds(non_terminal) {
            return Ok(());
        }

        let children = self.items.split_off(start);

        if let Some(item) = self.fold(non_terminal, children)? {
            self.items.push(item);
        }

        Ok(())
    }
}
