//! Type checker for method and constructor bodies.
//!
//! Runs after the hierarchy has been consolidated, so every class map already
//! holds inherited members.  One [`Checker`] walks one body with:
//! 1. a stack of local-variable scopes (`HashMap<String, Type>` per block);
//! 2. the enclosing callable's parameters, staticness and return type;
//! 3. read-only access to the [`SymbolTable`] for member and class lookups.
//!
//! Expressions resolve bottom-up to a [`Type`]; the first violation aborts
//! the unit.

use std::collections::HashMap;
use std::fmt;

use log::{debug, info};

use crate::ast::{BinaryOperator, Block, ChainLink, Expr, Literal, Primary, Reference, Stmt, UnaryOperator};
use crate::error::{SemanticError, SemanticErrorKind};
use crate::symbols::{Class, FormalArgument, SymbolTable, STRING};
use crate::token::{Token, TokenKind};

type Result<T> = std::result::Result<T, SemanticError>;

/// Static type of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    Char,
    String,
    Class(String),
    Void,
    /// Type of the `null` literal.
    Null,
}

impl Type {
    /// Type named by a declaration token (`int`, `void`, `Foo`, …).
    pub fn from_token(token: &Token) -> Self {
        match token.kind {
            TokenKind::INT => Type::Int,
            TokenKind::BOOLEAN => Type::Boolean,
            TokenKind::CHAR => Type::Char,
            TokenKind::VOID => Type::Void,
            _ if token.lexeme == STRING => Type::String,
            _ => Type::Class(token.lexeme.clone()),
        }
    }

    /// Name of the class a value of this type is an instance of.
    fn class_name(&self) -> Option<&str> {
        match self {
            Type::String => Some(STRING),
            Type::Class(name) => Some(name.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Boolean => write!(f, "boolean"),
            Type::Char => write!(f, "char"),
            Type::String => write!(f, "String"),
            Type::Class(name) => write!(f, "{}", name),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
        }
    }
}

fn error(kind: SemanticErrorKind, token: &Token, msg: impl Into<String>) -> SemanticError {
    SemanticError::new(kind, token, msg)
}

/// Check every user-declared body, then the `main` rule.
pub fn check_program(table: &SymbolTable) -> Result<()> {
    info!("Checking method and constructor bodies");

    for class in table.user_classes() {
        if let Some(constructor) = &class.constructor {
            debug!("Checking constructor of {}", class.name());

            Checker::new(table, class, &constructor.params, false, None)
                .check_body(&constructor.body)?;
        }

        for method in class.own_methods() {
            if let Some(body) = &method.body {
                debug!("Checking {}.{}", class.name(), method.name.lexeme);

                Checker::new(
                    table,
                    class,
                    &method.params,
                    method.is_static(),
                    Some(Type::from_token(&method.return_type)),
                )
                .check_body(body)?;
            }
        }
    }

    check_main(table)
}

fn check_main(table: &SymbolTable) -> Result<()> {
    let mains: Vec<&Token> = table
        .user_classes()
        .flat_map(|class| class.own_methods())
        .filter(|m| {
            m.name.lexeme == "main"
                && m.is_static()
                && m.return_type.kind == TokenKind::VOID
                && m.params.is_empty()
        })
        .map(|m| &m.name)
        .collect();

    match mains.as_slice() {
        [] => Err(error(
            SemanticErrorKind::MissingMain,
            &Token::synthetic(TokenKind::MET_VAR_IDENTIFIER, "main"),
            "no method static void main() was declared",
        )),
        [_] => Ok(()),
        [_, second, ..] => Err(error(
            SemanticErrorKind::MultipleMain,
            second,
            "only one method static void main() is allowed per unit",
        )),
    }
}

/// Checks one body in the context of its enclosing callable.
pub struct Checker<'t> {
    table: &'t SymbolTable,
    class: &'t Class,
    params: &'t [FormalArgument],
    is_static: bool,
    /// `None` inside a constructor.
    returns: Option<Type>,
    scopes: Vec<HashMap<String, Type>>,
}

impl<'t> Checker<'t> {
    pub fn new(
        table: &'t SymbolTable,
        class: &'t Class,
        params: &'t [FormalArgument],
        is_static: bool,
        returns: Option<Type>,
    ) -> Self {
        Self {
            table,
            class,
            params,
            is_static,
            returns,
            scopes: Vec::new(),
        }
    }

    pub fn check_body(&mut self, body: &Block) -> Result<()> {
        self.check_block(body)
    }

    fn begin_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn end_scope(&mut self) {
        self.scopes.pop();
    }

    /// Whether `found` can stand where `expected` is required.
    fn conforms(&self, found: &Type, expected: &Type) -> bool {
        if found == expected {
            return true;
        }

        match (found, expected.class_name()) {
            (Type::Null, Some(_)) => true,
            (_, Some(sup)) => found
                .class_name()
                .is_some_and(|sub| self.table.conforms(sub, sup)),
            _ => false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Statements
    // ─────────────────────────────────────────────────────────────────────────

    fn check_block(&mut self, block: &Block) -> Result<()> {
        self.begin_scope();

        for stmt in &block.statements {
            self.check_stmt(stmt)?;
        }

        self.end_scope();

        Ok(())
    }

    fn check_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Empty(_) => Ok(()),

            Stmt::Block(block) => self.check_block(block),

            Stmt::Expression(expr) => self.check_expression_statement(expr),

            Stmt::LocalVariable {
                name, initializer, ..
            } => self.check_local_variable(name, initializer),

            Stmt::Return { keyword, value } => self.check_return(keyword, value.as_ref()),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(condition)?;
                self.check_branch(then_branch)?;

                if let Some((_, else_branch)) = else_branch {
                    self.check_branch(else_branch)?;
                }

                Ok(())
            }

            Stmt::While {
                condition, body, ..
            } => {
                self.check_condition(condition)?;
                self.check_branch(body)
            }
        }
    }

    /// Sole body of `if`, `else` or `while`.
    fn check_branch(&mut self, stmt: &Stmt) -> Result<()> {
        if let Stmt::LocalVariable { keyword, .. } = stmt {
            return Err(error(
                SemanticErrorKind::InvalidSentence,
                keyword,
                "a local variable declaration cannot be the only statement of a branch",
            ));
        }

        self.check_stmt(stmt)
    }

    fn check_condition(&mut self, condition: &Expr) -> Result<()> {
        let ty = self.check_value(condition)?;

        if ty != Type::Boolean {
            return Err(error(
                SemanticErrorKind::TypeMismatch,
                condition.token(),
                format!("condition must be boolean, found {}", ty),
            ));
        }

        Ok(())
    }

    fn check_expression_statement(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Assignment {
                target,
                operator,
                value,
            } => self.check_assignment(target, operator, value),

            Expr::Reference(reference) if reference.ends_in_call() => {
                self.check_reference(reference).map(|_| ())
            }

            Expr::Unary {
                operator: UnaryOperator::Increment | UnaryOperator::Decrement,
                ..
            } => self.check_expr(expr).map(|_| ()),

            _ => Err(error(
                SemanticErrorKind::InvalidSentence,
                expr.token(),
                "only calls, assignments, increments and decrements can be used as statements",
            )),
        }
    }

    fn check_local_variable(&mut self, name: &Token, initializer: &Expr) -> Result<()> {
        let visible = self.scopes.iter().any(|s| s.contains_key(&name.lexeme))
            || self.params.iter().any(|p| p.name.lexeme == name.lexeme);

        if visible {
            return Err(error(
                SemanticErrorKind::RepeatedDeclaration,
                name,
                format!("variable '{}' is already declared", name.lexeme),
            ));
        }

        let ty = self.check_value(initializer)?;

        if matches!(ty, Type::Null | Type::Void) {
            return Err(error(
                SemanticErrorKind::InvalidVariableInitialization,
                name,
                format!("variable '{}' cannot be initialised with {}", name.lexeme, ty),
            ));
        }

        debug!("Local {}: {}", name.lexeme, ty);

        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.lexeme.clone(), ty);
        }

        Ok(())
    }

    fn check_return(&mut self, keyword: &Token, value: Option<&Expr>) -> Result<()> {
        let (expected, value) = match (&self.returns, value) {
            (None, None) | (Some(Type::Void), None) => return Ok(()),
            (None, Some(_)) => {
                return Err(error(
                    SemanticErrorKind::InvalidReturn,
                    keyword,
                    "a constructor cannot return a value",
                ))
            }
            (Some(Type::Void), Some(_)) => {
                return Err(error(
                    SemanticErrorKind::InvalidReturn,
                    keyword,
                    "a void method cannot return a value",
                ))
            }
            (Some(expected), None) => {
                return Err(error(
                    SemanticErrorKind::InvalidReturn,
                    keyword,
                    format!("missing return value of type {}", expected),
                ))
            }
            (Some(expected), Some(value)) => (expected.clone(), value),
        };

        let found = self.check_value(value)?;

        if !self.conforms(&found, &expected) {
            return Err(error(
                SemanticErrorKind::InvalidReturn,
                keyword,
                format!("expected a return value of type {}, found {}", expected, found),
            ));
        }

        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Expressions
    // ─────────────────────────────────────────────────────────────────────────

    /// `target = value`; the target must denote a variable slot.
    fn check_assignment(&mut self, target: &Expr, operator: &Token, value: &Expr) -> Result<()> {
        let Expr::Reference(reference) = target else {
            return Err(error(
                SemanticErrorKind::InvalidAssignment,
                operator,
                "the left side of an assignment must be a variable",
            ));
        };

        if !reference.ends_in_variable() {
            return Err(error(
                SemanticErrorKind::InvalidAssignment,
                operator,
                "the left side of an assignment must be a variable",
            ));
        }

        let slot = self.check_reference(reference)?;
        let found = self.check_value(value)?;

        if !self.conforms(&found, &slot) {
            return Err(error(
                SemanticErrorKind::TypeMismatch,
                operator,
                format!("cannot assign {} to {}", found, slot),
            ));
        }

        Ok(())
    }

    /// An expression used for its value: assignments are rejected.
    fn check_value(&mut self, expr: &Expr) -> Result<Type> {
        if let Expr::Assignment { operator, .. } = expr {
            return Err(error(
                SemanticErrorKind::InvalidAssignment,
                operator,
                "an assignment cannot be used as a value",
            ));
        }

        self.check_expr(expr)
    }

    fn check_expr(&mut self, expr: &Expr) -> Result<Type> {
        match expr {
            Expr::Assignment {
                target,
                operator,
                value,
            } => {
                self.check_assignment(target, operator, value)?;
                Ok(Type::Void)
            }

            Expr::Binary {
                left,
                operator,
                token,
                right,
            } => {
                let left = self.check_value(left)?;
                let right = self.check_value(right)?;

                if left == Type::Null || right == Type::Null {
                    return Err(error(
                        SemanticErrorKind::UnexpectedNullOperand,
                        token,
                        format!("null operand for operator '{}'", token.lexeme),
                    ));
                }

                let admitted = match &left {
                    Type::Int => {
                        operator.is_arithmetic() || operator.is_comparison() || operator.is_equality()
                    }
                    Type::Boolean => {
                        operator.is_logical() || *operator == BinaryOperator::Equals
                    }
                    Type::Char | Type::String => operator.is_logical(),
                    Type::Class(_) => operator.is_equality(),
                    Type::Void | Type::Null => false,
                };

                if !admitted {
                    return Err(error(
                        SemanticErrorKind::InvalidOperator,
                        token,
                        format!("operator '{}' cannot be applied to {}", token.lexeme, left),
                    ));
                }

                let compatible = left == right
                    || (matches!(left, Type::Class(_)) && matches!(right, Type::Class(_)));

                if !compatible {
                    return Err(error(
                        SemanticErrorKind::TypeMismatch,
                        token,
                        format!("operands of '{}' have types {} and {}", token.lexeme, left, right),
                    ));
                }

                Ok(match left {
                    Type::Int if operator.is_arithmetic() => Type::Int,
                    _ => Type::Boolean,
                })
            }

            Expr::Unary {
                operator,
                token,
                operand,
            } => {
                let ty = self.check_value(operand)?;

                if ty == Type::Null {
                    return Err(error(
                        SemanticErrorKind::UnexpectedNullOperand,
                        token,
                        format!("null operand for operator '{}'", token.lexeme),
                    ));
                }

                let admitted = match operator {
                    UnaryOperator::Not => ty == Type::Boolean,
                    _ => ty == Type::Int,
                };

                if !admitted {
                    return Err(error(
                        SemanticErrorKind::InvalidOperator,
                        token,
                        format!("operator '{}' cannot be applied to {}", token.lexeme, ty),
                    ));
                }

                if matches!(operator, UnaryOperator::Increment | UnaryOperator::Decrement) {
                    let is_variable = matches!(&**operand, Expr::Reference(r) if r.ends_in_variable());

                    if !is_variable {
                        return Err(error(
                            SemanticErrorKind::InvalidOperator,
                            token,
                            format!("operator '{}' needs a variable", token.lexeme),
                        ));
                    }
                }

                Ok(ty)
            }

            Expr::Literal(literal) => Ok(match literal {
                Literal::Null(_) => Type::Null,
                Literal::True(_) | Literal::False(_) => Type::Boolean,
                Literal::Int(_) => Type::Int,
                Literal::Char(_) => Type::Char,
            }),

            Expr::Reference(reference) => self.check_reference(reference),
        }
    }

    /// Binary chains nest to the right, so the spine is walked in a loop:
    /// left operands and operators on the way down, operand agreement on
    /// the way back up.
    fn check_binary(&mut self, expr: &Expr) -> Result<Type> {
        let mut spine = Vec::new();
        let mut current = expr;

        while let Expr::Binary {
            left,
            operator,
            token,
            right,
        } = current
        {
            let left = self.check_value(left)?;

            if left == Type::Null {
                return Err(error(
                    SemanticErrorKind::UnexpectedNullOperand,
                    token,
                    format!("null operand for operator '{}'", token.lexeme),
                ));
            }

            let admitted = match &left {
                Type::Int => operator.is_arithmetic() || operator.is_comparison() || operator.is_equality(),
                Type::Boolean => operator.is_logical() || *operator == BinaryOperator::Equals,
                Type::Char | Type::String => operator.is_logical(),
                Type::Class(_) => operator.is_equality(),
                Type::Void | Type::Null => false,
            };

            if !admitted {
                return Err(error(
                    SemanticErrorKind::InvalidOperator,
                    token,
                    format!("operator '{}' cannot be applied to {}", token.lexeme, left),
                ));
            }

            spine.push((left, *operator, token));
            current = &**right;
        }

        let mut right = self.check_value(current)?;

        while let Some((left, operator, token)) = spine.pop() {
            if right == Type::Null {
                return Err(error(
                    SemanticErrorKind::UnexpectedNullOperand,
                    token,
                    format!("null operand for operator '{}'", token.lexeme),
                ));
            }

            let compatible =
                left == right || (matches!(left, Type::Class(_)) && matches!(right, Type::Class(_)));

            if !compatible {
                return Err(error(
                    SemanticErrorKind::TypeMismatch,
                    token,
                    format!("operands of '{}' have types {} and {}", token.lexeme, left, right),
                ));
            }

            right = match left {
                Type::Int if operator.is_arithmetic() => Type::Int,
                _ => Type::Boolean,
            };
        }

        Ok(right)
    }

    fn check_reference(&mut self, reference: &Reference) -> Result<Type> {
        let mut ty = self.check_primary(&reference.primary)?;

        for link in &reference.chain {
            ty = self.check_link(&ty, link)?;
        }

        Ok(ty)
    }

    fn check_primary(&mut self, primary: &Primary) -> Result<Type> {
        match primary {
            Primary::This(token) => {
                if self.is_static {
                    return Err(error(
                        SemanticErrorKind::AccessToInstanceMemberFromStaticContext,
                        token,
                        "'this' cannot be used in a static method",
                    ));
                }

                Ok(Type::Class(self.class.name().to_owned()))
            }

            Primary::StringLiteral(_) => Ok(Type::String),

            Primary::VariableAccess(name) => self.lookup(name),

            Primary::MethodCall { name, arguments } => {
                let Some(method) = self.class.methods.get(&name.lexeme) else {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!("class {} has no method {}", self.class.name(), name.lexeme),
                    ));
                };

                if self.is_static && !method.is_static() {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!("instance method {} cannot be called from a static method", name.lexeme),
                    ));
                }

                self.check_arguments(&method.params, arguments, name)?;

                Ok(Type::from_token(&method.return_type))
            }

            Primary::ConstructorCall { class, arguments } => {
                let Some(target) = self.table.class(&class.lexeme) else {
                    return Err(error(
                        SemanticErrorKind::UndeclaredClass,
                        class,
                        format!("class {} is not declared", class.lexeme),
                    ));
                };

                self.check_arguments(target.constructor_params(), arguments, class)?;

                Ok(Type::from_token(class))
            }

            Primary::StaticMethodCall {
                class,
                name,
                arguments,
            } => {
                let Some(target) = self.table.class(&class.lexeme) else {
                    return Err(error(
                        SemanticErrorKind::UndeclaredClass,
                        class,
                        format!("class {} is not declared", class.lexeme),
                    ));
                };

                let Some(method) = target.methods.get(&name.lexeme) else {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!("class {} has no method {}", class.lexeme, name.lexeme),
                    ));
                };

                if !method.is_static() {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!("{}.{} is not a static method", class.lexeme, name.lexeme),
                    ));
                }

                self.check_arguments(&method.params, arguments, name)?;

                Ok(Type::from_token(&method.return_type))
            }

            Primary::Parenthesized { expression, .. } => self.check_value(expression),
        }
    }

    /// `.attribute` or `.method(args)` applied to a value of type `receiver`.
    fn check_link(&mut self, receiver: &Type, link: &ChainLink) -> Result<Type> {
        let name = link.token();

        let Type::Class(class_name) = receiver else {
            return Err(error(
                SemanticErrorKind::InvalidChaining,
                name,
                format!("cannot access '{}' on a value of type {}", name.lexeme, receiver),
            ));
        };

        let Some(class) = self.table.class(class_name) else {
            return Err(error(
                SemanticErrorKind::UndeclaredClass,
                name,
                format!("class {} is not declared", class_name),
            ));
        };

        match link {
            ChainLink::Attribute(name) => match class.attribute(&name.lexeme) {
                Some(attribute) => Ok(Type::from_token(&attribute.ty)),
                None => Err(error(
                    SemanticErrorKind::InvalidVariableAccess,
                    name,
                    format!("class {} has no attribute {}", class_name, name.lexeme),
                )),
            },

            ChainLink::Method { name, arguments } => {
                let Some(method) = class.methods.get(&name.lexeme) else {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!("class {} has no method {}", class_name, name.lexeme),
                    ));
                };

                if method.is_static() && !self.class.ancestors.contains(class_name) {
                    return Err(error(
                        SemanticErrorKind::InvalidCall,
                        name,
                        format!(
                            "static method {}.{} cannot be reached through an instance from {}",
                            class_name,
                            name.lexeme,
                            self.class.name()
                        ),
                    ));
                }

                self.check_arguments(&method.params, arguments, name)?;

                Ok(Type::from_token(&method.return_type))
            }
        }
    }

    fn check_arguments(
        &mut self,
        params: &[FormalArgument],
        arguments: &[Expr],
        call: &Token,
    ) -> Result<()> {
        if params.len() != arguments.len() {
            return Err(error(
                SemanticErrorKind::InvalidCall,
                call,
                format!(
                    "'{}' expects {} argument(s), found {}",
                    call.lexeme,
                    params.len(),
                    arguments.len()
                ),
            ));
        }

        for (param, argument) in params.iter().zip(arguments) {
            let expected = Type::from_token(&param.ty);
            let found = self.check_value(argument)?;

            if !self.conforms(&found, &expected) {
                return Err(error(
                    SemanticErrorKind::TypeMismatch,
                    argument.token(),
                    format!(
                        "argument '{}' expects {}, found {}",
                        param.name.lexeme, expected, found
                    ),
                ));
            }
        }

        Ok(())
    }

    /// Locals innermost first, then parameters, then attributes.
    fn lookup(&self, name: &Token) -> Result<Type> {
        if let Some(ty) = self
            .scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name.lexeme))
        {
            return Ok(ty.clone());
        }

        if let Some(param) = self.params.iter().find(|p| p.name.lexeme == name.lexeme) {
            return Ok(Type::from_token(&param.ty));
        }

        if let Some(attribute) = self.class.attribute(&name.lexeme) {
            if self.is_static {
                return Err(error(
                    SemanticErrorKind::AccessToInstanceMemberFromStaticContext,
                    name,
                    format!("attribute '{}' cannot be used in a static method", name.lexeme),
                ));
            }

            return Ok(Type::from_token(&attribute.ty));
        }

        Err(error(
            SemanticErrorKind::InvalidVariableAccess,
            name,
            format!("'{}' is not declared", name.lexeme),
        ))
    }
}
