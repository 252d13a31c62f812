use crate::ast::{Block, ChainLink, Expr, Literal, Primary, Reference, Stmt};
use crate::symbols::{Class, FormalArgument, SymbolTable};

/// Renders checked bodies: statements as an indented tree, expressions in
/// parenthesised prefix form.
pub struct AstPrinter;

impl AstPrinter {
    /// Every user class with its constructor and own methods.
    pub fn print_program(table: &SymbolTable) -> String {
        let mut out = String::new();

        for class in table.user_classes() {
            Self::print_class(class, &mut out);
        }

        out
    }

    fn print_class(class: &Class, out: &mut String) {
        match class.parent_name() {
            Some(parent) => out.push_str(&format!("class {} extends {}\n", class.name(), parent)),
            None => out.push_str(&format!("class {}\n", class.name())),
        }

        if let Some(constructor) = &class.constructor {
            out.push_str(&format!(
                "  constructor {}({})\n",
                constructor.name.lexeme,
                Self::params(&constructor.params)
            ));
            Self::print_block(&constructor.body, 2, out);
        }

        for method in class.own_methods() {
            let modifier = match method.modifier {
                Some(modifier) => format!("{:?} ", modifier).to_lowercase(),
                None => String::new(),
            };

            out.push_str(&format!(
                "  {}method {} {}({})\n",
                modifier,
                method.return_type.lexeme,
                method.name.lexeme,
                Self::params(&method.params)
            ));

            if let Some(body) = &method.body {
                Self::print_block(body, 2, out);
            }
        }
    }

    fn params(params: &[FormalArgument]) -> String {
        params
            .iter()
            .map(|p| format!("{} {}", p.ty.lexeme, p.name.lexeme))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn indent(depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
    }

    fn print_block(block: &Block, depth: usize, out: &mut String) {
        Self::indent(depth, out);
        out.push_str("block\n");

        for stmt in &block.statements {
            Self::print_stmt(stmt, depth + 1, out);
        }
    }

    pub fn print_stmt(stmt: &Stmt, depth: usize, out: &mut String) {
        match stmt {
            Stmt::Block(block) => return Self::print_block(block, depth, out),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                Self::indent(depth, out);
                out.push_str(&format!("if {}\n", Self::print(condition)));
                Self::print_stmt(then_branch, depth + 1, out);

                if let Some((_, else_branch)) = else_branch {
                    Self::indent(depth, out);
                    out.push_str("else\n");
                    Self::print_stmt(else_branch, depth + 1, out);
                }

                return;
            }

            Stmt::While {
                condition, body, ..
            } => {
                Self::indent(depth, out);
                out.push_str(&format!("while {}\n", Self::print(condition)));
                return Self::print_stmt(body, depth + 1, out);
            }

            _ => Self::indent(depth, out),
        }

        let line = match stmt {
            Stmt::Empty(_) => "empty".to_owned(),
            Stmt::Expression(expr) => Self::print(expr),
            Stmt::LocalVariable {
                name, initializer, ..
            } => format!("(var {} {})", name.lexeme, Self::print(initializer)),
            Stmt::Return { value: Some(v), .. } => format!("(return {})", Self::print(v)),
            Stmt::Return { value: None, .. } => "(return)".to_owned(),
            Stmt::Block(_) | Stmt::If { .. } | Stmt::While { .. } => unreachable!("handled above"),
        };

        out.push_str(&line);
        out.push('\n');
    }

    /// Prefix form of an expression, e.g. `(+ a (* b c))`.
    pub fn print(expr: &Expr) -> String {
        match expr {
            // ── literals ────────────────────────────────────────────────
            Expr::Literal(literal) => match literal {
                Literal::Null(_) => "null".into(),
                Literal::True(_) => "true".into(),
                Literal::False(_) => "false".into(),
                Literal::Int(t) | Literal::Char(t) => t.lexeme.clone(),
            },

            // ── operators ───────────────────────────────────────────────
            Expr::Unary { token, operand, .. } => {
                format!("({} {})", token.lexeme, Self::print(operand))
            }

            Expr::Binary {
                left, token, right, ..
            } => format!(
                "({} {} {})",
                token.lexeme,
                Self::print(left),
                Self::print(right)
            ),

            Expr::Assignment { target, value, .. } => {
                format!("(= {} {})", Self::print(target), Self::print(value))
            }

            // ── references ──────────────────────────────────────────────
            Expr::Reference(reference) => Self::print_reference(reference),
        }
    }

    fn arguments(arguments: &[Expr]) -> String {
        let mut s = String::new();

        for argument in arguments {
            s.push(' ');
            s.push_str(&Self::print(argument));
        }

        s
    }

    fn print_reference(reference: &Reference) -> String {
        let mut s = match &reference.primary {
            Primary::This(_) => "this".to_owned(),
            Primary::StringLiteral(t) | Primary::VariableAccess(t) => t.lexeme.clone(),
            Primary::MethodCall { name, arguments } => {
                format!("(call {}{})", name.lexeme, Self::arguments(arguments))
            }
            Primary::ConstructorCall { class, arguments } => {
                format!("(new {}{})", class.lexeme, Self::arguments(arguments))
            }
            Primary::StaticMethodCall {
                class,
                name,
                arguments,
            } => format!(
                "(call {}.{}{})",
                class.lexeme,
                name.lexeme,
                Self::arguments(arguments)
            ),
            Primary::Parenthesized { expression, .. } => {
                format!("(group {})", Self::print(expression))
            }
        };

        for link in &reference.chain {
            s = match link {
                ChainLink::Attribute(name) => format!("(. {} {})", s, name.lexeme),
                ChainLink::Method { name, arguments } => {
                    format!("(call {}.{}{})", s, name.lexeme, Self::arguments(arguments))
                }
            };
        }

        s
    }
}
