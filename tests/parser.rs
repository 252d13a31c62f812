#[cfg(test)]
mod parser_tests {
    use std::time::{Duration, Instant};

    use minijavac as mj;

    use mj::ast::*;
    use mj::ast_printer::AstPrinter;
    use mj::builder::Builder;
    use mj::error::{CompileError, SemanticErrorKind, SyntacticError};
    use mj::grammar::NonTerminal;
    use mj::parser::{validate, Parser};
    use mj::scanner::Scanner;
    use mj::source::SourceBuffer;
    use mj::symbols::{Modifier, SymbolTable};
    use mj::token::TokenKind;

    fn check(source: &str) -> Result<(), CompileError> {
        validate(SourceBuffer::new(source))
    }

    fn syntax_error(source: &str) -> SyntacticError {
        match check(source) {
            Err(CompileError::Syntactic(e)) => e,
            other => panic!("expected a syntax error for {:?}, got {:?}", source, other),
        }
    }

    fn build(source: &str) -> Result<SymbolTable, CompileError> {
        let mut builder = Builder::new();
        let mut parser = Parser::new(Scanner::new(SourceBuffer::new(source)))?;

        parser.parse_unit(&mut builder)?;

        Ok(builder.finish())
    }

    fn body_of(table: &SymbolTable, class: &str, method: &str) -> Block {
        table.class(class).unwrap().methods[method]
            .body
            .clone()
            .unwrap()
    }

    #[test]
    fn test_parser_accepts_empty_unit() {
        assert!(check("").is_ok());
        assert!(check("// only a comment\n").is_ok());
    }

    #[test]
    fn test_parser_accepts_full_class() {
        let source = r#"
            abstract class Shape {
                int sides;
                abstract int area();
                final String name(char c, Shape other) { return "shape"; }
            }

            class Square extends Shape {
                int side;
                public Square(int s) { side = s; }
                int area() { return side * side; }
                static void main() {
                    var sq = new Square(3);
                    if (sq.area() > 4) System.printIln(sq.area()); else { ; }
                    while (false) sq.side = -sq.side + 1;
                    return;
                }
            }
        "#;

        assert!(check(source).is_ok(), "{:?}", check(source));
    }

    #[test]
    fn test_parser_dangling_else() {
        let source = "class A { void m() { if (a) if (b) x(); else y(); } }";
        let table = build(source).unwrap();
        let body = body_of(&table, "A", "m");

        let Stmt::If {
            then_branch,
            else_branch,
            ..
        } = &body.statements[0]
        else {
            panic!("expected an if statement");
        };

        assert!(else_branch.is_none());
        assert!(matches!(&**then_branch, Stmt::If { else_branch: Some(_), .. }));
    }

    #[test]
    fn test_parser_mismatch() {
        let error = syntax_error("class A extends { }");

        match &error {
            SyntacticError::Mismatch { expected, found } => {
                assert_eq!(*expected, TokenKind::CLASS_IDENTIFIER);
                assert_eq!(found.kind, TokenKind::LEFT_CURLY_BRACKET);
            }
            other => panic!("expected a mismatch, got {:?}", other),
        }

        assert_eq!(
            error.report(),
            "Syntax error at line 1: expected class identifier, but found '{'.\n[Error:{|1]"
        );
    }

    #[test]
    fn test_parser_not_in_firsts() {
        let error = syntax_error("class A {\n  if\n}");

        let SyntacticError::NotInFirsts {
            non_terminal,
            expected,
            found,
        } = &error
        else {
            panic!("expected NotInFirsts, got {:?}", error);
        };

        assert_eq!(*non_terminal, NonTerminal::MemberList);
        assert!(expected.contains(&TokenKind::PUBLIC));
        assert!(expected.contains(&TokenKind::RIGHT_CURLY_BRACKET));
        assert_eq!(found.kind, TokenKind::IF);
        assert_eq!(found.line, 2);
    }

    #[test]
    fn test_parser_end_of_file_inside_class() {
        let error = syntax_error("class A {");

        assert!(matches!(
            &error,
            SyntacticError::NotInFirsts { non_terminal: NonTerminal::MemberList, found, .. }
                if found.kind == TokenKind::EOF
        ));
        assert!(error.to_string().ends_with("but found end of file."));
    }

    #[test]
    fn test_parser_missing_terminal_at_end_of_file() {
        let error = syntax_error("class A extends");

        match error {
            SyntacticError::NotInFirsts {
                non_terminal,
                expected,
                ..
            } => {
                assert_eq!(non_terminal, NonTerminal::OptionalInheritance);
                assert_eq!(expected, vec![TokenKind::CLASS_IDENTIFIER]);
            }
            other => panic!("expected NotInFirsts, got {:?}", other),
        }
    }

    #[test]
    fn test_parser_rejects_missing_semicolon() {
        let error = syntax_error("class A { void m() { x = 1 } }");

        assert_eq!(error.found().kind, TokenKind::RIGHT_CURLY_BRACKET);
    }

    #[test]
    fn test_parser_stops_at_lexical_error() {
        let result = check("class A { int x; # }");

        assert!(matches!(result, Err(CompileError::Lexical(_))));
    }

    #[test]
    fn test_builder_binary_nests_to_the_right() {
        let table = build("class A { void m() { x = a - b * c; } }").unwrap();
        let body = body_of(&table, "A", "m");

        let Stmt::Expression(expr) = &body.statements[0] else {
            panic!("expected an expression statement");
        };

        assert_eq!(AstPrinter::print(expr), "(= x (- a (* b c)))");
    }

    #[test]
    fn test_builder_long_lists_stay_linear() {
        let statements = "x = x + 1;".repeat(20_000);
        let terms = vec!["1"; 3_000].join(" + ");
        let source = format!("class A {{ void m() {{ {} }} void e() {{ x = {}; }} }}", statements, terms);

        let started = Instant::now();
        let table = build(&source).unwrap();
        let elapsed = started.elapsed();

        assert_eq!(body_of(&table, "A", "m").statements.len(), 20_000);
        assert_eq!(body_of(&table, "A", "e").statements.len(), 1);
        assert!(elapsed < Duration::from_secs(10), "building took {:?}", elapsed);
    }

    #[test]
    fn test_builder_chains_and_calls() {
        let table = build("class A { void m() { this.b.c(1, 'x').d = new B(y, \"s\"); C.f(); (p).q(); } }")
            .unwrap();
        let body = body_of(&table, "A", "m");
        let printed: Vec<String> = body
            .statements
            .iter()
            .map(|s| match s {
                Stmt::Expression(e) => AstPrinter::print(e),
                other => panic!("unexpected {:?}", other),
            })
            .collect();

        assert_eq!(
            printed,
            vec![
                "(= (. (call (. this b).c 1 'x') d) (new B y \"s\"))",
                "(call C.f)",
                "(call (group p).q)",
            ]
        );

        let Stmt::Expression(Expr::Assignment { target, .. }) = &body.statements[0] else {
            panic!("expected an assignment");
        };
        let Expr::Reference(reference) = &**target else {
            panic!("expected a reference");
        };

        assert!(reference.ends_in_variable());
        assert!(!reference.ends_in_call());
    }

    #[test]
    fn test_builder_statements() {
        let source = "class A { int m(int p) { var v = p; ; { return v; } while (true) --v; } }";
        let table = build(source).unwrap();
        let body = body_of(&table, "A", "m");

        assert_eq!(body.statements.len(), 4);
        assert!(matches!(&body.statements[0], Stmt::LocalVariable { name, .. } if name.lexeme == "v"));
        assert!(matches!(&body.statements[1], Stmt::Empty(_)));
        assert!(matches!(&body.statements[2], Stmt::Block(b) if b.statements.len() == 1));
        assert!(matches!(
            &body.statements[3],
            Stmt::While { body, .. } if matches!(&**body, Stmt::Expression(Expr::Unary { operator: UnaryOperator::Decrement, .. }))
        ));
    }

    #[test]
    fn test_builder_declarations() {
        let source = r#"
            abstract class A extends B {
                char c;
                public A() {}
            }
        "#;

        let error = build(source).unwrap_err();
        assert!(matches!(
            error,
            CompileError::Semantic(ref e) if e.kind == SemanticErrorKind::InvalidConstructorDeclaration
        ));

        let table = build(
            "final class A extends B { int x; String s; static int f(int a, B b); }",
        );
        assert!(matches!(
            table,
            Err(CompileError::Semantic(ref e)) if e.kind == SemanticErrorKind::InvalidMethodDeclaration
        ));

        let table = build("class A extends B { int x; String s; public A(int a) {} static int f(int a, B b) { return a; } }")
            .unwrap();
        let class = table.class("A").unwrap();

        assert_eq!(class.parent_name(), Some("B"));
        assert_eq!(class.attribute("x").unwrap().ty.kind, TokenKind::INT);
        assert_eq!(class.attribute("s").unwrap().ty.lexeme, "String");
        assert_eq!(class.constructor_params().len(), 1);

        let f = &class.methods["f"];
        assert_eq!(f.modifier, Some(Modifier::Static));
        assert_eq!(
            f.params.iter().map(|p| p.name.lexeme.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_builder_inline_declaration_errors() {
        let cases = [
            ("class String {}", SemanticErrorKind::InvalidClassName),
            ("class A {} class A {}", SemanticErrorKind::RepeatedDeclaration),
            ("class A extends A {}", SemanticErrorKind::CircularInheritance),
            ("class A { public B() {} }", SemanticErrorKind::BadlyNamedConstructor),
            ("class A { public A() {} public A(int x) {} }", SemanticErrorKind::MultipleConstructorDeclarations),
            ("class A { int x; char x; }", SemanticErrorKind::RepeatedDeclaration),
            ("class A { void m() {} int m() {} }", SemanticErrorKind::RepeatedDeclaration),
            ("class A { void m(int a, char a) {} }", SemanticErrorKind::RepeatedDeclaration),
            ("class A { void m(); }", SemanticErrorKind::InvalidMethodDeclaration),
            ("abstract class A { abstract void m() {} }", SemanticErrorKind::InvalidMethodDeclaration),
            ("class A { abstract void m(); }", SemanticErrorKind::InvalidMethodDeclaration),
        ];

        for (source, expected) in cases {
            match build(source) {
                Err(CompileError::Semantic(e)) => assert_eq!(e.kind, expected, "source {:?}", source),
                other => panic!("expected {:?} for {:?}, got {:?}", expected, source, other),
            }
        }
    }
}
