#[cfg(test)]
mod checker_tests {
    use minijavac as mj;

    use mj::checker::Type;
    use mj::error::{CompileError, SemanticErrorKind};
    use mj::token::{Token, TokenKind};

    /// Wrap `body` in a method with a parameter of every kind of type.
    fn program(body: &str) -> String {
        format!(
            r#"
            class Base {{
                int v;
                int get() {{ return v; }}
            }}

            class Derived extends Base {{
                public Derived(int x) {{ v = x; }}
            }}

            class Main {{
                int n;
                boolean flag;
                Base base;

                static void main() {{}}

                int twice(int x) {{ return x * 2; }}

                static int stat() {{ return 1; }}

                void run(int i, boolean b, char c, String s, Derived d) {{
                    {}
                }}
            }}
            "#,
            body
        )
    }

    fn semantic_error(source: &str) -> (SemanticErrorKind, String) {
        match mj::analyze_str(source) {
            Err(CompileError::Semantic(e)) => (e.kind, e.message),
            other => panic!("expected a semantic error for {:?}, got {:?}", source, other),
        }
    }

    fn assert_body_error(body: &str, expected: SemanticErrorKind) {
        let (kind, message) = semantic_error(&program(body));

        assert_eq!(kind, expected, "body {:?}: {}", body, message);
    }

    #[test]
    fn test_valid_bodies() {
        let bodies = [
            "n = i + 1;",
            "n = (i + 1) * 2;",
            "base = d;",
            "base = null;",
            "s = null;",
            "s = \"text\";",
            "var k = twice(i); ++k; --k;",
            "if (b && flag == true) n = 1; else n = 2;",
            "while (i < 10) ++i;",
            "System.printIln(d.get());",
            "n = Main.stat();",
            "var t = this; t.n = 3;",
            "base = new Derived(3);",
            "b = base == d;",
            "b = !b;",
            "n = -i;",
            "debugPrint(n);",
            "{ var k = 1; } { var k = 'c'; }",
            "return;",
        ];

        for body in bodies {
            let result = mj::analyze_str(&program(body));

            assert!(result.is_ok(), "body {:?}: {:?}", body, result);
        }
    }

    #[test]
    fn test_boolean_operators() {
        assert_body_error("b = b != flag;", SemanticErrorKind::InvalidOperator);
        assert_body_error("b = b + flag;", SemanticErrorKind::InvalidOperator);
        assert_body_error("n = base + base;", SemanticErrorKind::InvalidOperator);
        assert_body_error("b = !i;", SemanticErrorKind::InvalidOperator);
        assert_body_error("n = -b;", SemanticErrorKind::InvalidOperator);
        assert_body_error("b = b + undeclared;", SemanticErrorKind::InvalidOperator);
    }

    #[test]
    fn test_long_expressions() {
        let terms = vec!["1"; 3_000].join(" + ");

        assert!(mj::analyze_str(&program(&format!("n = {};", terms))).is_ok());
        assert_body_error(&format!("n = {} + b;", terms), SemanticErrorKind::TypeMismatch);
        assert_body_error(&format!("n = {} + null;", terms), SemanticErrorKind::UnexpectedNullOperand);
    }

    #[test]
    fn test_null_operands() {
        assert_body_error("b = null == base;", SemanticErrorKind::UnexpectedNullOperand);
        assert_body_error("n = 1 + null;", SemanticErrorKind::UnexpectedNullOperand);
        assert_body_error("b = !null;", SemanticErrorKind::UnexpectedNullOperand);
    }

    #[test]
    fn test_operand_types_must_agree() {
        assert_body_error("b = i == c;", SemanticErrorKind::TypeMismatch);
        assert_body_error("b = flag && (i < 2) && i;", SemanticErrorKind::TypeMismatch);
    }

    #[test]
    fn test_increment_needs_variable() {
        assert_body_error("++(i);", SemanticErrorKind::InvalidOperator);
        assert_body_error("++twice(1);", SemanticErrorKind::InvalidOperator);
    }

    #[test]
    fn test_assignments() {
        assert_body_error("n = b;", SemanticErrorKind::TypeMismatch);
        assert_body_error("d = base;", SemanticErrorKind::TypeMismatch);
        assert_body_error("n = null;", SemanticErrorKind::TypeMismatch);
        assert_body_error("twice(1) = 3;", SemanticErrorKind::InvalidAssignment);
        assert_body_error("n = (n = 1);", SemanticErrorKind::InvalidAssignment);
        assert_body_error("var k = (n = 1);", SemanticErrorKind::InvalidAssignment);
    }

    #[test]
    fn test_local_variables() {
        assert_body_error("var z = null;", SemanticErrorKind::InvalidVariableInitialization);
        assert_body_error("var z = debugPrint(1);", SemanticErrorKind::InvalidVariableInitialization);
        assert_body_error("var i = 3;", SemanticErrorKind::RepeatedDeclaration);
        assert_body_error("var k = 1; { var k = 2; }", SemanticErrorKind::RepeatedDeclaration);
        assert_body_error("{ var k = 1; } n = k;", SemanticErrorKind::InvalidVariableAccess);
    }

    #[test]
    fn test_sentences() {
        assert_body_error("if (b) var q = 1;", SemanticErrorKind::InvalidSentence);
        assert_body_error("while (b) var q = 1;", SemanticErrorKind::InvalidSentence);
        assert_body_error("if (b) ; else var q = 1;", SemanticErrorKind::InvalidSentence);
        assert_body_error("n + 1;", SemanticErrorKind::InvalidSentence);
        assert_body_error("i;", SemanticErrorKind::InvalidSentence);
        assert_body_error("d.v;", SemanticErrorKind::InvalidSentence);
    }

    #[test]
    fn test_conditions() {
        assert_body_error("if (i) ;", SemanticErrorKind::TypeMismatch);
        assert_body_error("while (base) ;", SemanticErrorKind::TypeMismatch);
    }

    #[test]
    fn test_calls() {
        let cases = [
            ("twice(b);", SemanticErrorKind::TypeMismatch),
            ("twice(1, 2);", SemanticErrorKind::InvalidCall),
            ("missing();", SemanticErrorKind::InvalidCall),
            ("n = Main.twice(1);", SemanticErrorKind::InvalidCall),
            ("System.printSln(i);", SemanticErrorKind::TypeMismatch),
            ("System.nothing();", SemanticErrorKind::InvalidCall),
            ("Nope.f();", SemanticErrorKind::UndeclaredClass),
            ("base = new Nope();", SemanticErrorKind::UndeclaredClass),
            ("base = new Derived();", SemanticErrorKind::InvalidCall),
            ("base = new Derived(c);", SemanticErrorKind::TypeMismatch),
            ("d.nothing();", SemanticErrorKind::InvalidCall),
        ];

        for (body, expected) in cases {
            assert_body_error(body, expected);
        }
    }

    #[test]
    fn test_chaining() {
        assert_body_error("n = i.v;", SemanticErrorKind::InvalidChaining);
        assert_body_error("n = s.v;", SemanticErrorKind::InvalidChaining);
        assert_body_error("twice(1).get();", SemanticErrorKind::InvalidChaining);
        assert_body_error("n = base.nothing;", SemanticErrorKind::InvalidVariableAccess);
        assert_body_error("n = undeclared;", SemanticErrorKind::InvalidVariableAccess);
    }

    #[test]
    fn test_returns() {
        assert_body_error("return 1;", SemanticErrorKind::InvalidReturn);

        let cases = [
            "class Main { static void main() {} int f() { return; } }",
            "class Main { static void main() {} int f() { return true; } }",
            "class Main { static void main() {} Main f() { return 1; } }",
            "class Main { public Main() { return 1; } static void main() {} }",
        ];

        for source in cases {
            let (kind, message) = semantic_error(source);

            assert_eq!(kind, SemanticErrorKind::InvalidReturn, "{:?}: {}", source, message);
        }

        let subclass = "class A {} class B extends A {} class Main { static void main() {} A f() { return new B(); } A g() { return null; } }";
        assert!(mj::analyze_str(subclass).is_ok());
    }

    #[test]
    fn test_static_context() {
        let cases = [
            (
                "class Main { int n; static void main() { n = 1; } }",
                SemanticErrorKind::AccessToInstanceMemberFromStaticContext,
            ),
            (
                "class Main { static void main() { var x = this; } }",
                SemanticErrorKind::AccessToInstanceMemberFromStaticContext,
            ),
            (
                "class Main { void f() {} static void main() { f(); } }",
                SemanticErrorKind::InvalidCall,
            ),
        ];

        for (source, expected) in cases {
            let (kind, message) = semantic_error(source);

            assert_eq!(kind, expected, "{:?}: {}", source, message);
        }

        let unrelated = "class B { static int s() { return 1; } } class Main { static void main() { var b = new B(); var x = b.s(); } }";
        assert_eq!(semantic_error(unrelated).0, SemanticErrorKind::InvalidCall);

        let related = "class B { static int s() { return 1; } int f() { return this.s(); } }
            class C extends B { int g() { var c = new C(); return c.s(); } }
            class Main { static void main() {} }";
        assert!(mj::analyze_str(related).is_ok());

        let fine = "class Main { static int f() { return 2; } static void main() { var x = f(); System.printIln(x); } }";
        assert!(mj::analyze_str(fine).is_ok());
    }

    #[test]
    fn test_main_rule() {
        assert_eq!(semantic_error("class A {}").0, SemanticErrorKind::MissingMain);
        assert_eq!(
            semantic_error("class A { void main() {} }").0,
            SemanticErrorKind::MissingMain
        );

        let source = "class A { static void main() {} }\nclass B { static void main() {} }";
        match mj::analyze_str(source) {
            Err(CompileError::Semantic(e)) => {
                assert_eq!(e.kind, SemanticErrorKind::MultipleMain);
                assert_eq!(e.line, 2);
                assert_eq!(e.lexeme, "main");
            }
            other => panic!("expected MultipleMain, got {:?}", other),
        }

        assert_eq!(
            semantic_error("class A { static int main(int x) { return x; } }").0,
            SemanticErrorKind::MissingMain
        );
        assert_eq!(
            semantic_error("class A { static void main(int x) {} }").0,
            SemanticErrorKind::MissingMain
        );

        let overloaded = "class A { static void main() {} } class B { static int main() { return 1; } }";
        assert!(mj::analyze_str(overloaded).is_ok());

        let inherited = "class A { static void main() {} } class B extends A {}";
        assert!(mj::analyze_str(inherited).is_ok());
    }

    #[test]
    fn test_type_from_token() {
        let int = Token {
            kind: TokenKind::INT,
            lexeme: "int".to_owned(),
            line: 1,
        };
        let string = Token {
            kind: TokenKind::CLASS_IDENTIFIER,
            lexeme: "String".to_owned(),
            line: 1,
        };
        let class = Token {
            kind: TokenKind::CLASS_IDENTIFIER,
            lexeme: "Foo".to_owned(),
            line: 1,
        };

        assert_eq!(Type::from_token(&int), Type::Int);
        assert_eq!(Type::from_token(&string), Type::String);
        assert_eq!(Type::from_token(&class), Type::Class("Foo".to_owned()));
        assert_eq!(Type::Null.to_string(), "null");
    }
}
