#[cfg(test)]
mod hierarchy_tests {
    use minijavac as mj;

    use mj::builder::Builder;
    use mj::error::{CompileError, SemanticErrorKind};
    use mj::parser::Parser;
    use mj::scanner::Scanner;
    use mj::source::SourceBuffer;
    use mj::symbols::SymbolTable;

    fn consolidated(source: &str) -> Result<SymbolTable, CompileError> {
        let mut builder = Builder::new();
        Parser::new(Scanner::new(SourceBuffer::new(source)))?.parse_unit(&mut builder)?;

        let mut table = builder.finish();
        table.check_declarations()?;
        table.consolidate()?;

        Ok(table)
    }

    fn assert_semantic_error(source: &str, expected: SemanticErrorKind) -> String {
        match consolidated(source) {
            Err(CompileError::Semantic(e)) => {
                assert_eq!(e.kind, expected, "source {:?}: {}", source, e);
                e.message
            }
            other => panic!("expected {:?} for {:?}, got {:?}", expected, source, other),
        }
    }

    #[test]
    fn test_two_class_cycle() {
        assert_semantic_error(
            "class A extends B {} class B extends A {}",
            SemanticErrorKind::CircularInheritance,
        );
    }

    #[test]
    fn test_three_class_cycle() {
        assert_semantic_error(
            "class A extends B {} class B extends C {} class C extends A {}",
            SemanticErrorKind::CircularInheritance,
        );
    }

    #[test]
    fn test_undeclared_parent() {
        assert_semantic_error("class A extends Missing {}", SemanticErrorKind::UndeclaredClass);
    }

    #[test]
    fn test_final_and_static_parents() {
        assert_semantic_error(
            "final class B {} class A extends B {}",
            SemanticErrorKind::InvalidInheritance,
        );
        assert_semantic_error(
            "static class B {} class A extends B {}",
            SemanticErrorKind::InvalidInheritance,
        );
    }

    #[test]
    fn test_undeclared_member_types() {
        let cases = [
            "class A { Foo f; }",
            "class A { Foo f() { return null; } }",
            "class A { void f(Foo x) {} }",
            "class A { public A(Foo x) {} }",
        ];

        for source in cases {
            assert_semantic_error(source, SemanticErrorKind::UndeclaredClass);
        }
    }

    #[test]
    fn test_static_redefinition() {
        let message = assert_semantic_error(
            "class B { int f() { return 1; } } class A extends B { static int f() { return 2; } }",
            SemanticErrorKind::InvalidRedefinition,
        );

        assert!(message.contains("static"), "{}", message);
    }

    #[test]
    fn test_final_or_static_parent_method() {
        assert_semantic_error(
            "class B { final int f() { return 1; } } class A extends B { int f() { return 2; } }",
            SemanticErrorKind::InvalidRedefinition,
        );
        assert_semantic_error(
            "class B { static int f() { return 1; } } class A extends B { int f() { return 2; } }",
            SemanticErrorKind::InvalidRedefinition,
        );
    }

    #[test]
    fn test_abstract_redefined_as_abstract() {
        assert_semantic_error(
            "abstract class B { abstract void f(); } abstract class A extends B { abstract void f(); }",
            SemanticErrorKind::InvalidRedefinition,
        );
    }

    #[test]
    fn test_signature_changes() {
        let cases = [
            (
                "class B { void f(int a) {} } class A extends B { void f(int a, int b) {} }",
                "number of parameters",
            ),
            (
                "class B { int f() { return 1; } } class A extends B { char f() { return 'c'; } }",
                "return type",
            ),
            (
                "class B { void f(int a, char b) {} } class A extends B { void f(char b, int a) {} }",
                "order",
            ),
            (
                "class B { void f(int a) {} } class A extends B { void f(int z) {} }",
                "order",
            ),
            (
                "class B { void f(int a) {} } class A extends B { void f(char a) {} }",
                "type of parameter",
            ),
            (
                "class C {} class D {} class B { void f(C a) {} } class A extends B { void f(D a) {} }",
                "type of parameter",
            ),
        ];

        for (source, fragment) in cases {
            let message = assert_semantic_error(source, SemanticErrorKind::InvalidRedefinition);

            assert!(message.contains(fragment), "{:?}: {}", source, message);
        }
    }

    #[test]
    fn test_abstract_class_cannot_extend_concrete_class() {
        assert_semantic_error(
            "class B {} abstract class A extends B {}",
            SemanticErrorKind::InvalidInheritance,
        );

        assert!(consolidated("abstract class B {} abstract class A extends B {}").is_ok());
    }

    #[test]
    fn test_concrete_class_must_implement_abstract_methods() {
        assert_semantic_error(
            "abstract class B { abstract void f(); } class A extends B {}",
            SemanticErrorKind::InvalidClassDeclaration,
        );

        assert!(consolidated(
            "abstract class B { abstract void f(); } class A extends B { void f() {} }"
        )
        .is_ok());
    }

    #[test]
    fn test_members_are_inherited_parent_first() {
        let table = consolidated(
            "class C extends B {} class B extends A { int y; } class A { int x; void m() {} }",
        )
        .unwrap();

        let c = table.class("C").unwrap();

        assert!(c.consolidated);
        assert_eq!(c.attribute("x").unwrap().owner, "A");
        assert_eq!(c.attribute("y").unwrap().owner, "B");
        assert_eq!(c.methods["m"].owner, "A");
        assert!(c.methods.contains_key("debugPrint"));
        assert!(c.own_methods().is_empty());

        for ancestor in ["A", "B", "C", "Object"] {
            assert!(c.ancestors.contains(ancestor), "missing {}", ancestor);
        }

        assert!(table.conforms("C", "A"));
        assert!(table.conforms("C", "Object"));
        assert!(!table.conforms("A", "C"));
    }

    #[test]
    fn test_attribute_shadowing_keeps_both() {
        let table = consolidated("class A { int x; } class B extends A { char x; }").unwrap();
        let b = table.class("B").unwrap();

        assert_eq!(b.attributes["x"].len(), 2);
        assert_eq!(b.attribute("x").unwrap().owner, "B");
        assert_eq!(b.attribute("x").unwrap().ty.lexeme, "char");
    }

    #[test]
    fn test_builtins_are_present() {
        let table = SymbolTable::new();

        let system = table.class("System").unwrap();
        assert!(system.methods["printIln"].is_static());
        assert_eq!(system.methods["read"].return_type.lexeme, "int");
        assert_eq!(system.methods.len(), 10);

        assert!(table.class("Object").unwrap().parent.is_none());
        assert_eq!(table.class("String").unwrap().parent_name(), Some("Object"));
        assert_eq!(table.user_classes().count(), 0);
    }
}
