#[cfg(test)]
mod compile_tests {
    use std::fs;

    use minijavac as mj;

    use mj::ast_printer::AstPrinter;
    use mj::error::{CompileError, SemanticErrorKind};
    use mj::source::SourceBuffer;

    const COUNTER: &str = "class Counter {
    int count;
    public Counter(int start) { count = start; }
    int next() { count = count + 1; return count; }
}
class Main {
    static void main() {
        var c = new Counter(0);
        while (c.next() < 3) System.printIln(c.count);
    }
}
";

    #[test]
    fn test_analyze_realistic_program() {
        let source = r#"
            abstract class Shape {
                String name;
                abstract int area();
                String describe() { return name; }
            }

            class Rectangle extends Shape {
                int width;
                int height;

                public Rectangle(int w, int h) {
                    width = w;
                    height = h;
                    name = "rectangle";
                }

                int area() { return width * height; }
            }

            final class Square extends Rectangle {
                public Square(int side) { width = side; height = side; }

                boolean isBig() { return area() > 100; }
            }

            class Main {
                static void main() {
                    var sq = new Square(12);
                    var shape = sq;
                    if (sq.isBig()) {
                        System.printSln(sq.describe());
                    } else {
                        System.printIln(sq.area());
                    }
                    var total = 0;
                    while (total < 10) {
                        total = total + System.read();
                    }
                    System.printBln(sq.isBig() && (total == 10));
                }
            }
        "#;

        let context = mj::analyze_str(source).unwrap();

        let square = context.table.class("Square").unwrap();
        assert!(square.ancestors.contains("Shape"));
        assert!(square.methods.contains_key("describe"));
        assert_eq!(square.methods["area"].owner, "Rectangle");
        assert_eq!(
            context.table.user_classes().map(|c| c.name()).collect::<Vec<_>>(),
            vec!["Shape", "Rectangle", "Square", "Main"]
        );
    }

    #[test]
    fn test_print_program() {
        let context = mj::analyze_str(COUNTER).unwrap();

        let expected = "\
class Counter extends Object
  constructor Counter(int start)
    block
      (= count start)
  method int next()
    block
      (= count (+ count 1))
      (return count)
class Main extends Object
  static method void main()
    block
      (var c (new Counter 0))
      while (< (call c.next) 3)
        (call System.printIln (. c count))
";

        assert_eq!(AstPrinter::print_program(&context.table), expected);
    }

    #[test]
    fn test_analyze_from_file() {
        let path = std::env::temp_dir().join(format!("minijavac-{}.java", std::process::id()));
        fs::write(&path, COUNTER).unwrap();

        let result = SourceBuffer::from_path(&path).and_then(mj::analyze);
        fs::remove_file(&path).unwrap();

        assert!(result.is_ok(), "{:?}", result);
    }

    #[test]
    fn test_missing_file() {
        let error = SourceBuffer::from_path("does/not/exist.java").unwrap_err();

        assert!(matches!(error, CompileError::FileNotFound(_)));
        assert_eq!(error.report(), "File not found: does/not/exist.java");
    }

    #[test]
    fn test_each_stage_reports_its_own_error() {
        assert!(matches!(
            mj::analyze_str("class A { int x = 1; }"),
            Err(CompileError::Syntactic(_))
        ));
        assert!(matches!(
            mj::analyze_str("class A { void f() { c = '; } }"),
            Err(CompileError::Lexical(_))
        ));

        let Err(CompileError::Semantic(error)) = mj::analyze_str("class A extends B {}") else {
            panic!("expected a semantic error");
        };

        assert_eq!(error.kind, SemanticErrorKind::UndeclaredClass);
        assert_eq!(error.report(), "Semantic error at line 1: parent class B is not declared\n\n[Error:B|1]");
    }

    #[test]
    fn test_syntax_stage_skips_semantics() {
        let source = "class A extends Missing { void f() { x = y; } }";

        assert!(mj::parser::validate(SourceBuffer::new(source)).is_ok());
        assert!(mj::analyze_str(source).is_err());
    }
}
