#[cfg(test)]
mod resolver_tests {
    use std::io;

    use lox_interpreter as lox;

    use lox::error::{Diagnostic, Diagnostics, Phase};
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::scanner::scan_tokens;

    fn resolve(source: &str) -> Vec<Diagnostic> {
        let mut diagnostics = Diagnostics::new();
        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        assert!(diagnostics.is_empty(), "source must parse cleanly");

        let mut interpreter = Interpreter::with_output(Box::new(io::sink()));
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);

        diagnostics.into_vec()
    }

    fn messages(source: &str) -> Vec<String> {
        resolve(source).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn test_resolver_01_clean_program() {
        let source = "
            var a = 1;
            fun f(x) { var y = x; return y + a; }
            class A { init() { this.v = 1; } get() { return this.v; } }
            class B < A { get() { return super.get(); } }
        ";

        assert!(resolve(source).is_empty());
    }

    #[test]
    fn test_resolver_02_local_redeclaration() {
        let diagnostics = resolve("{\n var a = 1;\n var a = 2;\n}");

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].phase, Phase::Resolve);
        assert_eq!(
            diagnostics[0].to_string(),
            "[line 3] Error at 'a': Already a variable with this name in this scope."
        );
    }

    #[test]
    fn test_resolver_03_global_redeclaration_is_allowed() {
        assert!(resolve("var a = 1; var a = 2;").is_empty());
    }

    #[test]
    fn test_resolver_04_duplicate_parameter() {
        assert_eq!(
            messages("fun f(a, a) {}"),
            vec!["Already a variable with this name in this scope."]
        );
    }

    #[test]
    fn test_resolver_05_own_initializer() {
        assert_eq!(
            messages("var a = 1; { var a = a; }"),
            vec!["Can't read local variable in its own initializer."]
        );
    }

    #[test]
    fn test_resolver_06_top_level_return() {
        assert_eq!(
            messages("return 1;"),
            vec!["Can't return from top-level code."]
        );
    }

    #[test]
    fn test_resolver_07_initializer_return_value() {
        assert_eq!(
            messages("class A { init() { return 1; } }"),
            vec!["Can't return a value from an initializer."]
        );

        // A bare return is fine.
        assert!(resolve("class A { init() { return; } }").is_empty());
    }

    #[test]
    fn test_resolver_08_this_outside_class() {
        assert_eq!(
            messages("print this; fun f() { return this; }"),
            vec![
                "Can't use 'this' outside of a class.",
                "Can't use 'this' outside of a class."
            ]
        );
    }

    #[test]
    fn test_resolver_09_super_misuse() {
        assert_eq!(
            messages("super.go();"),
            vec!["Can't use 'super' outside of a class."]
        );

        assert_eq!(
            messages("class A { go() { super.go(); } }"),
            vec!["Can't use 'super' in a class with no superclass."]
        );
    }

    #[test]
    fn test_resolver_10_self_inheritance() {
        assert_eq!(
            messages("class A < A {}"),
            vec!["A class can't inherit from itself."]
        );
    }

    #[test]
    fn test_resolver_11_keeps_going_after_errors() {
        let source = "return 1;\n{ var a = 1; var a = 2; }\nprint this;";
        let diagnostics = resolve(source);

        assert_eq!(diagnostics.len(), 3);

        let lines: Vec<usize> = diagnostics.iter().map(|d| d.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }
}
