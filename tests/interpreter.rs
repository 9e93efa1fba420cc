#[cfg(test)]
mod interpreter_tests {
    use lox_interpreter as lox;

    use std::io::{self, Write};

    use lox::error::{Diagnostics, LoxError, Phase};
    use lox::interpreter::Interpreter;
    use lox::parser::Parser;
    use lox::resolver::Resolver;
    use lox::runner::{run, RunReport, Status};
    use lox::scanner::scan_tokens;
    use lox::value::Value;

    fn double(args: &[Value]) -> Result<Value, String> {
        match args[0] {
            Value::Number(n) => Ok(Value::Number(n * 2.0)),
            _ => Err("double expects a number.".to_string()),
        }
    }

    fn interpret_with_double(source: &str) -> Result<(), LoxError> {
        let mut diagnostics = Diagnostics::new();
        let mut interpreter = Interpreter::with_output(Box::new(io::sink()));
        interpreter.define_native("double", 1, double);

        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
        assert!(diagnostics.is_empty());

        interpreter.interpret(&statements)
    }

    /// Accepts every write but refuses to flush.
    struct UnflushableSink;

    impl Write for UnflushableSink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "sink is closed"))
        }
    }

    fn interpret_into_unflushable(source: &str) -> Result<(), LoxError> {
        let mut diagnostics = Diagnostics::new();
        let mut interpreter = Interpreter::with_output(Box::new(UnflushableSink));

        let tokens = scan_tokens(source, &mut diagnostics);
        let statements = Parser::new(tokens).parse(&mut diagnostics);
        Resolver::new(&mut interpreter).resolve(&statements, &mut diagnostics);
        assert!(diagnostics.is_empty());

        interpreter.interpret(&statements)
    }

    fn output_of(source: &str) -> Vec<String> {
        let report: RunReport = run(source);
        assert_eq!(
            report.status,
            Status::Ok,
            "unexpected diagnostics: {:?}",
            report.diagnostics
        );
        report.output
    }

    fn runtime_error(source: &str) -> (Vec<String>, String, usize) {
        let report: RunReport = run(source);
        assert_eq!(report.status, Status::RuntimeError);
        assert_eq!(report.diagnostics.len(), 1);

        let diagnostic = &report.diagnostics[0];
        assert_eq!(diagnostic.phase, Phase::Runtime);

        (report.output.clone(), diagnostic.message.clone(), diagnostic.line)
    }

    #[test]
    fn test_interpreter_01_arithmetic() {
        assert_eq!(output_of("print 1 + 2 * 3;"), vec!["7"]);
        assert_eq!(output_of("print (1 + 2) * 3;"), vec!["9"]);
        assert_eq!(output_of("print 7 / 2;"), vec!["3.5"]);
        assert_eq!(output_of("print -(4 - 6);"), vec!["2"]);
    }

    #[test]
    fn test_interpreter_02_division_by_zero_is_ieee() {
        assert_eq!(output_of("print 10 / (5 - 5);"), vec!["Infinity"]);
        assert_eq!(output_of("print -10 / 0;"), vec!["-Infinity"]);
        assert_eq!(output_of("print 0 / 0;"), vec!["NaN"]);
    }

    #[test]
    fn test_interpreter_03_strings_and_equality() {
        assert_eq!(output_of("print \"foo\" + \"bar\";"), vec!["foobar"]);
        assert_eq!(
            output_of("print 1 == 1; print \"a\" == \"a\"; print nil == false; print 1 != \"1\";"),
            vec!["true", "true", "false", "true"]
        );
        assert_eq!(output_of("print !nil; print !0;"), vec!["true", "false"]);
    }

    #[test]
    fn test_interpreter_04_logical_operators_return_operands() {
        assert_eq!(
            output_of("print nil or \"yes\"; print 1 and 2; print false and boom;"),
            vec!["yes", "2", "false"]
        );
    }

    #[test]
    fn test_interpreter_05_define_get_assign() {
        assert_eq!(
            output_of("var a = 1; print a; a = 2; print a; var b; print b;"),
            vec!["1", "2", "nil"]
        );
    }

    #[test]
    fn test_interpreter_06_shadowing_leaves_outer_binding() {
        let source = r#"
            var a = "outer";
            {
                var a = "inner";
                print a;
            }
            print a;
        "#;

        assert_eq!(output_of(source), vec!["inner", "outer"]);
    }

    #[test]
    fn test_interpreter_07_control_flow() {
        let source = r#"
            var i = 0;
            while (i < 3) { print i; i = i + 1; }
            for (var j = 0; j < 2; j = j + 1) print j * 10;
            if (i == 3) print "three"; else print "other";
        "#;

        assert_eq!(output_of(source), vec!["0", "1", "2", "0", "10", "three"]);
    }

    #[test]
    fn test_interpreter_08_fibonacci() {
        let source = r#"
            fun fib(n) {
                if (n < 2) return n;
                return fib(n - 2) + fib(n - 1);
            }

            for (var i = 0; i < 21; i = i + 1) {
                print fib(i);
            }
        "#;

        let expected: Vec<String> = [
            0, 1, 1, 2, 3, 5, 8, 13, 21, 34, 55, 89, 144, 233, 377, 610, 987, 1597, 2584, 4181,
            6765,
        ]
        .iter()
        .map(|n| n.to_string())
        .collect();

        assert_eq!(output_of(source), expected);
    }

    #[test]
    fn test_interpreter_09_counter_closures_are_independent() {
        let source = r#"
            fun makeCounter() {
                var i = 0;
                fun count() {
                    i = i + 1;
                    return i;
                }
                return count;
            }

            var a = makeCounter();
            var b = makeCounter();
            print a();
            print a();
            print b();
        "#;

        assert_eq!(output_of(source), vec!["1", "2", "1"]);
    }

    #[test]
    fn test_interpreter_10_closures_bind_statically() {
        let source = r#"
            var a = "global";
            {
                fun show() { print a; }
                show();
                var a = "block";
                show();
            }
        "#;

        assert_eq!(output_of(source), vec!["global", "global"]);
    }

    #[test]
    fn test_interpreter_11_return_unwinds_loops() {
        let source = r#"
            fun first() {
                while (true) {
                    for (var i = 0; ; i = i + 1) {
                        if (i == 4) return i;
                    }
                }
            }
            print first();
            fun nothing() { return; }
            print nothing();
        "#;

        assert_eq!(output_of(source), vec!["4", "nil"]);
    }

    #[test]
    fn test_interpreter_12_value_formatting() {
        let source = r#"
            fun f() {}
            print f;
            print clock;
            print 2.50;
            print true;
        "#;

        assert_eq!(
            output_of(source),
            vec!["<fn f>", "<native fn>", "2.5", "true"]
        );
    }

    #[test]
    fn test_interpreter_13_clock_is_a_number() {
        assert_eq!(output_of("print clock() >= 0;"), vec!["true"]);
    }

    #[test]
    fn test_interpreter_14_undefined_variable() {
        let (output, message, line) = runtime_error("print \"before\";\nprint a;");

        assert_eq!(output, vec!["before"]);
        assert_eq!(message, "Undefined variable 'a'.");
        assert_eq!(line, 2);
    }

    #[test]
    fn test_interpreter_15_type_errors() {
        assert_eq!(runtime_error("-\"x\";").1, "Operand must be a number.");
        assert_eq!(runtime_error("1 < \"x\";").1, "Operands must be numbers.");
        assert_eq!(
            runtime_error("1 + \"x\";").1,
            "Operands must be two numbers or two strings."
        );
    }

    #[test]
    fn test_interpreter_16_call_errors() {
        assert_eq!(
            runtime_error("\"nope\"();").1,
            "Can only call functions and classes."
        );
        assert_eq!(
            runtime_error("fun f(a, b) {} f(1);").1,
            "Expected 2 arguments but got 1."
        );
    }

    #[test]
    fn test_interpreter_17_runaway_recursion_is_a_runtime_error() {
        let report: RunReport = run("fun f() { f(); } f();");

        assert_eq!(report.status, Status::RuntimeError);
        assert_eq!(report.diagnostics[0].message, "Stack overflow.");
    }

    #[test]
    fn test_interpreter_18_execution_stops_at_first_runtime_error() {
        let (output, _, line) = runtime_error("print 1;\nnil();\nprint 2;");

        assert_eq!(output, vec!["1"]);
        assert_eq!(line, 2);
    }

    #[test]
    fn test_interpreter_19_host_natives() {
        assert!(interpret_with_double("if (double(21) != 42) nil();").is_ok());

        let err = interpret_with_double("print 1;\ndouble(\"x\");").unwrap_err();
        assert_eq!(err.to_string(), "double expects a number.\n[line 2]");
    }

    #[test]
    fn test_interpreter_20_deep_recursion_runs_on_a_default_thread() {
        let source = r#"
            fun sum(n) {
                if (n == 0) return 0;
                return n + sum(n - 1);
            }
            print sum(1000);
        "#;

        assert_eq!(output_of(source), vec!["500500"]);
    }

    #[test]
    fn test_interpreter_21_deeply_nested_expression() {
        let source = format!("print {}1{};", "(".repeat(2000), ")".repeat(2000));

        assert_eq!(output_of(&source), vec!["1"]);
    }

    #[test]
    fn test_interpreter_22_runtime_error_outranks_failed_flush() {
        let err = interpret_into_unflushable("print 1;\nnil();").unwrap_err();

        assert!(matches!(err, LoxError::Runtime { .. }));
        assert_eq!(err.to_string(), "Can only call functions and classes.\n[line 2]");
    }

    #[test]
    fn test_interpreter_23_failed_flush_surfaces_when_program_succeeds() {
        let err = interpret_into_unflushable("print 1;").unwrap_err();

        assert!(matches!(err, LoxError::Io(_)));
        assert_eq!(err.phase(), Phase::Runtime);
    }
}
