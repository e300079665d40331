use rusty_clear::clear_frontend::{Lexer, Parser};
use rusty_clear::interpreter::{modules, Interpreter};

use regex::Regex;
use test_generator::test_resources;

#[derive(Debug, PartialEq)]
struct Output {
    output: Vec<String>,
    parse_errors: Vec<String>,
    runtime_error: Option<String>,
}

/// Each `.clr` case declares its expectations in comments:
/// `// expect: <line>` for printed output, `// expect parse error: <msg>`
/// and `// expect runtime error: <msg>` for failures.
#[test_resources("tests/clear_test_cases/**/*.clr")]
fn test_clear_script(file: &str) {
    let source = std::fs::read_to_string(file).unwrap();

    let expected = get_expected_output(&source);
    let actual = run_interpreter_on_source(&source);

    assert_eq!(expected, actual);
}

fn run_interpreter_on_source(source: &str) -> Output {
    let mut result = Output {
        output: vec![],
        parse_errors: vec![],
        runtime_error: None,
    };

    let (program, diagnostics) = Parser::new(Lexer::new(source)).parse_program();
    result.parse_errors = diagnostics
        .iter()
        .filter(|d| !d.is_warning)
        .map(|d| d.message.clone())
        .collect();
    if !result.parse_errors.is_empty() {
        return result;
    }

    let mut captured = Vec::new();
    {
        let mut interpreter = Interpreter::with_output(std::io::Cursor::new(&mut captured));
        modules::register(interpreter.globals());
        result.runtime_error = interpreter
            .eval_program(&program)
            .err()
            .map(|e| e.to_string());
    }

    result.output = String::from_utf8(captured)
        .unwrap()
        .lines()
        .map(|l| l.to_owned())
        .collect();

    result
}

fn get_expected_output(source: &str) -> Output {
    let output_regexer = Regex::new(r"// expect: (.*)$").unwrap();
    let parse_error_regexer = Regex::new(r"// expect parse error: (.*)$").unwrap();
    let runtime_error_regexer = Regex::new(r"// expect runtime error: (.*)$").unwrap();

    let mut result = Output {
        output: vec![],
        parse_errors: vec![],
        runtime_error: None,
    };

    for line in source.lines() {
        if let Some(r) = output_regexer.captures(line) {
            result.output.push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = parse_error_regexer.captures(line) {
            result
                .parse_errors
                .push(r.get(1).unwrap().as_str().to_owned());
        }
        if let Some(r) = runtime_error_regexer.captures(line) {
            result
                .runtime_error
                .replace(r.get(1).unwrap().as_str().to_owned());
        }
    }

    result
}
