use rusty_clear::clear_frontend::diagnostics::{self, Diagnostic};
use rusty_clear::clear_frontend::grammar::Program;
use rusty_clear::clear_frontend::{Lexer, Parser};
use rusty_clear::interpreter::{modules, Interpreter};

use clap::Parser as ArgParser;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::{fs, process};

/// The Clear programming language.
#[derive(ArgParser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to a .clr script. Starts an interactive prompt when omitted.
    script: Option<PathBuf>,

    /// Write the parsed AST as JSON next to the script.
    #[arg(long)]
    dump_ast: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match args.script {
        Some(path) => run_script(&path, args.dump_ast),
        None => run_prompt(),
    }
}

fn run_script(path: &Path, dump_ast: bool) {
    if path.extension().and_then(|e| e.to_str()) != Some("clr") {
        eprintln!("error: invalid file type, please provide a .clr file");
        process::exit(1);
    }

    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: failed to read {}: {}", path.display(), e);
            process::exit(1);
        }
    };

    let (program, parse_diagnostics) = Parser::new(Lexer::new(&source)).parse_program();
    report(&parse_diagnostics);
    if diagnostics::has_errors(&parse_diagnostics) {
        process::exit(1);
    }

    if program.is_empty {
        eprintln!("no valid statements in the program");
        process::exit(1);
    }

    if dump_ast {
        dump_ast_json(path, &program);
    }

    let mut interpreter = Interpreter::new();
    modules::register(interpreter.globals());

    let lines: Vec<String> = source.split('\n').map(|l| l.to_owned()).collect();
    if let Err(error) = interpreter.eval_program(&program) {
        eprintln!("{}", error.to_diagnostic(&lines));
        process::exit(1);
    }
}

fn dump_ast_json(path: &Path, program: &Program) {
    let json = match serde_json::to_string_pretty(program) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("error: failed to serialize AST: {}", e);
            process::exit(1);
        }
    };

    let out_path = path.with_extension("ast.json");
    if let Err(e) = fs::write(&out_path, json) {
        eprintln!("error: failed to write {}: {}", out_path.display(), e);
        process::exit(1);
    }
    println!("AST dumped to {}", out_path.display());
}

fn run_prompt() {
    println!(
        "Clear {} interactive prompt, Ctrl-D to quit",
        env!("CARGO_PKG_VERSION")
    );

    let mut interpreter = Interpreter::new();
    modules::register(interpreter.globals());

    let stdin = io::stdin();
    loop {
        print!(">> ");
        io::stdout().flush().expect("flush stdout");

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                eprintln!("error: failed to read line: {}", e);
                return;
            }
        }

        let (program, parse_diagnostics) = Parser::new(Lexer::new(&line)).parse_program();
        report(&parse_diagnostics);
        if diagnostics::has_errors(&parse_diagnostics) {
            continue;
        }

        let lines: Vec<String> = line.split('\n').map(|l| l.to_owned()).collect();
        match interpreter.eval_program(&program) {
            Ok(value) => println!("{}", value.inspect()),
            Err(error) => eprintln!("{}", error.to_diagnostic(&lines)),
        }
    }
}

fn report(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}", diagnostic);
    }
}
