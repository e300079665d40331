use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeError, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::io::{BufRead, Write};

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("print".to_owned(), NativeFn::new("print", print));
    table.insert("println".to_owned(), NativeFn::new("println", println));
    table.insert("input".to_owned(), NativeFn::new("input", input));
    table
}

fn render(args: &[Value]) -> String {
    args.iter().map(|arg| arg.inspect()).collect()
}

fn print(args: Vec<Value>, output: &mut dyn Write) -> RuntimeResult<Value> {
    write!(output, "{}", render(&args)).map_err(|e| RuntimeError::general(e.to_string()))?;
    Ok(Value::Null)
}

fn println(args: Vec<Value>, output: &mut dyn Write) -> RuntimeResult<Value> {
    writeln!(output, "{}", render(&args)).map_err(|e| RuntimeError::general(e.to_string()))?;
    Ok(Value::Null)
}

/// Reads one line from stdin, without the trailing newline.
fn input(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    if !args.is_empty() {
        return Err(RuntimeError::general(format!(
            "wrong number of arguments. got={}, want=0",
            args.len()
        ))
        .into());
    }

    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| RuntimeError::general(e.to_string()))?;
    while line.ends_with('\n') || line.ends_with('\r') {
        line.pop();
    }
    Ok(Value::Str(line))
}
