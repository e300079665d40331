use crate::interpreter::builtins::{as_integer, want_args};
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{InterpreterError, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("exit".to_owned(), NativeFn::new("exit", exit));
    table
}

/// Unwinds evaluation with the exit code as the program result; the CLI
/// turns that into a process exit code.
fn exit(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let code = as_integer(&args[0], "exit")?;
    Err(InterpreterError::Return(Value::Integer(code)))
}
