use crate::interpreter::builtins::{as_string, want_args};
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeError, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::fs;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("read".to_owned(), NativeFn::new("read", read));
    table.insert("create".to_owned(), NativeFn::new("create", create));
    table.insert("write".to_owned(), NativeFn::new("write", write));
    table
}

fn read(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let path = as_string(&args[0], "read")?;
    let contents = fs::read_to_string(&path).map_err(|e| RuntimeError::general(e.to_string()))?;
    Ok(Value::Str(contents))
}

fn create(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let path = as_string(&args[0], "create")?;
    fs::File::create(&path).map_err(|e| RuntimeError::general(e.to_string()))?;
    Ok(Value::Null)
}

fn write(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 2)?;
    let path = as_string(&args[0], "write")?;
    let contents = as_string(&args[1], "write")?;
    fs::write(&path, contents).map_err(|e| RuntimeError::general(e.to_string()))?;
    Ok(Value::Null)
}
