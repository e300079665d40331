use crate::interpreter::builtins::{as_array, want_args};
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeErrorKind, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("len".to_owned(), NativeFn::new("len", len));
    table.insert("push".to_owned(), NativeFn::new("push", push));
    table.insert("pop".to_owned(), NativeFn::new("pop", pop));
    table.insert("first".to_owned(), NativeFn::new("first", first));
    table.insert("last".to_owned(), NativeFn::new("last", last));
    table.insert("rest".to_owned(), NativeFn::new("rest", rest));
    table.insert("reverse".to_owned(), NativeFn::new("reverse", reverse));
    table
}

fn len(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "len")?;
    let count = elements.borrow().len();
    Ok(Value::Integer(count as i64))
}

/// Appends in place and hands the same array back.
fn push(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    if args.len() < 2 {
        return Err(RuntimeErrorKind::WrongArity(args.len(), 2).into());
    }
    let elements = as_array(&args[0], "push")?;
    elements.borrow_mut().extend(args[1..].iter().cloned());
    Ok(args[0].clone())
}

/// Removes and returns the last element, or null when the array is empty.
fn pop(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "pop")?;
    let popped = elements.borrow_mut().pop();
    Ok(popped.unwrap_or(Value::Null))
}

fn first(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "first")?;
    let first = elements.borrow().first().cloned();
    Ok(first.unwrap_or(Value::Null))
}

fn last(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "last")?;
    let last = elements.borrow().last().cloned();
    Ok(last.unwrap_or(Value::Null))
}

fn rest(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "rest")?;
    let elements = elements.borrow();
    if elements.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::array(elements[1..].to_vec()))
}

fn reverse(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "reverse")?;
    let mut reversed = elements.borrow().clone();
    reversed.reverse();
    Ok(Value::array(reversed))
}
