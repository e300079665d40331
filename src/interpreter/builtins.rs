use super::errors::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use super::native_function::NativeFn;
use super::object::Value;

use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

/// Builtins bound in the global environment without any import.
pub fn global_builtins() -> Vec<NativeFn> {
    vec![
        NativeFn::new("len", len),
        NativeFn::new("first", first),
        NativeFn::new("last", last),
        NativeFn::new("rest", rest),
        NativeFn::new("push", push),
    ]
}

pub fn want_args(args: &[Value], want: usize) -> RuntimeResult<()> {
    if args.len() != want {
        return Err(RuntimeErrorKind::WrongArity(args.len(), want).into());
    }
    Ok(())
}

pub fn as_array(value: &Value, builtin: &str) -> RuntimeResult<Rc<RefCell<Vec<Value>>>> {
    match value {
        Value::Array(elements) => Ok(elements.clone()),
        other => Err(RuntimeError::general(format!(
            "argument to `{}` must be an ARRAY, got type {}",
            builtin,
            other.type_name()
        ))
        .into()),
    }
}

pub fn as_string(value: &Value, builtin: &str) -> RuntimeResult<String> {
    match value {
        Value::Str(s) => Ok(s.clone()),
        other => Err(RuntimeError::general(format!(
            "argument to `{}` must be a STRING, got type {}",
            builtin,
            other.type_name()
        ))
        .into()),
    }
}

pub fn as_integer(value: &Value, builtin: &str) -> RuntimeResult<i64> {
    match value {
        Value::Integer(n) => Ok(*n),
        other => Err(RuntimeError::general(format!(
            "argument to `{}` must be an INTEGER, got type {}",
            builtin,
            other.type_name()
        ))
        .into()),
    }
}

fn len(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Array(elements) => Ok(Value::Integer(elements.borrow().len() as i64)),
        Value::Str(s) => Ok(Value::Integer(s.len() as i64)),
        other => Err(RuntimeError::general(format!(
            "argument to `len` not supported for type {}",
            other.type_name()
        ))
        .into()),
    }
}

fn first(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "first")?;
    let elements = elements.borrow();
    Ok(elements.first().cloned().unwrap_or(Value::Null))
}

fn last(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let elements = as_array(&args[0], "last")?;
    let elements = elements.borrow();
    Ok(elements.last().cloned().unwrap_or(Value::Null))
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

/// Unlike `arrays.push`, the global `push` leaves its argument alone and
/// returns a fresh array.
fn push(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 2)?;
    let elements = as_array(&args[0], "push")?;
    let mut new_elements = elements.borrow().clone();
    new_elements.push(args[1].clone());
    Ok(Value::array(new_elements))
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::native_function::BuiltinFn;
    use std::io;

    fn call(f: BuiltinFn, args: Vec<Value>) -> RuntimeResult<Value> {
        f(args, &mut io::sink())
    }

    #[test]
    fn test_len() {
        assert_eq!(
            call(len, vec![Value::Str("hello".to_owned())]),
            Ok(Value::Integer(5))
        );
        assert_eq!(
            call(len, vec![Value::array(vec![Value::Integer(1)])]),
            Ok(Value::Integer(1))
        );
        assert!(call(len, vec![Value::Integer(1)]).is_err());
        assert!(call(len, vec![]).is_err());
    }

    #[test]
    fn test_global_push_copies() {
        let original = Value::array(vec![Value::Integer(1)]);
        let pushed = call(push, vec![original.clone(), Value::Integer(2)]).unwrap();

        assert_eq!(pushed.inspect(), "[1, 2]");
        assert_eq!(original.inspect(), "[1]");
    }

    #[test]
    fn test_rest_of_empty_is_null() {
        assert_eq!(call(rest, vec![Value::array(vec![])]), Ok(Value::Null));
    }
}
