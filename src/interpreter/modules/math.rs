use crate::interpreter::builtins::want_args;
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeError, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("abs".to_owned(), NativeFn::new("abs", abs));
    table.insert("round".to_owned(), NativeFn::new("round", round));
    table.insert("floor".to_owned(), NativeFn::new("floor", floor));
    table.insert("ceil".to_owned(), NativeFn::new("ceil", ceil));
    table.insert("sqrt".to_owned(), NativeFn::new("sqrt", sqrt));
    table.insert("pow".to_owned(), NativeFn::new("pow", pow));
    table
}

fn unsupported(builtin: &str, value: &Value) -> RuntimeError {
    RuntimeError::general(format!(
        "argument to `{}` not supported, got {}",
        builtin,
        value.type_name()
    ))
}

fn abs(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(n.wrapping_abs())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        other => Err(unsupported("abs", other).into()),
    }
}

/// Rounds a float to the nearest integer; integers pass through.
fn round(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => Ok(Value::Integer(n.round() as i64)),
        other => Err(unsupported("round", other).into()),
    }
}

fn floor(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => Ok(Value::Integer(n.floor() as i64)),
        other => Err(unsupported("floor", other).into()),
    }
}

fn ceil(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Integer(n) => Ok(Value::Integer(*n)),
        Value::Float(n) => Ok(Value::Integer(n.ceil() as i64)),
        other => Err(unsupported("ceil", other).into()),
    }
}

fn sqrt(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    let value = match &args[0] {
        Value::Integer(n) => *n as f64,
        Value::Float(n) => *n,
        other => return Err(unsupported("sqrt", other).into()),
    };
    if value < 0.0 {
        return Err(RuntimeError::general("argument to `sqrt` must not be negative").into());
    }
    Ok(Value::Float(value.sqrt()))
}

/// Integer pairs stay integers, float pairs stay floats.
fn pow(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 2)?;
    match (&args[0], &args[1]) {
        (Value::Integer(base), Value::Integer(exp)) => {
            let result = (*base as f64).powf(*exp as f64);
            Ok(Value::Integer(result as i64))
        }
        (Value::Float(base), Value::Float(exp)) => Ok(Value::Float(base.powf(*exp))),
        _ => Err(RuntimeError::general(
            "arguments to `pow` must be both INTEGER or both FLOAT",
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_abs() {
        assert_eq!(
            abs(vec![Value::Integer(-5)], &mut io::sink()),
            Ok(Value::Integer(5))
        );
        assert_eq!(
            abs(vec![Value::Float(-2.5)], &mut io::sink()),
            Ok(Value::Float(2.5))
        );
    }

    #[test]
    fn test_rounding_family() {
        assert_eq!(
            round(vec![Value::Float(2.5)], &mut io::sink()),
            Ok(Value::Integer(3))
        );
        assert_eq!(
            floor(vec![Value::Float(2.9)], &mut io::sink()),
            Ok(Value::Integer(2))
        );
        assert_eq!(
            ceil(vec![Value::Float(2.1)], &mut io::sink()),
            Ok(Value::Integer(3))
        );
    }

    #[test]
    fn test_pow() {
        assert_eq!(
            pow(vec![Value::Integer(2), Value::Integer(10)], &mut io::sink()),
            Ok(Value::Integer(1024))
        );
        assert!(pow(vec![Value::Integer(2), Value::Float(2.0)], &mut io::sink()).is_err());
    }

    #[test]
    fn test_sqrt_rejects_negative() {
        assert!(sqrt(vec![Value::Integer(-1)], &mut io::sink()).is_err());
        assert_eq!(
            sqrt(vec![Value::Integer(9)], &mut io::sink()),
            Ok(Value::Float(3.0))
        );
    }
}
