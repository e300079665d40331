use crate::interpreter::builtins::{as_string, want_args};
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("len".to_owned(), NativeFn::new("len", len));
    table.insert("concat".to_owned(), NativeFn::new("concat", concat));
    table.insert(
        "concatDelim".to_owned(),
        NativeFn::new("concatDelim", concat_delim),
    );
    table.insert("split".to_owned(), NativeFn::new("split", split));
    table.insert("lower".to_owned(), NativeFn::new("lower", lower));
    table.insert("upper".to_owned(), NativeFn::new("upper", upper));
    table
}

fn len(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    match &args[0] {
        Value::Str(s) => Ok(Value::Integer(s.len() as i64)),
        Value::Array(elements) => Ok(Value::Integer(elements.borrow().len() as i64)),
        other => Err(RuntimeError::general(format!(
            "argument to `len` not supported for type {}",
            other.type_name()
        ))
        .into()),
    }
}

fn concat(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    if args.len() < 2 {
        return Err(RuntimeErrorKind::WrongArity(args.len(), 2).into());
    }

    let mut output = String::new();
    for arg in &args {
        output.push_str(&as_string(arg, "concat")?);
    }
    Ok(Value::Str(output))
}

/// Joins every argument after the first with the first as delimiter.
fn concat_delim(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    if args.len() < 2 {
        return Err(RuntimeErrorKind::WrongArity(args.len(), 2).into());
    }

    let delimiter = as_string(&args[0], "concatDelim")?;
    let mut parts = Vec::with_capacity(args.len() - 1);
    for arg in &args[1..] {
        parts.push(as_string(arg, "concatDelim")?);
    }
    Ok(Value::Str(parts.join(&delimiter)))
}

fn split(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 2)?;
    let subject = as_string(&args[0], "split")?;
    let delimiter = as_string(&args[1], "split")?;

    let parts: Vec<Value> = if delimiter.is_empty() {
        subject.chars().map(|ch| Value::Str(ch.to_string())).collect()
    } else {
        subject
            .split(&delimiter)
            .map(|part| Value::Str(part.to_owned()))
            .collect()
    };
    Ok(Value::array(parts))
}

fn lower(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    Ok(Value::Str(as_string(&args[0], "lower")?.to_lowercase()))
}

fn upper(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 1)?;
    Ok(Value::Str(as_string(&args[0], "upper")?.to_uppercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_concat_delim() {
        let result = concat_delim(
            vec![
                Value::Str(", ".to_owned()),
                Value::Str("a".to_owned()),
                Value::Str("b".to_owned()),
            ],
            &mut io::sink(),
        );
        assert_eq!(result, Ok(Value::Str("a, b".to_owned())));
    }

    #[test]
    fn test_split() {
        let result = split(
            vec![Value::Str("a,b,c".to_owned()), Value::Str(",".to_owned())],
            &mut io::sink(),
        )
        .unwrap();
        assert_eq!(result.inspect(), "[a, b, c]");
    }

    #[test]
    fn test_case_changes() {
        assert_eq!(
            upper(vec![Value::Str("abc".to_owned())], &mut io::sink()),
            Ok(Value::Str("ABC".to_owned()))
        );
        assert_eq!(
            lower(vec![Value::Str("ABC".to_owned())], &mut io::sink()),
            Ok(Value::Str("abc".to_owned()))
        );
    }

    #[test]
    fn test_concat_rejects_non_strings() {
        let result = concat(
            vec![Value::Str("a".to_owned()), Value::Integer(1)],
            &mut io::sink(),
        );
        assert!(result.is_err());
    }
}
