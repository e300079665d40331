use crate::interpreter::builtins::{as_integer, want_args};
use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::{RuntimeError, RuntimeResult};
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use rand::Rng;
use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("rand".to_owned(), NativeFn::new("rand", rand));
    table
}

/// A uniform integer in `[min, max]`.
fn rand(args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    want_args(&args, 2)?;
    let min = as_integer(&args[0], "rand")?;
    let max = as_integer(&args[1], "rand")?;
    if min > max {
        return Err(RuntimeError::general("min must be less than max").into());
    }

    let mut rng = rand::thread_rng();
    Ok(Value::Integer(rng.gen_range(min..=max)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_rand_stays_in_range() {
        for _ in 0..50 {
            let result = rand(
                vec![Value::Integer(-2), Value::Integer(7)],
                &mut io::sink(),
            )
            .unwrap();
            match result {
                Value::Integer(n) => assert!((-2..=7).contains(&n)),
                other => panic!("expected integer, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_rand_rejects_inverted_range() {
        assert!(rand(vec![Value::Integer(5), Value::Integer(1)], &mut io::sink()).is_err());
    }
}
