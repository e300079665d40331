use crate::interpreter::environment::ModuleTable;
use crate::interpreter::errors::RuntimeResult;
use crate::interpreter::native_function::NativeFn;
use crate::interpreter::object::Value;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::io::Write;

pub fn builtins() -> ModuleTable {
    let mut table = HashMap::new();
    table.insert("now".to_owned(), NativeFn::new("now", now));
    table
}

/// Human-readable current time, e.g. "2026-08-02 17:03:41 UTC".
fn now(_args: Vec<Value>, _output: &mut dyn Write) -> RuntimeResult<Value> {
    let now: DateTime<Utc> = Utc::now();
    Ok(Value::Str(now.format("%Y-%m-%d %H:%M:%S UTC").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_now_renders_a_timestamp_string() {
        let result = now(vec![], &mut io::sink()).unwrap();
        match result {
            Value::Str(s) => {
                assert!(s.ends_with(" UTC"), "unexpected format: {}", s);
                assert_eq!(s.len(), "2026-08-02 17:03:41 UTC".len());
            }
            other => panic!("expected string, got {:?}", other),
        }
    }
}
