use super::errors::{RuntimeError, RuntimeErrorKind, RuntimeResult};
use super::function::ClearFn;
use super::native_function::NativeFn;
use crate::clear_frontend::grammar::{InfixOperator, PostfixOperator, PrefixOperator};

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A runtime value. Arrays and hashes are shared and interior-mutable so
/// module builtins can rebuild them in place.
#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Str(String),
    Null,
    Array(Rc<RefCell<Vec<Value>>>),
    Hash(Rc<RefCell<HashMap<HashKey, HashPair>>>),
    Function(ClearFn),
    NativeFunc(NativeFn),
}

/// The hashed form of a key: a type tag plus a 64-bit digest. Two keys
/// collide iff both match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HashKey {
    pub tag: HashTag,
    pub digest: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashTag {
    Integer,
    Boolean,
    Str,
}

/// The original key is kept alongside the value so hashes can print
/// themselves back out.
#[derive(Debug, Clone, PartialEq)]
pub struct HashPair {
    pub key: Value,
    pub value: Value,
}

impl Value {
    pub fn array(elements: Vec<Value>) -> Value {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn hash(pairs: HashMap<HashKey, HashPair>) -> Value {
        Value::Hash(Rc::new(RefCell::new(pairs)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Float(_) => "FLOAT",
            Value::Boolean(_) => "BOOLEAN",
            Value::Str(_) => "STRING",
            Value::Null => "NULL",
            Value::Array(_) => "ARRAY",
            Value::Hash(_) => "HASH",
            Value::Function(_) => "FUNCTION",
            Value::NativeFunc(_) => "BUILTIN",
        }
    }

    /// Only `false` and `null` are false.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    /// The user-facing rendering of a value.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    format!("{:.1}", n)
                } else {
                    n.to_string()
                }
            }
            Value::Boolean(b) => b.to_string(),
            Value::Str(s) => s.clone(),
            Value::Null => "null".to_owned(),
            Value::Array(elements) => {
                let rendered: Vec<String> =
                    elements.borrow().iter().map(|e| e.inspect()).collect();
                format!("[{}]", rendered.join(", "))
            }
            Value::Hash(pairs) => {
                let rendered: Vec<String> = pairs
                    .borrow()
                    .values()
                    .map(|pair| format!("{}: {}", pair.key.inspect(), pair.value.inspect()))
                    .collect();
                format!("{{{}}}", rendered.join(", "))
            }
            Value::Function(f) => format!("fn({}) {{ ... }}", f.params().join(", ")),
            Value::NativeFunc(_) => "builtin function".to_owned(),
        }
    }

    /// Digest for use as a hash key; integers, booleans and strings only.
    pub fn hash_key(&self) -> Option<HashKey> {
        let key = match self {
            Value::Integer(n) => HashKey {
                tag: HashTag::Integer,
                digest: *n as u64,
            },
            Value::Boolean(b) => HashKey {
                tag: HashTag::Boolean,
                digest: *b as u64,
            },
            Value::Str(s) => HashKey {
                tag: HashTag::Str,
                digest: fnv1a_64(s.as_bytes()),
            },
            _ => return None,
        };
        Some(key)
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Value) -> RuntimeResult<Value> {
        match op {
            PrefixOperator::LogicalNot => Ok(Value::Boolean(!value.is_truthy())),
            PrefixOperator::Negate => match value {
                Value::Integer(n) => Ok(Value::Integer(n.wrapping_neg())),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(RuntimeError::new(RuntimeErrorKind::UnknownUnaryOperator(
                    op.symbol(),
                    other.type_name(),
                ))
                .into()),
            },
        }
    }

    /// Computes an infix operation. Compound operators evaluate their
    /// underlying arithmetic here; the store-back lives in the evaluator.
    pub fn apply_infix_op(op: InfixOperator, lhs: Value, rhs: Value) -> RuntimeResult<Value> {
        match (&lhs, &rhs) {
            (Value::Integer(a), Value::Integer(b)) => integer_infix(op, *a, *b),
            (Value::Float(a), Value::Float(b)) => float_infix(op, *a, *b),
            (Value::Float(a), Value::Integer(b)) => float_infix(op, *a, *b as f64),
            (Value::Integer(a), Value::Float(b)) => float_infix(op, *a as f64, *b),
            _ => match op {
                // Everything non-numeric compares by value identity.
                InfixOperator::EqualTo => Ok(Value::Boolean(identity_eq(&lhs, &rhs))),
                InfixOperator::NotEqualTo => Ok(Value::Boolean(!identity_eq(&lhs, &rhs))),
                _ => match (&lhs, &rhs) {
                    (Value::Str(a), Value::Str(b)) => {
                        if op.base_op() == InfixOperator::Add {
                            Ok(Value::Str(format!("{}{}", a, b)))
                        } else {
                            Err(RuntimeErrorKind::UnknownInfixOperator(
                                "STRING",
                                op.symbol(),
                                "STRING",
                            )
                            .into())
                        }
                    }
                    _ if lhs.type_name() != rhs.type_name() => {
                        Err(RuntimeErrorKind::TypeMismatch(
                            lhs.type_name(),
                            op.symbol(),
                            rhs.type_name(),
                        )
                        .into())
                    }
                    _ => Err(RuntimeErrorKind::UnknownInfixOperator(
                        lhs.type_name(),
                        op.symbol(),
                        rhs.type_name(),
                    )
                    .into()),
                },
            },
        }
    }

    pub fn apply_postfix_op(op: PostfixOperator, value: Value) -> RuntimeResult<Value> {
        let step = match op {
            PostfixOperator::Increment => 1,
            PostfixOperator::Decrement => -1,
        };
        match value {
            Value::Integer(n) => Ok(Value::Integer(n.wrapping_add(step))),
            Value::Float(n) => Ok(Value::Float(n + step as f64)),
            other => Err(RuntimeErrorKind::UnknownUnaryOperator(
                op.symbol(),
                other.type_name(),
            )
            .into()),
        }
    }
}

fn integer_infix(op: InfixOperator, a: i64, b: i64) -> RuntimeResult<Value> {
    let result = match op.base_op() {
        InfixOperator::Add => Value::Integer(a.wrapping_add(b)),
        InfixOperator::Subtract => Value::Integer(a.wrapping_sub(b)),
        InfixOperator::Multiply => Value::Integer(a.wrapping_mul(b)),
        InfixOperator::Divide => {
            if b == 0 {
                return Err(RuntimeErrorKind::DivisionByZero.into());
            }
            Value::Integer(a.wrapping_div(b))
        }
        InfixOperator::LessThan => Value::Boolean(a < b),
        InfixOperator::GreaterThan => Value::Boolean(a > b),
        InfixOperator::LessEq => Value::Boolean(a <= b),
        InfixOperator::GreaterEq => Value::Boolean(a >= b),
        InfixOperator::EqualTo => Value::Boolean(a == b),
        InfixOperator::NotEqualTo => Value::Boolean(a != b),
        _ => {
            return Err(
                RuntimeErrorKind::UnknownInfixOperator("INTEGER", op.symbol(), "INTEGER").into(),
            )
        }
    };
    Ok(result)
}

fn float_infix(op: InfixOperator, a: f64, b: f64) -> RuntimeResult<Value> {
    let result = match op.base_op() {
        InfixOperator::Add => Value::Float(a + b),
        InfixOperator::Subtract => Value::Float(a - b),
        InfixOperator::Multiply => Value::Float(a * b),
        InfixOperator::Divide => Value::Float(a / b),
        InfixOperator::LessThan => Value::Boolean(a < b),
        InfixOperator::GreaterThan => Value::Boolean(a > b),
        InfixOperator::LessEq => Value::Boolean(a <= b),
        InfixOperator::GreaterEq => Value::Boolean(a >= b),
        InfixOperator::EqualTo => Value::Boolean(a == b),
        InfixOperator::NotEqualTo => Value::Boolean(a != b),
        _ => {
            return Err(
                RuntimeErrorKind::UnknownInfixOperator("FLOAT", op.symbol(), "FLOAT").into(),
            )
        }
    };
    Ok(result)
}

/// Equality for non-numeric pairs: booleans and null compare by value,
/// everything else compares unequal.
fn identity_eq(lhs: &Value, rhs: &Value) -> bool {
    match (lhs, rhs) {
        (Value::Boolean(a), Value::Boolean(b)) => a == b,
        (Value::Null, Value::Null) => true,
        _ => false,
    }
}

/// FNV-1a, 64-bit. Stable across runs so string keys digest identically.
fn fnv1a_64(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;

    let mut hash = OFFSET_BASIS;
    for byte in bytes {
        hash ^= u64::from(*byte);
        hash = hash.wrapping_mul(PRIME);
    }
    hash
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Hash(a), Value::Hash(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::NativeFunc(a), Value::NativeFunc(b)) => a == b,
            _ => false,
        }
    }
}
