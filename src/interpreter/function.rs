use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeErrorKind, RuntimeResult};
use super::interpreter::Interpreter;
use super::object::Value;
use crate::clear_frontend::grammar::Stmt;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

pub struct ClearFnData {
    params: Vec<String>,
    body: Vec<Stmt>,
    closure: Environment,
}

/// A user function: parameter list, body, and the environment captured when
/// the literal was evaluated. `Rc`-shared so closures stay cheap to pass
/// around; equality is pointer identity.
#[derive(Clone)]
pub struct ClearFn(Rc<ClearFnData>);

impl ClearFn {
    pub fn new(params: Vec<String>, body: Vec<Stmt>, closure: Environment) -> Self {
        ClearFn(Rc::new(ClearFnData {
            params,
            body,
            closure,
        }))
    }

    pub fn arity(&self) -> usize {
        self.0.params.len()
    }

    pub fn params(&self) -> &[String] {
        &self.0.params
    }

    pub fn execute<S: Write>(
        &self,
        args: Vec<Value>,
        interpreter: &mut Interpreter<S>,
    ) -> RuntimeResult<Value> {
        if self.arity() != args.len() {
            return Err(RuntimeErrorKind::WrongArity(args.len(), self.arity()).into());
        }

        // The activation environment encloses the captured environment, not
        // the caller's.
        let env = Environment::with_enclosing(&self.0.closure);
        for (param, arg) in self.0.params.iter().zip(args.into_iter()) {
            env.define(param.clone(), arg);
        }

        let prev_env = interpreter.swap_env(env);
        let result = interpreter.eval_statements(&self.0.body);
        interpreter.swap_env(prev_env);

        match result {
            // The return sentinel unwraps exactly once, here.
            Err(InterpreterError::Return(value)) => Ok(value),
            Err(InterpreterError::Break) | Err(InterpreterError::Continue) => Ok(Value::Null),
            other => other,
        }
    }
}

impl fmt::Debug for ClearFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<fn({})>", self.0.params.join(", "))
    }
}

impl PartialEq<ClearFn> for ClearFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for ClearFn {}
