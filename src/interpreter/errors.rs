use super::object::Value;
use crate::clear_frontend::diagnostics::{Diagnostic, Stage};
use crate::clear_frontend::span::Position;

use thiserror::Error;

/// Everything that unwinds evaluation. `Return`, `Break` and `Continue`
/// share the runtime error's short-circuiting discipline but are absorbed
/// at the nearest call or loop boundary instead of surfacing to the user.
#[derive(Debug, Clone, PartialEq)]
pub enum InterpreterError {
    Return(Value),
    Break,
    Continue,
    Runtime(RuntimeError),
}

pub type RuntimeResult<T> = Result<T, InterpreterError>;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct RuntimeError {
    pub kind: RuntimeErrorKind,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuntimeErrorKind {
    #[error("type mismatch: {0} {1} {2}")]
    TypeMismatch(&'static str, &'static str, &'static str),
    #[error("unknown operator: {0} {1} {2}")]
    UnknownInfixOperator(&'static str, &'static str, &'static str),
    #[error("unknown operator: {0}{1}")]
    UnknownUnaryOperator(&'static str, &'static str),
    #[error("identifier not found: {0}")]
    IdentifierNotFound(String),
    #[error("not a function: {0}")]
    NotAFunction(&'static str),
    #[error("wrong number of arguments. got={0}, want={1}")]
    WrongArity(usize, usize),
    #[error("unusable as hash key: {0}")]
    UnusableHashKey(&'static str),
    #[error("index operator not supported: {0}")]
    IndexNotSupported(&'static str),
    #[error("module not found: {0}")]
    ModuleNotFound(String),
    #[error("function not found in module {0}: {1}")]
    FunctionNotInModule(String, String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("{0}")]
    General(String),
}

impl RuntimeError {
    pub fn new(kind: RuntimeErrorKind) -> Self {
        RuntimeError {
            kind,
            position: None,
        }
    }

    pub fn general(message: impl Into<String>) -> Self {
        RuntimeError::new(RuntimeErrorKind::General(message.into()))
    }

    /// Pins the error to a source position unless an inner node already did.
    pub fn at(mut self, position: Position) -> Self {
        self.position.get_or_insert(position);
        self
    }

    /// Renders the error as a user-facing diagnostic, quoting the source
    /// line it points at.
    pub fn to_diagnostic(&self, source_lines: &[String]) -> Diagnostic {
        let (line, column) = self
            .position
            .map(|p| (p.line, p.column))
            .unwrap_or((0, 0));
        let context = line
            .checked_sub(1)
            .and_then(|idx| source_lines.get(idx))
            .cloned()
            .unwrap_or_default();

        Diagnostic::error(Stage::Evaluator, self.to_string(), line, column, context)
    }
}

impl From<RuntimeError> for InterpreterError {
    fn from(error: RuntimeError) -> Self {
        InterpreterError::Runtime(error)
    }
}

impl From<RuntimeErrorKind> for InterpreterError {
    fn from(kind: RuntimeErrorKind) -> Self {
        InterpreterError::Runtime(RuntimeError::new(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let mismatch = RuntimeError::new(RuntimeErrorKind::TypeMismatch("INTEGER", "+", "BOOLEAN"));
        assert_eq!(mismatch.to_string(), "type mismatch: INTEGER + BOOLEAN");

        let unary = RuntimeError::new(RuntimeErrorKind::UnknownUnaryOperator("-", "BOOLEAN"));
        assert_eq!(unary.to_string(), "unknown operator: -BOOLEAN");

        let missing = RuntimeError::new(RuntimeErrorKind::IdentifierNotFound("foobar".to_owned()));
        assert_eq!(missing.to_string(), "identifier not found: foobar");
    }

    #[test]
    fn test_at_keeps_innermost_position() {
        let inner = Position::new(0, 2, 5);
        let outer = Position::new(0, 1, 1);
        let err = RuntimeError::new(RuntimeErrorKind::DivisionByZero)
            .at(inner)
            .at(outer);
        assert_eq!(err.position, Some(inner));
    }
}
