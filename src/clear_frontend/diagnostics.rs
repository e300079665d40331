use std::fmt;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Which pipeline stage produced a diagnostic.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Stage {
    Lexer,
    Parser,
    Evaluator,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Lexer => "Lexer",
            Stage::Parser => "Parser",
            Stage::Evaluator => "Evaluator",
        };
        write!(f, "{}", name)
    }
}

/// A user-facing error or warning, carrying enough position info to quote
/// the offending source line back at the user.
#[derive(Debug, PartialEq, Clone)]
pub struct Diagnostic {
    pub stage: Stage,
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub source_line: String,
    pub is_warning: bool,
}

impl Diagnostic {
    pub fn error(
        stage: Stage,
        message: impl Into<String>,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
    ) -> Self {
        Diagnostic {
            stage,
            message: message.into(),
            line,
            column,
            source_line: source_line.into(),
            is_warning: false,
        }
    }

    pub fn warning(
        stage: Stage,
        message: impl Into<String>,
        line: usize,
        column: usize,
        source_line: impl Into<String>,
    ) -> Self {
        Diagnostic {
            stage,
            message: message.into(),
            line,
            column,
            source_line: source_line.into(),
            is_warning: true,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let (color, severity) = if self.is_warning {
            (YELLOW, "Warning")
        } else {
            (RED, "Error")
        };
        write!(
            f,
            "{}{}::{} [line: {}, col: {}] ---> {}\n\tcontext: '{}'{}",
            color, self.stage, severity, self.line, self.column, self.message, self.source_line, RESET
        )
    }
}

/// True when any diagnostic in the batch is an error rather than a warning.
pub fn has_errors(diagnostics: &[Diagnostic]) -> bool {
    diagnostics.iter().any(|d| !d.is_warning)
}
