use super::builtins::global_builtins;
use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeError, RuntimeErrorKind, RuntimeResult};
use super::function::ClearFn;
use super::object::{HashPair, Value};
use crate::clear_frontend::grammar::{
    Expr, ExprKind, Identifier, ModuleImport, Program, Stmt, StmtKind,
};
use crate::clear_frontend::span::Position;

use std::collections::HashMap;
use std::io::{self, Write};

/// Tree-walking evaluator. Generic over its output sink so `io` builtins
/// can be captured under test.
pub struct Interpreter<S: Write> {
    env: Environment,
    globals: Environment,
    output: S,
}

impl Interpreter<io::Stdout> {
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<io::Stdout> {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl<S: Write> Interpreter<S> {
    pub fn with_output(output: S) -> Self {
        let env = Environment::new();
        for native in global_builtins() {
            let name = native.name().to_owned();
            env.define(name, Value::NativeFunc(native));
        }
        let globals = env.clone();

        Interpreter {
            env,
            globals,
            output,
        }
    }

    /// The global environment; the host registers module tables here before
    /// evaluation starts.
    pub fn globals(&self) -> &Environment {
        &self.globals
    }

    pub fn swap_env(&mut self, mut env: Environment) -> Environment {
        std::mem::swap(&mut self.env, &mut env);
        env
    }

    /// Runs imports first, then the top-level statements. The program's
    /// value is the last statement's value, or the payload of a top-level
    /// return.
    pub fn eval_program(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        for import in &program.modules {
            if let Err(error) = self.eval_module_import(import) {
                match error {
                    InterpreterError::Runtime(e) => return Err(e),
                    _ => unreachable!("imports produce no control flow"),
                }
            }
        }

        let mut result = Value::Null;
        for stmt in &program.statements {
            match self.eval_statement(stmt) {
                Ok(value) => result = value,
                Err(InterpreterError::Return(value)) => return Ok(value),
                // A break or continue with no enclosing loop degrades to null.
                Err(InterpreterError::Break) | Err(InterpreterError::Continue) => {
                    result = Value::Null
                }
                Err(InterpreterError::Runtime(e)) => return Err(e),
            }
        }
        Ok(result)
    }

    fn eval_module_import(&mut self, import: &ModuleImport) -> RuntimeResult<()> {
        let table = self.globals.get_module(&import.name.name).ok_or_else(|| {
            InterpreterError::from(
                RuntimeError::new(RuntimeErrorKind::ModuleNotFound(import.name.name.clone()))
                    .at(import.span.start),
            )
        })?;

        if import.import_all {
            for (name, func) in table {
                self.globals.define(name, Value::NativeFunc(func));
            }
        } else {
            for ident in &import.imports {
                match table.get(&ident.name) {
                    Some(func) => self
                        .globals
                        .define(ident.name.clone(), Value::NativeFunc(func.clone())),
                    None => {
                        return Err(RuntimeError::new(RuntimeErrorKind::FunctionNotInModule(
                            import.name.name.clone(),
                            ident.name.clone(),
                        ))
                        .at(ident.span.start)
                        .into())
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluates a statement list to the last statement's value. Any
    /// unwinding result passes through untouched so it can reach the
    /// enclosing function or loop.
    pub fn eval_statements(&mut self, stmts: &[Stmt]) -> RuntimeResult<Value> {
        let mut result = Value::Null;
        for stmt in stmts {
            result = self.eval_statement(stmt)?;
        }
        Ok(result)
    }

    pub fn eval_statement(&mut self, stmt: &Stmt) -> RuntimeResult<Value> {
        match &stmt.stmt {
            StmtKind::Expression(expr) => self.eval_expression(expr),
            StmtKind::Let(name, value) => {
                let value = match value {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Value::Null,
                };
                self.env.define(name.name.clone(), value);
                Ok(Value::Null)
            }
            StmtKind::Assign(name, value) => {
                if !self.env.contains(&name.name) {
                    return Err(RuntimeError::new(RuntimeErrorKind::IdentifierNotFound(
                        name.name.clone(),
                    ))
                    .at(name.span.start)
                    .into());
                }
                let value = self.eval_expression(value)?;
                self.env.define(name.name.clone(), value.clone());
                Ok(value)
            }
            StmtKind::Return(expr) => {
                let value = match expr {
                    Some(expr) => self.eval_expression(expr)?,
                    None => Value::Null,
                };
                Err(InterpreterError::Return(value))
            }
            StmtKind::Block(stmts) => self.eval_statements(stmts),
            StmtKind::While(condition, body) => self.eval_while(condition, body),
            StmtKind::For(init, condition, post, body) => {
                self.eval_for(init, condition, post, body)
            }
            StmtKind::Break => Err(InterpreterError::Break),
            StmtKind::Continue => Err(InterpreterError::Continue),
            StmtKind::Function(name, params, body) => {
                let func = self.make_function(params, body);
                self.env.define(name.name.clone(), func);
                Ok(Value::Null)
            }
            StmtKind::Module(import) => {
                self.eval_module_import(import)?;
                Ok(Value::Null)
            }
        }
    }

    fn eval_while(&mut self, condition: &Expr, body: &[Stmt]) -> RuntimeResult<Value> {
        while self.eval_expression(condition)?.is_truthy() {
            match self.eval_statements(body) {
                Ok(_) => {}
                Err(InterpreterError::Break) => break,
                Err(InterpreterError::Continue) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Value::Null)
    }

    fn eval_for(
        &mut self,
        init: &Stmt,
        condition: &Expr,
        post: &Expr,
        body: &[Stmt],
    ) -> RuntimeResult<Value> {
        self.eval_statement(init)?;

        while self.eval_expression(condition)?.is_truthy() {
            match self.eval_statements(body) {
                // Continue still runs the post expression.
                Ok(_) | Err(InterpreterError::Continue) => {}
                Err(InterpreterError::Break) => break,
                Err(e) => return Err(e),
            }
            self.eval_expression(post)?;
        }
        Ok(Value::Null)
    }

    pub fn eval_expression(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        self.eval_expr_kind(expr)
            .map_err(|e| stamp(e, expr.span.start))
    }

    fn eval_expr_kind(&mut self, expr: &Expr) -> RuntimeResult<Value> {
        match &expr.expr {
            ExprKind::Variable(ident) => self.eval_identifier(ident),
            ExprKind::Integer(n) => Ok(Value::Integer(*n)),
            ExprKind::Float(n) => Ok(Value::Float(*n)),
            ExprKind::Boolean(b) => Ok(Value::Boolean(*b)),
            ExprKind::Str(s) => Ok(Value::Str(s.clone())),
            ExprKind::Prefix(op, operand) => {
                let value = self.eval_expression(operand)?;
                Value::apply_prefix_op(*op, value)
            }
            ExprKind::Infix(op, lhs_expr, rhs_expr) => {
                let lhs = self.eval_expression(lhs_expr)?;
                let rhs = self.eval_expression(rhs_expr)?;
                let result = Value::apply_infix_op(*op, lhs, rhs)?;

                // Compound operators write back under the left lexeme.
                if op.is_compound() {
                    if let ExprKind::Variable(ident) = &lhs_expr.expr {
                        self.env.define(ident.name.clone(), result.clone());
                    }
                }
                Ok(result)
            }
            ExprKind::Postfix(op, operand) => {
                let value = self.eval_expression(operand)?;
                let result = Value::apply_postfix_op(*op, value)?;
                if let ExprKind::Variable(ident) = &operand.expr {
                    self.env.define(ident.name.clone(), result.clone());
                }
                Ok(result)
            }
            ExprKind::If(condition, consequence, alternative) => {
                if self.eval_expression(condition)?.is_truthy() {
                    self.eval_statements(consequence)
                } else if let Some(alternative) = alternative {
                    self.eval_statements(alternative)
                } else {
                    Ok(Value::Null)
                }
            }
            ExprKind::FunctionLiteral(params, body) => Ok(self.make_function(params, body)),
            ExprKind::Call(callee, args) => self.eval_call(callee, args),
            ExprKind::Array(elements) => {
                let values = self.eval_expressions(elements)?;
                Ok(Value::array(values))
            }
            ExprKind::HashLiteral(pairs) => self.eval_hash_literal(pairs),
            ExprKind::Index(collection, key) => self.eval_index(collection, key),
        }
    }

    /// Captures the current environment by reference.
    fn make_function(&self, params: &[Identifier], body: &[Stmt]) -> Value {
        let names = params.iter().map(|p| p.name.clone()).collect();
        Value::Function(ClearFn::new(names, body.to_vec(), self.env.clone()))
    }

    /// Plain environment lookup, falling back to `module.function`
    /// resolution against the registry for dotted names.
    fn eval_identifier(&mut self, ident: &Identifier) -> RuntimeResult<Value> {
        if let Some(value) = self.env.get(&ident.name) {
            return Ok(value);
        }

        let pos = ident.span.start;
        let parts: Vec<&str> = ident.name.split('.').collect();
        if parts.len() == 2 {
            let (module_name, func_name) = (parts[0], parts[1]);
            return match self.env.get_module(module_name) {
                Some(table) => match table.get(func_name) {
                    Some(func) => Ok(Value::NativeFunc(func.clone())),
                    None => Err(RuntimeError::new(RuntimeErrorKind::FunctionNotInModule(
                        module_name.to_owned(),
                        func_name.to_owned(),
                    ))
                    .at(pos)
                    .into()),
                },
                None => Err(
                    RuntimeError::new(RuntimeErrorKind::ModuleNotFound(module_name.to_owned()))
                        .at(pos)
                        .into(),
                ),
            };
        }

        Err(
            RuntimeError::new(RuntimeErrorKind::IdentifierNotFound(ident.name.clone()))
                .at(pos)
                .into(),
        )
    }

    fn eval_call(&mut self, callee: &Expr, args: &[Expr]) -> RuntimeResult<Value> {
        let callee_value = self.eval_expression(callee)?;
        let args = self.eval_expressions(args)?;

        match callee_value {
            Value::Function(func) => func.execute(args, self),
            Value::NativeFunc(func) => func.execute(args, &mut self.output),
            other => Err(RuntimeErrorKind::NotAFunction(other.type_name()).into()),
        }
    }

    /// Left-to-right, stopping at the first error.
    fn eval_expressions(&mut self, exprs: &[Expr]) -> RuntimeResult<Vec<Value>> {
        exprs.iter().map(|e| self.eval_expression(e)).collect()
    }

    fn eval_hash_literal(&mut self, pairs: &[(Expr, Expr)]) -> RuntimeResult<Value> {
        let mut map = HashMap::new();
        for (key_expr, value_expr) in pairs {
            let key = self.eval_expression(key_expr)?;
            let hashed = key.hash_key().ok_or_else(|| {
                InterpreterError::from(
                    RuntimeError::new(RuntimeErrorKind::UnusableHashKey(key.type_name()))
                        .at(key_expr.span.start),
                )
            })?;
            let value = self.eval_expression(value_expr)?;
            // Duplicate keys: last write wins.
            map.insert(hashed, HashPair { key, value });
        }
        Ok(Value::hash(map))
    }

    fn eval_index(&mut self, collection: &Expr, key: &Expr) -> RuntimeResult<Value> {
        let collection_value = self.eval_expression(collection)?;
        let key_value = self.eval_expression(key)?;

        match (&collection_value, &key_value) {
            (Value::Array(elements), Value::Integer(idx)) => {
                let elements = elements.borrow();
                if *idx < 0 || *idx as usize >= elements.len() {
                    Ok(Value::Null)
                } else {
                    Ok(elements[*idx as usize].clone())
                }
            }
            (Value::Hash(pairs), _) => {
                let hashed = key_value.hash_key().ok_or_else(|| {
                    InterpreterError::from(
                        RuntimeError::new(RuntimeErrorKind::UnusableHashKey(
                            key_value.type_name(),
                        ))
                        .at(key.span.start),
                    )
                })?;
                let pairs = pairs.borrow();
                Ok(pairs
                    .get(&hashed)
                    .map(|pair| pair.value.clone())
                    .unwrap_or(Value::Null))
            }
            _ => Err(RuntimeErrorKind::IndexNotSupported(collection_value.type_name()).into()),
        }
    }
}

fn stamp(error: InterpreterError, position: Position) -> InterpreterError {
    match error {
        InterpreterError::Runtime(e) => InterpreterError::Runtime(e.at(position)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clear_frontend::{Lexer, Parser};
    use crate::interpreter::modules;

    fn eval_source(source: &str) -> Result<Value, RuntimeError> {
        let (program, diagnostics) = Parser::new(Lexer::new(source)).parse_program();
        let errors: Vec<_> = diagnostics.iter().filter(|d| !d.is_warning).collect();
        assert!(errors.is_empty(), "parse errors: {:?}", errors);

        let mut output = Vec::new();
        let mut interpreter = Interpreter::with_output(io::Cursor::new(&mut output));
        modules::register(interpreter.globals());
        interpreter.eval_program(&program)
    }

    fn assert_inspect(source: &str, expected: &str) {
        match eval_source(source) {
            Ok(value) => assert_eq!(value.inspect(), expected, "source: {}", source),
            Err(e) => panic!("runtime error for {}: {}", source, e),
        }
    }

    fn assert_error(source: &str, expected: &str) {
        match eval_source(source) {
            Err(e) => assert_eq!(e.to_string(), expected, "source: {}", source),
            Ok(v) => panic!("expected error for {}, got {}", source, v.inspect()),
        }
    }

    #[test]
    fn test_arithmetic() {
        assert_inspect("let x = 5; let y = 10; x + y;", "15");
        assert_inspect("2 + 3 * 4;", "14");
        assert_inspect("(2 + 3) * 4;", "20");
        assert_inspect("7 / 2;", "3");
        assert_inspect("-7 / 2;", "-3");
        assert_inspect("1.5 + 2;", "3.5");
        assert_inspect("10 / 4.0;", "2.5");
    }

    #[test]
    fn test_comparisons_and_prefix() {
        assert_inspect("1 < 2;", "true");
        assert_inspect("2 <= 2;", "true");
        assert_inspect("3 > 4;", "false");
        assert_inspect("1 == 1;", "true");
        assert_inspect("1 != 1;", "false");
        assert_inspect("1 == 1.0;", "true");
        assert_inspect("!true;", "false");
        assert_inspect("!0;", "false");
        assert_inspect("let x; !x;", "true");
    }

    #[test]
    fn test_function_application() {
        assert_inspect("let add = fn(a,b){ a + b }; add(2,3);", "5");
        assert_inspect("fn add(a, b) { return a + b; } add(2, 3);", "5");
        assert_inspect("fn(x){ x }(42);", "42");
    }

    #[test]
    fn test_closures() {
        assert_inspect(
            "let make = fn(x){ fn(y){ x + y } }; let add3 = make(3); add3(4);",
            "7",
        );
        // Capture is by environment, not by copy of the caller's scope.
        assert_inspect(
            "let n = 1; let f = fn(){ n }; let n = 2; f();",
            "2",
        );
    }

    #[test]
    fn test_if_expression() {
        assert_inspect("if (1 < 2) { 10 } else { 20 };", "10");
        assert_inspect("if (1 > 2) { 10 } else { 20 };", "20");
        assert_inspect("if (false) { 10 };", "null");
        assert_inspect("if (1) { 10 };", "10");
    }

    #[test]
    fn test_while_loop() {
        assert_inspect("let i = 0; while (i < 3) { i = i + 1 }; i;", "3");
    }

    #[test]
    fn test_for_loop() {
        assert_inspect(
            "let total = 0; for (let i = 0; i < 5; i++) { total = total + i; } total;",
            "10",
        );
    }

    #[test]
    fn test_break_and_continue() {
        assert_inspect(
            "let i = 0; while (true) { i = i + 1; if (i == 3) { break; } }; i;",
            "3",
        );
        assert_inspect(
            "let total = 0; for (let i = 0; i < 5; i++) { \
               if (i == 2) { continue; } total = total + i; } total;",
            "8",
        );
    }

    #[test]
    fn test_arrays() {
        assert_inspect("let a = [1,2,3]; a[1];", "2");
        assert_inspect("[1, 2, 3][3];", "null");
        assert_inspect("[1, 2, 3][-1];", "null");
        assert_inspect("len([1, 2, 3]);", "3");
        assert_inspect("first([5, 6]);", "5");
        assert_inspect("last([5, 6]);", "6");
        assert_inspect("rest([5, 6, 7]);", "[6, 7]");
        assert_inspect("push([1], 2);", "[1, 2]");
    }

    #[test]
    fn test_hashes() {
        assert_inspect("let h = {\"k\": 1, 2: \"v\"}; h[\"k\"] + 1;", "2");
        assert_inspect("let h = {1: \"a\"}; h[2];", "null");
        assert_inspect("let h = {true: 1}; h[true];", "1");
        assert_inspect("let h = {\"a\": 1, \"a\": 2}; h[\"a\"];", "2");
    }

    #[test]
    fn test_strings() {
        assert_inspect("\"foo\" + \"bar\";", "foobar");
        assert_inspect("len(\"hello\");", "5");
    }

    #[test]
    fn test_compound_assignment() {
        assert_inspect("let x = 5; x += 3; x;", "8");
        assert_inspect("let x = 10; x /= 2; x;", "5");
        assert_inspect("let x = 2.5; x *= 2; x;", "5.0");
    }

    #[test]
    fn test_postfix_stores_back() {
        assert_inspect("let i = 1; i++;", "2");
        assert_inspect("let i = 1; i++; i;", "2");
        assert_inspect("let f = 1.5; f--; f;", "0.5");
    }

    #[test]
    fn test_let_without_initializer_binds_null() {
        assert_inspect("let x; x;", "null");
    }

    #[test]
    fn test_return_propagation() {
        assert_inspect("fn f(){ return 1; 2 } f();", "1");
        assert_inspect(
            "fn f(){ if (true) { if (true) { return 9; } } return 1; } f();",
            "9",
        );
        // Top-level return unwraps to the program result.
        assert_inspect("return 7; 8;", "7");
    }

    #[test]
    fn test_error_propagation() {
        assert_error("5 + true;", "type mismatch: INTEGER + BOOLEAN");
        assert_error("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN");
        assert_error("-true;", "unknown operator: -BOOLEAN");
        assert_error("\"a\" - \"b\";", "unknown operator: STRING - STRING");
        assert_error("foobar;", "identifier not found: foobar");
        assert_error("5(1);", "not a function: INTEGER");
        assert_error("let h = {[1]: 2};", "unusable as hash key: ARRAY");
        assert_error("5[0];", "index operator not supported: INTEGER");
        assert_error("1 / 0;", "division by zero");
        assert_error("let f = fn(a){ a }; f(1, 2);", "wrong number of arguments. got=2, want=1");
        // An error inside an argument list surfaces as that single error.
        assert_error("len(5 + true);", "type mismatch: INTEGER + BOOLEAN");
    }

    #[test]
    fn test_error_positions() {
        let err = eval_source("let x = 1;\nx + true;").unwrap_err();
        let position = err.position.expect("position");
        assert_eq!(position.line, 2);
    }

    #[test]
    fn test_assignment_requires_existing_binding() {
        assert_error("y = 5;", "identifier not found: y");
    }

    #[test]
    fn test_module_imports() {
        assert_inspect("mod strings: *; upper(\"abc\");", "ABC");
        assert_inspect("mod strings: [lower]; lower(\"ABC\");", "abc");
        assert_inspect("strings.upper(\"abc\");", "ABC");
        assert_inspect("mod math: *; abs(0 - 5);", "5");
    }

    #[test]
    fn test_module_errors() {
        assert_error("mod nope: *;", "module not found: nope");
        assert_error(
            "mod strings: [nope];",
            "function not found in module strings: nope",
        );
        assert_error("nope.f();", "module not found: nope");
        assert_error(
            "strings.nope();",
            "function not found in module strings: nope",
        );
    }

    #[test]
    fn test_io_output_capture() {
        let source = "mod io: *; println(\"hi\", 1 + 1);";
        let (program, _) = Parser::new(Lexer::new(source)).parse_program();

        let mut output = Vec::new();
        let mut interpreter = Interpreter::with_output(io::Cursor::new(&mut output));
        modules::register(interpreter.globals());
        interpreter.eval_program(&program).unwrap();
        drop(interpreter);

        assert_eq!(String::from_utf8(output).unwrap(), "hi2\n");
    }

    #[test]
    fn test_arrays_module_mutates_in_place() {
        assert_inspect(
            "mod arrays: *; let a = [1]; arrays.push(a, 2, 3); a;",
            "[1, 2, 3]",
        );
        assert_inspect("mod arrays: *; let a = [1, 2]; pop(a); a;", "[1]");
    }
}
