use super::diagnostics::{Diagnostic, Stage};
use super::grammar::{Expr, ExprKind, Identifier, ModuleImport, Program, Stmt, StmtKind};
use super::lexer::Lexer;
use super::parser_utils::{
    infix_operator, postfix_operator, precedence_of, prefix_operator, Precedence,
};
use super::span::Span;
use super::token::{SpannedToken, Token};

use log::debug;

/// Pratt-style recursive-descent parser with two tokens of lookahead.
///
/// Failed rules queue a diagnostic and yield no node; the program loop then
/// advances one token and keeps going, so independent errors are all
/// reported without cascading.
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cur: SpannedToken,
    peek: SpannedToken,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Parser<'src> {
    pub fn new(lexer: Lexer<'src>) -> Self {
        let placeholder = SpannedToken {
            token: Token::EndOfFile,
            span: Span::empty(),
        };

        let mut parser = Parser {
            lexer,
            cur: placeholder.clone(),
            peek: placeholder,
            diagnostics: vec![],
        };

        // Prime cur and peek.
        parser.next_token();
        parser.next_token();
        parser
    }

    /// Parses the whole source, returning the program together with every
    /// lexer and parser diagnostic collected along the way.
    pub fn parse_program(mut self) -> (Program, Vec<Diagnostic>) {
        let mut statements = vec![];

        while self.cur.token != Token::EndOfFile {
            if let Some(stmt) = self.parse_statement() {
                debug!("parsed statement at {}", stmt.span.start);
                statements.push(stmt);
            }
            self.next_token();
        }

        // Hoist module imports so the evaluator can bring names in first.
        let mut modules = vec![];
        let mut remaining = vec![];
        for stmt in statements {
            match stmt.stmt {
                StmtKind::Module(import) => modules.push(import),
                _ => remaining.push(stmt),
            }
        }

        let is_empty = remaining.is_empty();
        let program = Program {
            statements: remaining,
            modules,
            is_empty,
        };

        let mut diagnostics = self.lexer.take_diagnostics();
        diagnostics.append(&mut self.diagnostics);
        (program, diagnostics)
    }

    fn next_token(&mut self) {
        std::mem::swap(&mut self.cur, &mut self.peek);
        self.peek = self.lexer.next_token();
    }

    fn cur_is(&self, token: &Token) -> bool {
        self.cur.token.same_kind(token)
    }

    fn peek_is(&self, token: &Token) -> bool {
        self.peek.token.same_kind(token)
    }

    /// Advances when peek matches, else queues the mismatch diagnostic.
    fn expect_peek(&mut self, expected: &Token) -> bool {
        if self.peek_is(expected) {
            self.next_token();
            true
        } else {
            self.peek_error(expected);
            false
        }
    }

    fn peek_error(&mut self, expected: &Token) {
        let message = format!(
            "expected next token to be {}, got {} instead",
            expected.kind_str(),
            self.peek.token.kind_str()
        );
        self.report_at(message, self.peek.span);
    }

    fn report_at(&mut self, message: String, span: Span) {
        let context = self.lexer.source_line(span.start.line).to_owned();
        self.diagnostics.push(Diagnostic::error(
            Stage::Parser,
            message,
            span.start.line,
            span.start.column,
            context,
        ));
    }

    fn warn_at(&mut self, message: String, span: Span) {
        let context = self.lexer.source_line(span.start.line).to_owned();
        self.diagnostics.push(Diagnostic::warning(
            Stage::Parser,
            message,
            span.start.line,
            span.start.column,
            context,
        ));
    }

    fn no_prefix_parse_error(&mut self) {
        let token = self.cur.token.clone();
        let span = self.cur.span;
        match token {
            // Already reported by the lexer.
            Token::Illegal(_) => {}
            Token::Let | Token::Return | Token::Mod => {
                self.report_at(
                    format!("'{}' statement not allowed as expression", token.kind_str()),
                    span,
                );
            }
            _ => {
                self.report_at(
                    format!("no prefix parse function for {} found", token.kind_str()),
                    span,
                );
            }
        }
    }

    /// Skips an optional statement-terminating semicolon.
    fn skip_optional_semicolon(&mut self) {
        if self.peek_is(&Token::Semicolon) {
            self.next_token();
        }
    }

    // ------------------------------------------------------------------
    // Statements. Every rule leaves `cur` on the final token of the
    // construct; the caller advances past it.
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Option<Stmt> {
        let start = self.cur.span;

        let kind = match &self.cur.token {
            Token::Mod => StmtKind::Module(self.parse_module_import()?),
            Token::Let => self.parse_let_statement()?,
            Token::Return => self.parse_return_statement()?,
            Token::While => self.parse_while_statement()?,
            Token::For => self.parse_for_statement()?,
            Token::Break => {
                self.skip_optional_semicolon();
                StmtKind::Break
            }
            Token::Continue => {
                self.skip_optional_semicolon();
                StmtKind::Continue
            }
            Token::Function if self.peek_is(&Token::Identifier(String::new())) => {
                self.parse_function_statement()?
            }
            Token::LeftBrace => StmtKind::Block(self.parse_block_statements()?),
            Token::Identifier(_) if self.peek_is(&Token::Assign) => self.parse_assign_statement()?,
            _ => self.parse_expression_statement()?,
        };

        Some(Stmt::new(kind, start.extend(self.cur.span)))
    }

    fn parse_module_import(&mut self) -> Option<ModuleImport> {
        let start = self.cur.span;

        if !self.expect_peek(&Token::Identifier(String::new())) {
            return None;
        }
        let name = self.cur_identifier()?;

        if !self.expect_peek(&Token::Colon) {
            return None;
        }

        if self.peek_is(&Token::Asterisk) {
            self.next_token();
            self.skip_optional_semicolon();
            return Some(ModuleImport {
                name,
                import_all: true,
                imports: vec![],
                span: start.extend(self.cur.span),
            });
        }

        if !self.expect_peek(&Token::LeftBracket) {
            return None;
        }

        let mut imports = vec![];
        if self.peek_is(&Token::RightBracket) {
            self.warn_at(
                format!("empty import list for module '{}'", name.name),
                start,
            );
        }

        while !self.peek_is(&Token::RightBracket) {
            if !self.expect_peek(&Token::Identifier(String::new())) {
                return None;
            }
            imports.push(self.cur_identifier()?);

            if self.peek_is(&Token::Comma) {
                self.next_token();
            }
        }

        if !self.expect_peek(&Token::RightBracket) {
            return None;
        }
        self.skip_optional_semicolon();

        Some(ModuleImport {
            name,
            import_all: false,
            imports,
            span: start.extend(self.cur.span),
        })
    }

    fn parse_let_statement(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(&Token::Identifier(String::new())) {
            return None;
        }
        let name = self.cur_identifier()?;

        // A bare `let x;` binds null.
        let value = if self.peek_is(&Token::Assign) {
            self.next_token();
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        } else {
            None
        };
        self.skip_optional_semicolon();

        Some(StmtKind::Let(name, value))
    }

    fn parse_assign_statement(&mut self) -> Option<StmtKind> {
        let name = self.cur_identifier()?;

        // Step over the name and the `=`.
        self.next_token();
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();

        Some(StmtKind::Assign(name, value))
    }

    fn parse_return_statement(&mut self) -> Option<StmtKind> {
        let value = if self.peek_is(&Token::Semicolon)
            || self.peek_is(&Token::RightBrace)
            || self.peek_is(&Token::EndOfFile)
        {
            None
        } else {
            self.next_token();
            Some(self.parse_expression(Precedence::Lowest)?)
        };
        self.skip_optional_semicolon();

        Some(StmtKind::Return(value))
    }

    fn parse_while_statement(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statements()?;

        Some(StmtKind::While(condition, body))
    }

    fn parse_for_statement(&mut self) -> Option<StmtKind> {
        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }

        if !self.expect_peek(&Token::Let) {
            return None;
        }
        let init_start = self.cur.span;
        let init_kind = self.parse_let_statement()?;
        let init = Stmt::new(init_kind, init_start.extend(self.cur.span));

        // The let rule consumed the separating semicolon.
        if !self.cur_is(&Token::Semicolon) {
            self.peek_error(&Token::Semicolon);
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::Semicolon) {
            return None;
        }
        self.next_token();

        let post = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statements()?;

        Some(StmtKind::For(Box::new(init), condition, post, body))
    }

    fn parse_function_statement(&mut self) -> Option<StmtKind> {
        self.next_token();
        let name = self.cur_identifier()?;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statements()?;

        Some(StmtKind::Function(name, params, body))
    }

    fn parse_expression_statement(&mut self) -> Option<StmtKind> {
        let expr = self.parse_expression(Precedence::Lowest)?;
        self.skip_optional_semicolon();
        Some(StmtKind::Expression(expr))
    }

    /// Parses the statements of a `{ ... }` block. `cur` must be on the
    /// opening brace; ends with `cur` on the closing brace.
    fn parse_block_statements(&mut self) -> Option<Vec<Stmt>> {
        let open = self.cur.span;
        let mut statements = vec![];

        self.next_token();
        while !self.cur_is(&Token::RightBrace) {
            if self.cur_is(&Token::EndOfFile) {
                self.report_at("unclosed block, expected '}'".to_owned(), open);
                return None;
            }
            if let Some(stmt) = self.parse_statement() {
                statements.push(stmt);
            }
            self.next_token();
        }

        Some(statements)
    }

    // ------------------------------------------------------------------
    // Expressions.
    // ------------------------------------------------------------------

    fn parse_expression(&mut self, min_precedence: Precedence) -> Option<Expr> {
        let mut left = self.parse_prefix()?;

        // Postfix binds tighter than any infix operator.
        while let Some(op) = postfix_operator(&self.peek.token) {
            self.next_token();
            let span = left.span.extend(self.cur.span);
            left = Expr::new(ExprKind::Postfix(op, Box::new(left)), span);
        }

        while !self.peek_is(&Token::Semicolon) && min_precedence < precedence_of(&self.peek.token) {
            left = match &self.peek.token {
                Token::LeftParen => {
                    self.next_token();
                    self.parse_call_expression(left)?
                }
                Token::LeftBracket => {
                    self.next_token();
                    self.parse_index_expression(left)?
                }
                token if infix_operator(token).is_some() => {
                    self.next_token();
                    self.parse_infix_expression(left)?
                }
                _ => break,
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expr> {
        let start = self.cur.span;

        let kind = match &self.cur.token {
            Token::Identifier(_) => return self.parse_identifier_expression(),
            Token::Int(value) => ExprKind::Integer(*value),
            Token::Float(value) => ExprKind::Float(*value),
            Token::Str(value) => ExprKind::Str(value.clone()),
            Token::True => ExprKind::Boolean(true),
            Token::False => ExprKind::Boolean(false),
            Token::Bang | Token::Minus => {
                let op = prefix_operator(&self.cur.token)?;
                self.next_token();
                let operand = self.parse_expression(Precedence::Prefix)?;
                ExprKind::Prefix(op, Box::new(operand))
            }
            Token::LeftParen => return self.parse_grouped_expression(),
            Token::If => return self.parse_if_expression(),
            Token::Function => return self.parse_function_literal(),
            Token::LeftBracket => {
                let elements = self.parse_expression_list(&Token::RightBracket)?;
                ExprKind::Array(elements)
            }
            Token::LeftBrace => return self.parse_hash_literal(),
            _ => {
                self.no_prefix_parse_error();
                return None;
            }
        };

        Some(Expr::new(kind, start.extend(self.cur.span)))
    }

    /// An identifier, or a `module.name` access folded into one dotted name
    /// resolved at evaluation time.
    fn parse_identifier_expression(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        let ident = self.cur_identifier()?;

        if !self.peek_is(&Token::Dot) {
            return Some(Expr::new(ExprKind::Variable(ident), start));
        }

        self.next_token();
        if !self.expect_peek(&Token::Identifier(String::new())) {
            return None;
        }
        let member = self.cur_identifier()?;

        let span = start.extend(self.cur.span);
        let qualified = Identifier::new(format!("{}.{}", ident.name, member.name), span);
        Some(Expr::new(ExprKind::Variable(qualified), span))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expr> {
        self.next_token();
        let expr = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RightParen) {
            return None;
        }
        Some(expr)
    }

    fn parse_if_expression(&mut self) -> Option<Expr> {
        let start = self.cur.span;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }
        self.next_token();
        let condition = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }
        let consequence = self.parse_block_statements()?;

        let alternative = if self.peek_is(&Token::Else) {
            self.next_token();
            if !self.expect_peek(&Token::LeftBrace) {
                return None;
            }
            Some(self.parse_block_statements()?)
        } else {
            None
        };

        Some(Expr::new(
            ExprKind::If(Box::new(condition), consequence, alternative),
            start.extend(self.cur.span),
        ))
    }

    fn parse_function_literal(&mut self) -> Option<Expr> {
        let start = self.cur.span;

        if !self.expect_peek(&Token::LeftParen) {
            return None;
        }
        let params = self.parse_function_parameters()?;

        if !self.expect_peek(&Token::LeftBrace) {
            return None;
        }
        let body = self.parse_block_statements()?;

        Some(Expr::new(
            ExprKind::FunctionLiteral(params, body),
            start.extend(self.cur.span),
        ))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<Identifier>> {
        let mut params = vec![];

        if self.peek_is(&Token::RightParen) {
            self.next_token();
            return Some(params);
        }

        self.next_token();
        params.push(self.cur_identifier()?);

        while self.peek_is(&Token::Comma) {
            self.next_token();
            self.next_token();
            params.push(self.cur_identifier()?);
        }

        if !self.expect_peek(&Token::RightParen) {
            return None;
        }

        Some(params)
    }

    fn parse_call_expression(&mut self, callee: Expr) -> Option<Expr> {
        let args = self.parse_expression_list(&Token::RightParen)?;
        let span = callee.span.extend(self.cur.span);
        Some(Expr::new(ExprKind::Call(Box::new(callee), args), span))
    }

    fn parse_index_expression(&mut self, collection: Expr) -> Option<Expr> {
        self.next_token();
        let key = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(&Token::RightBracket) {
            return None;
        }

        let span = collection.span.extend(self.cur.span);
        Some(Expr::new(
            ExprKind::Index(Box::new(collection), Box::new(key)),
            span,
        ))
    }

    fn parse_hash_literal(&mut self) -> Option<Expr> {
        let start = self.cur.span;
        let mut pairs = vec![];

        while !self.peek_is(&Token::RightBrace) {
            self.next_token();
            let key = self.parse_expression(Precedence::Lowest)?;

            if !self.expect_peek(&Token::Colon) {
                return None;
            }
            self.next_token();
            let value = self.parse_expression(Precedence::Lowest)?;
            pairs.push((key, value));

            if !self.peek_is(&Token::RightBrace) && !self.expect_peek(&Token::Comma) {
                return None;
            }
        }

        if !self.expect_peek(&Token::RightBrace) {
            return None;
        }

        Some(Expr::new(
            ExprKind::HashLiteral(pairs),
            start.extend(self.cur.span),
        ))
    }

    fn parse_infix_expression(&mut self, left: Expr) -> Option<Expr> {
        let op = infix_operator(&self.cur.token)?;
        let precedence = precedence_of(&self.cur.token);

        self.next_token();
        let right = self.parse_expression(precedence)?;

        let span = left.span.extend(right.span);
        Some(Expr::new(
            ExprKind::Infix(op, Box::new(left), Box::new(right)),
            span,
        ))
    }

    fn parse_expression_list(&mut self, end: &Token) -> Option<Vec<Expr>> {
        let mut list = vec![];

        if self.peek_is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_is(&Token::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if !self.expect_peek(end) {
            return None;
        }

        Some(list)
    }

    /// The current token as an identifier node.
    fn cur_identifier(&mut self) -> Option<Identifier> {
        match &self.cur.token {
            Token::Identifier(name) => Some(Identifier::new(name.clone(), self.cur.span)),
            other => {
                let message = format!(
                    "expected next token to be IDENT, got {} instead",
                    other.kind_str()
                );
                let span = self.cur.span;
                self.report_at(message, span);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> (Program, Vec<Diagnostic>) {
        Parser::new(Lexer::new(source)).parse_program()
    }

    fn parse_clean(source: &str) -> Program {
        let (program, diagnostics) = parse(source);
        assert!(diagnostics.is_empty(), "unexpected: {:?}", diagnostics);
        program
    }

    fn first_expr(program: &Program) -> &Expr {
        match &program.statements[0].stmt {
            StmtKind::Expression(expr) => expr,
            other => panic!("expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_precedence() {
        let cases = vec![
            ("a + b * c", "(a + (b * c))"),
            ("-a * b", "((-a) * b)"),
            ("!true == false", "((!true) == false)"),
            ("a + b == c - d", "((a + b) == (c - d))"),
            ("a < b == c > d", "((a < b) == (c > d))"),
            ("a <= b", "(a <= b)"),
            ("(a + b) * c", "((a + b) * c)"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            ("arr[1] + 2", "((arr[1]) + 2)"),
            ("i++ + 1", "((i++) + 1)"),
            ("a + i--", "(a + (i--))"),
            ("x += 1 * 2", "(x += (1 * 2))"),
        ];

        for (source, expected) in cases {
            let program = parse_clean(source);
            assert_eq!(first_expr(&program).ast_string(), expected, "source: {}", source);
        }
    }

    #[test]
    fn test_let_statement() {
        let program = parse_clean("let x = 5;");
        match &program.statements[0].stmt {
            StmtKind::Let(name, Some(value)) => {
                assert_eq!(name.name, "x");
                assert_eq!(value.ast_string(), "5");
            }
            other => panic!("bad let: {:?}", other),
        }
    }

    #[test]
    fn test_let_without_initializer() {
        let program = parse_clean("let x;");
        assert!(matches!(&program.statements[0].stmt, StmtKind::Let(_, None)));
    }

    #[test]
    fn test_assign_statement() {
        let program = parse_clean("x = x + 1;");
        match &program.statements[0].stmt {
            StmtKind::Assign(name, value) => {
                assert_eq!(name.name, "x");
                assert_eq!(value.ast_string(), "(x + 1)");
            }
            other => panic!("bad assign: {:?}", other),
        }
    }

    #[test]
    fn test_return_statement() {
        let program = parse_clean("return 5 + 5;");
        match &program.statements[0].stmt {
            StmtKind::Return(Some(value)) => assert_eq!(value.ast_string(), "(5 + 5)"),
            other => panic!("bad return: {:?}", other),
        }

        let program = parse_clean("fn f() { return; }");
        match &program.statements[0].stmt {
            StmtKind::Function(_, _, body) => {
                assert!(matches!(body[0].stmt, StmtKind::Return(None)));
            }
            other => panic!("bad fn: {:?}", other),
        }
    }

    #[test]
    fn test_if_else_expression() {
        let program = parse_clean("if (x < y) { x } else { y }");
        match &first_expr(&program).expr {
            ExprKind::If(condition, consequence, alternative) => {
                assert_eq!(condition.ast_string(), "(x < y)");
                assert_eq!(consequence.len(), 1);
                assert!(alternative.is_some());
            }
            other => panic!("bad if: {:?}", other),
        }
    }

    #[test]
    fn test_function_literal_and_call() {
        let program = parse_clean("let add = fn(a, b) { a + b }; add(2, 3);");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[1].stmt {
            StmtKind::Expression(expr) => assert_eq!(expr.ast_string(), "add(2, 3)"),
            other => panic!("bad call: {:?}", other),
        }
    }

    #[test]
    fn test_named_function_statement() {
        let program = parse_clean("fn add(a, b) { return a + b; }");
        match &program.statements[0].stmt {
            StmtKind::Function(name, params, body) => {
                assert_eq!(name.name, "add");
                assert_eq!(params.len(), 2);
                assert_eq!(body.len(), 1);
            }
            other => panic!("bad fn statement: {:?}", other),
        }
    }

    #[test]
    fn test_while_statement() {
        let program = parse_clean("while (i < 3) { i = i + 1 }");
        match &program.statements[0].stmt {
            StmtKind::While(condition, body) => {
                assert_eq!(condition.ast_string(), "(i < 3)");
                assert_eq!(body.len(), 1);
            }
            other => panic!("bad while: {:?}", other),
        }
    }

    #[test]
    fn test_for_statement() {
        let program = parse_clean("for (let i = 0; i < 10; i++) { x = x + i; }");
        match &program.statements[0].stmt {
            StmtKind::For(init, condition, post, body) => {
                assert!(matches!(init.stmt, StmtKind::Let(_, _)));
                assert_eq!(condition.ast_string(), "(i < 10)");
                assert_eq!(post.ast_string(), "(i++)");
                assert_eq!(body.len(), 1);
            }
            other => panic!("bad for: {:?}", other),
        }
    }

    #[test]
    fn test_break_and_continue() {
        let program = parse_clean("while (true) { break; continue; }");
        match &program.statements[0].stmt {
            StmtKind::While(_, body) => {
                assert!(matches!(body[0].stmt, StmtKind::Break));
                assert!(matches!(body[1].stmt, StmtKind::Continue));
            }
            other => panic!("bad loop: {:?}", other),
        }
    }

    #[test]
    fn test_array_and_index() {
        let program = parse_clean("[1, 2 * 2, \"x\"][1]");
        assert_eq!(first_expr(&program).ast_string(), "([1, (2 * 2), \"x\"][1])");
    }

    #[test]
    fn test_hash_literal() {
        let program = parse_clean("{\"k\": 1, 2: \"v\"}");
        match &first_expr(&program).expr {
            ExprKind::HashLiteral(pairs) => assert_eq!(pairs.len(), 2),
            other => panic!("bad hash: {:?}", other),
        }

        let program = parse_clean("{}");
        assert!(matches!(
            &first_expr(&program).expr,
            ExprKind::HashLiteral(pairs) if pairs.is_empty()
        ));
    }

    #[test]
    fn test_module_import_all() {
        let program = parse_clean("mod strings: *;");
        assert!(program.statements.is_empty());
        assert!(program.is_empty);
        assert_eq!(program.modules.len(), 1);
        assert!(program.modules[0].import_all);
        assert_eq!(program.modules[0].name.name, "strings");
    }

    #[test]
    fn test_module_import_list() {
        let program = parse_clean("mod strings: [upper, lower]; upper(\"x\")");
        let import = &program.modules[0];
        assert!(!import.import_all);
        let names: Vec<&str> = import.imports.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["upper", "lower"]);
    }

    #[test]
    fn test_empty_import_list_warns() {
        let (program, diagnostics) = parse("mod strings: [];");
        assert_eq!(program.modules.len(), 1);
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_warning);
    }

    #[test]
    fn test_module_qualified_identifier() {
        let program = parse_clean("strings.upper(\"x\")");
        assert_eq!(first_expr(&program).ast_string(), "strings.upper(\"x\")");
    }

    #[test]
    fn test_error_recovery_reports_independent_errors() {
        let (_, diagnostics) = parse("let = 5; let y 10; let z = 3;");
        assert!(diagnostics.len() >= 2);
        assert!(diagnostics[0]
            .message
            .contains("expected next token to be IDENT, got = instead"));
    }

    #[test]
    fn test_illegal_token_not_reported_twice() {
        let (_, diagnostics) = parse("let x = #");
        let lexer_count = diagnostics.iter().filter(|d| d.stage == Stage::Lexer).count();
        let parser_count = diagnostics.iter().filter(|d| d.stage == Stage::Parser).count();
        assert_eq!(lexer_count, 1);
        assert_eq!(parser_count, 0);
    }

    #[test]
    fn test_ast_json_round_trip() {
        let source = "mod io: *; fn fib(n) { if (n < 2) { return n; } \
                      return fib(n - 1) + fib(n - 2); } io.println(fib(10));";
        let program = parse_clean(source);

        let json = serde_json::to_string(&program).expect("serialize");
        let back: Program = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(program, back);
    }
}
