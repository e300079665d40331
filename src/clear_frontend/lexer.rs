use super::cursor::Cursor;
use super::diagnostics::{Diagnostic, Stage};
use super::span::Span;
use super::token::{SpannedToken, Token};

use log::trace;

/// Pull-based lexer. Total: every call to `next_token` yields a token, with
/// malformed input surfacing as `Illegal` tokens plus queued diagnostics.
pub struct Lexer<'src> {
    source: &'src str,
    cursor: Cursor<'src>,
    lines: Vec<String>,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Lexer {
            source,
            cursor: Cursor::new(source),
            lines: source.split('\n').map(|l| l.to_owned()).collect(),
            diagnostics: vec![],
        }
    }

    /// Returns the next token in source order, eventually `EndOfFile` forever.
    pub fn next_token(&mut self) -> SpannedToken {
        loop {
            self.cursor.take_while(|ch| ch.is_ascii_whitespace());

            let start = self.cursor.position();
            let token = self.lex_token();
            let end = self.cursor.position();

            if let Some(token) = token {
                trace!("lexed {:?} at {}", token, start);
                return SpannedToken {
                    token,
                    span: Span::new(start, end),
                };
            }
        }
    }

    /// The source split into lines, 1-indexed through `source_line`.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn source_line(&self, line: usize) -> &str {
        line.checked_sub(1)
            .and_then(|idx| self.lines.get(idx))
            .map(|l| l.as_str())
            .unwrap_or("")
    }

    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    /// Lexes one token, or `None` for a comment.
    fn lex_token(&mut self) -> Option<Token> {
        let (byte_idx, ch) = match self.cursor.take() {
            Some(t) => t,
            None => return Some(Token::EndOfFile),
        };

        let token = match ch {
            ';' => Token::Semicolon,
            ':' => Token::Colon,
            ',' => Token::Comma,
            '.' => Token::Dot,
            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,

            // One- or two-character operators.
            '=' => self.two_char_op('=', Token::Assign, Token::DoubleEq),
            '!' => self.two_char_op('=', Token::Bang, Token::BangEq),
            '<' => self.two_char_op('=', Token::LeftAngle, Token::LeftAngleEq),
            '>' => self.two_char_op('=', Token::RightAngle, Token::RightAngleEq),
            '*' => self.two_char_op('=', Token::Asterisk, Token::AsteriskEq),
            '+' => {
                if self.cursor.take_if('+') {
                    Token::Increment
                } else {
                    self.two_char_op('=', Token::Plus, Token::PlusEq)
                }
            }
            '-' => {
                if self.cursor.take_if('-') {
                    Token::Decrement
                } else {
                    self.two_char_op('=', Token::Minus, Token::MinusEq)
                }
            }
            '/' => {
                if self.cursor.take_if('/') {
                    self.cursor.take_while(|ch| ch != '\n');
                    return None;
                }
                self.two_char_op('=', Token::Slash, Token::SlashEq)
            }

            '"' => self.lex_string(byte_idx),

            _ if ch.is_ascii_digit() => self.lex_number(byte_idx),
            _ if is_identifier_char(ch) => self.lex_identifier_or_keyword(byte_idx),

            _ => {
                self.report(format!("illegal character '{}'", ch));
                Token::Illegal(ch)
            }
        };

        Some(token)
    }

    /// Emits the two-character token when the next char matches, else the
    /// single-character one.
    fn two_char_op(&mut self, next: char, single: Token, double: Token) -> Token {
        if self.cursor.take_if(next) {
            double
        } else {
            single
        }
    }

    /// Scans to the closing quote. The token content excludes the quotes.
    fn lex_string(&mut self, start_idx: usize) -> Token {
        let content_start = start_idx + 1;
        self.cursor.take_while(|ch| ch != '"');

        match self.cursor.peek() {
            Some((end_idx, _)) => {
                self.cursor.take();
                Token::Str(self.source[content_start..end_idx].to_owned())
            }
            None => {
                self.report("unterminated string literal".to_owned());
                Token::Str(self.source[content_start..].to_owned())
            }
        }
    }

    fn lex_number(&mut self, start_idx: usize) -> Token {
        self.cursor.take_while(|ch| ch.is_ascii_digit());

        let mut is_float = false;
        if let Some((_, '.')) = self.cursor.peek() {
            if self
                .cursor
                .peek_next()
                .map_or(false, |(_, ch)| ch.is_ascii_digit())
            {
                is_float = true;
                self.cursor.take();
                self.cursor.take_while(|ch| ch.is_ascii_digit());
            }
        }

        let end_idx = self.current_byte();
        let source = self.source;
        let scanned = &source[start_idx..end_idx];
        if is_float {
            match scanned.parse() {
                Ok(value) => Token::Float(value),
                Err(_) => {
                    self.report(format!("could not parse '{}' as float", scanned));
                    Token::Illegal(scanned.chars().next().unwrap_or('0'))
                }
            }
        } else {
            match scanned.parse() {
                Ok(value) => Token::Int(value),
                Err(_) => {
                    self.report(format!("could not parse '{}' as integer", scanned));
                    Token::Illegal(scanned.chars().next().unwrap_or('0'))
                }
            }
        }
    }

    fn lex_identifier_or_keyword(&mut self, start_idx: usize) -> Token {
        self.cursor
            .take_while(|ch| is_identifier_char(ch) || ch.is_ascii_digit());
        let end_idx = self.current_byte();
        Token::lookup_ident(&self.source[start_idx..end_idx])
    }

    fn current_byte(&mut self) -> usize {
        match self.cursor.peek() {
            Some((idx, _)) => idx,
            None => self.source.len(),
        }
    }

    fn report(&mut self, message: String) {
        let pos = self.cursor.position();
        let context = self.source_line(pos.line).to_owned();
        self.diagnostics
            .push(Diagnostic::error(Stage::Lexer, message, pos.line, pos.column, context));
    }

    /// Iterator over tokens up to (excluding) `EndOfFile`.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator { lexer: self }
    }
}

pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = SpannedToken;

    fn next(&mut self) -> Option<Self::Item> {
        let spanned = self.lexer.next_token();
        if spanned.token == Token::EndOfFile {
            return None;
        }
        Some(spanned)
    }
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}
