use super::span::Position;
use std::iter::Peekable;
use std::str::CharIndices;

/// Character stream over the source with line/column tracking.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    chars: Peekable<CharIndices<'src>>,
    position: Position,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            chars: source.char_indices().peekable(),
            position: Position::new(0, 1, 1),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    /// Peeks the next character without consuming it.
    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.chars.peek().copied()
    }

    /// Peeks one character past the next without consuming anything.
    pub fn peek_next(&mut self) -> Option<(usize, char)> {
        let mut lookahead = self.clone();
        lookahead.take();
        lookahead.peek()
    }

    /// Consumes the next character.
    pub fn take(&mut self) -> Option<(usize, char)> {
        let (byte_idx, ch) = self.chars.next()?;

        self.position.byte = self.peek().map(|(idx, _)| idx).unwrap_or(self.source.len());
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }

        Some((byte_idx, ch))
    }

    /// Consumes the next character only if it equals the target.
    pub fn take_if(&mut self, target: char) -> bool {
        match self.peek() {
            Some((_, ch)) if ch == target => {
                self.take();
                true
            }
            _ => false,
        }
    }

    /// Consumes characters while the condition holds.
    pub fn take_while<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !condition(ch) {
                break;
            }
            self.take();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_column_tracking() {
        let mut cursor = Cursor::new("ab\nc");

        assert_eq!(cursor.position(), Position::new(0, 1, 1));
        cursor.take();
        assert_eq!(cursor.position(), Position::new(1, 1, 2));
        cursor.take();
        cursor.take();
        assert_eq!(cursor.position(), Position::new(3, 2, 1));
    }

    #[test]
    fn test_take_if_and_peek_next() {
        let mut cursor = Cursor::new("==");

        assert_eq!(cursor.peek_next(), Some((1, '=')));
        assert!(cursor.take_if('='));
        assert!(cursor.take_if('='));
        assert!(!cursor.take_if('='));
        assert_eq!(cursor.peek(), None);
    }
}
