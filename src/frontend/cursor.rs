use super::span::CodePosition;
use std::iter::Peekable;
use std::str::CharIndices;

#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    char_iterator: Peekable<CharIndices<'src>>,
    position: CodePosition,
}

impl<'src> Cursor<'src> {
    /// Creates a character stream for the source string.
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            char_iterator: source.char_indices().peekable(),
            position: CodePosition::start(),
        }
    }

    /// Position of the cursor.
    pub fn get_position(&self) -> CodePosition {
        self.position
    }

    /// Byte offset of the next character, or the source length at the end.
    pub fn byte_pos(&self) -> usize {
        self.position.byte_pos
    }

    /// Peeks the next character without consuming it.
    pub fn peek(&mut self) -> Option<char> {
        self.char_iterator.peek().map(|&(_, ch)| ch)
    }

    /// Consumes the next character.
    pub fn take(&mut self) -> Option<char> {
        let (_, ch) = self.char_iterator.next()?;

        self.position.byte_pos = self
            .char_iterator
            .peek()
            .map(|&(idx, _)| idx)
            .unwrap_or(self.source.len());
        if ch == '\n' {
            self.position.line_no += 1;
            self.position.column_no = 1;
        } else {
            self.position.column_no += 1;
        }

        Some(ch)
    }

    /// Consumes next characters as long as they meet condition.
    /// At the end, the next character fails condition.
    pub fn take_while<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some(ch) = self.peek() {
            if !condition(ch) {
                break;
            }
            self.take();
        }
    }

    /// Source text between a starting byte offset and the cursor.
    pub fn slice_from(&self, start_idx: usize) -> &'src str {
        &self.source[start_idx..self.position.byte_pos]
    }
}
