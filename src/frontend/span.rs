use std::fmt;

/// Tracks position in source code for error messages.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct CodePosition {
    pub byte_pos: usize,
    pub line_no: usize,
    pub column_no: usize,
}

/// Represents the source range covered by a token, statement or expression.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Span {
    pub start_pos: CodePosition,
    pub end_pos: CodePosition,
}

impl CodePosition {
    pub fn new(byte_pos: usize, line_no: usize, column_no: usize) -> Self {
        CodePosition {
            byte_pos,
            line_no,
            column_no,
        }
    }

    /// Position of the first character of a source.
    pub fn start() -> Self {
        CodePosition::new(0, 1, 1)
    }
}

impl fmt::Display for CodePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line_no, self.column_no)
    }
}

impl Span {
    pub fn new(start_pos: CodePosition, end_pos: CodePosition) -> Self {
        Span { start_pos, end_pos }
    }

    /// Zero-width span sitting at a single position.
    pub fn point(pos: CodePosition) -> Self {
        Span::new(pos, pos)
    }

    pub fn extend(&self, other: Self) -> Self {
        Span {
            start_pos: std::cmp::min(self.start_pos, other.start_pos),
            end_pos: std::cmp::max(self.end_pos, other.end_pos),
        }
    }

    pub fn extract_string<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start_pos.byte_pos..self.end_pos.byte_pos)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.start_pos)
    }
}
