use super::span::{CodePosition, Span};
use super::token::{Token, TokenKind};

use thiserror::Error;

/// Deepest run of nested parentheses and chained assignments the parser descends into.
pub const MAX_NESTING: usize = 128;
/// Longest path from the root of an expression tree to one of its leaves.
pub const MAX_DEPTH: usize = 1024;

/// A character no lexing rule accepts.
#[derive(Debug, PartialEq, Eq, Clone, Error)]
#[error("Unrecognized character {ch:?} at {position}")]
pub struct LexError {
    pub ch: char,
    pub position: CodePosition,
}

pub type LexerResult<T> = Result<T, LexError>;

#[derive(Debug, PartialEq, Clone, Error)]
#[error("{error} at {}", .span.start_pos)]
pub struct ParserError {
    pub span: Span,
    pub error: ParserErrorType,
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum ParserErrorType {
    #[error("Expected {expected}, but instead got {found}")]
    ExpectedToken { expected: TokenKind, found: Token },
    #[error("Expected expression, but instead got {0}")]
    ExpectedExpr(Token),
    #[error("Constant `{0}` must be initialized in its declaration")]
    UninitializedConstant(String),
    #[error("Expression is nested more than {0} levels deep")]
    NestingTooDeep(usize),
}

pub type ParserResult<T> = Result<T, ParserError>;

impl LexError {
    pub fn new(ch: char, position: CodePosition) -> Self {
        LexError { ch, position }
    }

    pub fn span(&self) -> Span {
        let mut end_pos = self.position;
        end_pos.byte_pos += self.ch.len_utf8();
        end_pos.column_no += 1;
        Span::new(self.position, end_pos)
    }
}

impl ParserError {
    pub fn new(error: ParserErrorType, span: Span) -> Self {
        ParserError { span, error }
    }

    /// True for errors that describe a well-formed but meaningless program.
    pub fn is_semantic(&self) -> bool {
        matches!(self.error, ParserErrorType::UninitializedConstant(_))
    }
}

impl ParserErrorType {
    pub fn name(&self) -> &'static str {
        match self {
            ParserErrorType::ExpectedToken { .. } => "ExpectedToken",
            ParserErrorType::ExpectedExpr(_) => "ExpectedExpr",
            ParserErrorType::UninitializedConstant(_) => "UninitializedConstant",
            ParserErrorType::NestingTooDeep(_) => "NestingTooDeep",
        }
    }
}
