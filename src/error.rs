use crate::frontend::errors::{LexError, ParserError};
use crate::frontend::span::Span;
use crate::interpreter::RuntimeError;

use num_enum::IntoPrimitive;
use std::fmt;
use thiserror::Error;

/// Broad class of a failure. Converts into the process exit code.
#[derive(Debug, PartialEq, Eq, Clone, Copy, IntoPrimitive)]
#[repr(u8)]
pub enum ErrorCategory {
    Lexical = 65,
    Syntactic = 66,
    Semantic = 70,
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum Error {
    #[error("{0}")]
    Lex(#[from] LexError),
    #[error("{0}")]
    Parse(#[from] ParserError),
    #[error("{0}")]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Lex(_) => ErrorCategory::Lexical,
            Error::Parse(e) if e.is_semantic() => ErrorCategory::Semantic,
            Error::Parse(_) => ErrorCategory::Syntactic,
            Error::Runtime(_) => ErrorCategory::Semantic,
        }
    }

    /// Name of the specific condition, e.g. `DivisionByZero`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Error::Lex(_) => "UnrecognizedCharacter",
            Error::Parse(e) => e.error.name(),
            Error::Runtime(e) => e.kind.name(),
        }
    }

    pub fn span(&self) -> Span {
        match self {
            Error::Lex(e) => e.span(),
            Error::Parse(e) => e.span,
            Error::Runtime(e) => e.span,
        }
    }

    /// Formats the error with the offending source line and a marker under the span.
    pub fn render(&self, source: &str) -> String {
        let span = self.span();
        let start = span.start_pos;
        let line = source.lines().nth(start.line_no.saturating_sub(1)).unwrap_or("");

        let width = if span.end_pos.line_no == start.line_no {
            span.end_pos.column_no.saturating_sub(start.column_no).max(1)
        } else {
            line.chars().count().saturating_sub(start.column_no.saturating_sub(1)).max(1)
        };

        // Tabs are kept so the marker lines up however the terminal expands them.
        let padding: String = line
            .chars()
            .take(start.column_no.saturating_sub(1))
            .map(|ch| if ch == '\t' { '\t' } else { ' ' })
            .collect();

        let gutter = " ".repeat(start.line_no.to_string().len());
        format!(
            "{} error: {}\n{} --> {}\n{} |\n{} | {}\n{} | {}{}",
            self.category(),
            self,
            gutter,
            start,
            gutter,
            start.line_no,
            line,
            gutter,
            padding,
            "^".repeat(width),
        )
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ErrorCategory::Lexical => "Lexical",
            ErrorCategory::Syntactic => "Syntactic",
            ErrorCategory::Semantic => "Semantic",
        };
        f.write_str(name)
    }
}
