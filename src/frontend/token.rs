use super::span::Span;
use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    // Literals.
    Number,
    Identifier,

    // Keywords.
    Let,
    Const,

    // Single-character tokens.
    BinaryOperator,
    Equals,
    Semicolon,
    OpenParen,
    CloseParen,

    EndOfFile,
}

/// Text written for the trailing end-of-file token.
pub const EOF_TEXT: &str = "EndOfFile";

#[derive(Debug, PartialEq, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            text: text.into(),
            span,
        }
    }

    pub fn end_of_file(span: Span) -> Self {
        Token::new(TokenKind::EndOfFile, EOF_TEXT, span)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl TokenKind {
    /// Maps reserved words to their keyword kind.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        match text {
            "let" => Some(TokenKind::Let),
            "const" => Some(TokenKind::Const),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Let => "`let`",
            TokenKind::Const => "`const`",
            TokenKind::BinaryOperator => "binary operator",
            TokenKind::Equals => "`=`",
            TokenKind::Semicolon => "`;`",
            TokenKind::OpenParen => "`(`",
            TokenKind::CloseParen => "`)`",
            TokenKind::EndOfFile => "end of file",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.kind {
            TokenKind::Number | TokenKind::Identifier | TokenKind::BinaryOperator => {
                write!(f, "{} `{}`", self.kind, self.text)
            }
            _ => write!(f, "{}", self.kind),
        }
    }
}
