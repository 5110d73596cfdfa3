use super::cursor::Cursor;
use super::errors::{LexError, LexerResult};
use super::span::Span;
use super::token::{Token, TokenKind};

pub struct Lexer<'src> {
    cursor: Cursor<'src>,
}

impl<'src> Lexer<'src> {
    /// Creates a lexer from source.
    pub fn new(source: &'src str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
        }
    }

    /// Returns the next token. Keeps returning EndOfFile once the source is exhausted.
    pub fn next_token(&mut self) -> LexerResult<Token> {
        // Get rid of whitespace.
        self.cursor.take_while(is_whitespace_char);

        let start_pos = self.cursor.get_position();
        let start_idx = self.cursor.byte_pos();

        let ch = match self.cursor.peek() {
            Some(ch) => ch,
            None => return Ok(Token::end_of_file(Span::point(start_pos))),
        };

        let kind = match ch {
            // Single-character tokens.
            '(' => self.single(TokenKind::OpenParen),
            ')' => self.single(TokenKind::CloseParen),
            '+' | '-' | '*' | '/' | '%' => self.single(TokenKind::BinaryOperator),
            '=' => self.single(TokenKind::Equals),
            ';' => self.single(TokenKind::Semicolon),

            // Numbers.
            _ if is_digit_char(ch) => {
                self.cursor.take_while(is_digit_char);
                TokenKind::Number
            }

            // Identifiers and keywords.
            _ if is_cased_char(ch) => {
                self.cursor.take_while(is_cased_char);
                let text = self.cursor.slice_from(start_idx);
                TokenKind::keyword(text).unwrap_or(TokenKind::Identifier)
            }

            // Unrecognized character.
            _ => return Err(LexError::new(ch, start_pos)),
        };

        let text = self.cursor.slice_from(start_idx);
        let span = Span::new(start_pos, self.cursor.get_position());
        Ok(Token::new(kind, text, span))
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.take();
        kind
    }

    /// Returns an iterator version of lexer.
    pub fn iter(self) -> LexerIterator<'src> {
        LexerIterator {
            lexer: self,
            finished: false,
        }
    }
}

/// Yields every token up to and including EndOfFile, or up to the first error.
pub struct LexerIterator<'src> {
    lexer: Lexer<'src>,
    finished: bool,
}

impl<'src> Iterator for LexerIterator<'src> {
    type Item = LexerResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let result = self.lexer.next_token();
        self.finished = match &result {
            Ok(token) => token.is(TokenKind::EndOfFile),
            Err(_) => true,
        };

        Some(result)
    }
}

/// Converts source text into tokens terminated by a single EndOfFile token.
pub fn tokenize(source: &str) -> LexerResult<Vec<Token>> {
    let tokens = Lexer::new(source).iter().collect::<LexerResult<Vec<_>>>()?;
    tracing::debug!(tokens = tokens.len(), "lexed source");
    Ok(tokens)
}

fn is_whitespace_char(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

fn is_digit_char(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Identifier characters are those whose upper- and lower-case forms differ.
/// Cased letters of any script qualify; `_`, digits and uncased scripts do not.
fn is_cased_char(ch: char) -> bool {
    ch.to_uppercase().ne(ch.to_lowercase())
}
