//! Tokenizer for the Java-like source subset
//!
//! Whitespace and comments are skipped; their text is recovered later from
//! the source buffer through the gaps between node ranges. Positions follow
//! the line terminator rules in [`crate::position`].

use crate::Result;
use crate::error::VerbatimError;
use crate::position::{Position, is_terminator, terminator_len};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Ident,
    Integer,
    Char,
    LBrace,
    RBrace,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Eq,
    Plus,
    Minus,
    Star,
    Slash,
    Eof,
}

/// A token with its text and inclusive source positions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub start: Position,
    /// Position of the last character of the token
    pub end: Position,
}

/// Split `source` into tokens, ending with a single [`TokenKind::Eof`]
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    let mut cursor = Cursor::new(source);
    let mut tokens = Vec::new();

    loop {
        cursor.skip_trivia()?;
        let start = cursor.position();
        let Some(current) = cursor.peek() else {
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                start,
                end: start,
            });
            return Ok(tokens);
        };

        let begin = cursor.offset;
        let kind = match current {
            '{' => cursor.single(TokenKind::LBrace),
            '}' => cursor.single(TokenKind::RBrace),
            '(' => cursor.single(TokenKind::LParen),
            ')' => cursor.single(TokenKind::RParen),
            ';' => cursor.single(TokenKind::Semicolon),
            ',' => cursor.single(TokenKind::Comma),
            '=' => cursor.single(TokenKind::Eq),
            '+' => cursor.single(TokenKind::Plus),
            '-' => cursor.single(TokenKind::Minus),
            '*' => cursor.single(TokenKind::Star),
            '/' => cursor.single(TokenKind::Slash),
            '\'' => cursor.char_literal()?,
            c if c.is_ascii_digit() => {
                cursor.eat_while(|c| c.is_ascii_digit());
                TokenKind::Integer
            }
            c if is_ident_start(c) => {
                cursor.eat_while(is_ident_continue);
                TokenKind::Ident
            }
            other => {
                return Err(VerbatimError::parse_error(
                    format!("unexpected character `{other}`"),
                    start.line,
                    start.column,
                ));
            }
        };

        let text = &source[begin..cursor.offset];
        let width = text.chars().count() as u32;
        tokens.push(Token {
            kind,
            text: text.to_string(),
            start,
            end: start.right(width.saturating_sub(1)),
        });
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

struct Cursor<'a> {
    source: &'a str,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn peek(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.offset..].chars().nth(1)
    }

    /// Consume one character, or one whole line terminator
    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        let bytes = self.source.as_bytes();
        if is_terminator(bytes[self.offset]) {
            self.offset += terminator_len(bytes, self.offset);
            self.line += 1;
            self.column = 1;
        } else {
            self.offset += c.len_utf8();
            self.column += 1;
        }
        Some(c)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.bump();
        kind
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match (self.peek(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    self.eat_while(|c| c != '\n' && c != '\r');
                }
                (Some('/'), Some('*')) => {
                    let start = self.position();
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek(), self.peek_second()) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => {
                                return Err(VerbatimError::parse_error(
                                    "unterminated block comment",
                                    start.line,
                                    start.column,
                                ));
                            }
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn char_literal(&mut self) -> Result<TokenKind> {
        let start = self.position();
        self.bump();
        match self.bump() {
            Some('\\') => {
                self.bump();
            }
            Some('\'') | None => {
                return Err(VerbatimError::parse_error(
                    "empty character literal",
                    start.line,
                    start.column,
                ));
            }
            Some(c) if c == '\n' || c == '\r' => {
                return Err(VerbatimError::parse_error(
                    "line break in character literal",
                    start.line,
                    start.column,
                ));
            }
            Some(_) => {}
        }
        match self.bump() {
            Some('\'') => Ok(TokenKind::Char),
            _ => Err(VerbatimError::parse_error(
                "unterminated character literal",
                start.line,
                start.column,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_skips_comments_and_whitespace() {
        assert_eq!(
            kinds("class /*a comment*/ A { // tail\n}"),
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn test_positions_are_inclusive() {
        let tokens = tokenize("  foo(int x)").unwrap();
        assert_eq!(tokens[0].text, "foo");
        assert_eq!(tokens[0].start, Position::new(1, 3));
        assert_eq!(tokens[0].end, Position::new(1, 5));
        assert_eq!(tokens[1].start, Position::new(1, 6));
    }

    #[test]
    fn test_line_terminators() {
        for (source, line) in [
            ("a\nb", 2),
            ("a\rb", 2),
            ("a\r\nb", 2),
            ("a\n\rb", 2),
            ("a\n\nb", 3),
            ("a\r\n\r\nb", 3),
        ] {
            let tokens = tokenize(source).unwrap();
            assert_eq!(tokens[1].start, Position::new(line, 1), "{source:?}");
        }
    }

    #[test]
    fn test_char_literal() {
        let tokens = tokenize("'z' '\\n'").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Char);
        assert_eq!(tokens[0].text, "'z'");
        assert_eq!(tokens[1].text, "'\\n'");
        assert!(tokenize("'ab'").is_err());
    }

    #[test]
    fn test_errors_carry_position() {
        let err = tokenize("class A {\n  #\n}").unwrap_err();
        assert_eq!(err.to_string(), "Parse error: unexpected character `#` at line 2, column 3");
        assert!(tokenize("/* open").is_err());
    }
}
