//! Source text → token stream.
//!
//! Hand-written character scanner, grounded on the teacher's
//! `Token::eat` dispatch (`compiler/parser/src/tokenizer/lexer.rs`):
//! single-character tokens consumed directly, two-character operators
//! resolved by peeking one character ahead, and a fallback "unmatched
//! character" error. The concrete rules (raw string lexemes, `//` and
//! `#` line comments, keyword-before-identifier ordering) follow
//! `original_source/src/lexer.py`.

use crate::error::{Error, Result};
use crate::span::Span;
use crate::token::{keyword_or_ident, Token, TokenKind};
use std::iter::Peekable;
use std::str::Chars;

pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { chars: source.chars().peekable(), line: 1, column: 1 }
    }

    /// Scans the whole source into a token vector terminated by exactly
    /// one `EOF` sentinel.
    #[tracing::instrument(skip_all)]
    pub fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        tokens.push(Token::eof(self.pos()));
        Ok(tokens)
    }

    fn pos(&self) -> Span {
        Span::new(self.line, self.column)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Returns the next token, or `None` once the source is exhausted.
    /// Skips whitespace and comments without emitting tokens for them.
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            match self.peek() {
                None => return Ok(None),
                Some(c) if c == ' ' || c == '\t' || c == '\r' || c == '\n' => {
                    self.advance();
                }
                Some('/') => {
                    // A single `/` is the divide operator; `//` is a line comment.
                    let start = self.pos();
                    self.advance();
                    if self.advance_if('/') {
                        self.skip_line_comment();
                        continue;
                    }
                    return Ok(Some(Token::new(TokenKind::Divide, "/", start)));
                }
                Some('#') => {
                    self.advance();
                    self.skip_line_comment();
                }
                _ => break,
            }
        }

        let start = self.pos();
        let c = match self.advance() {
            Some(c) => c,
            None => return Ok(None),
        };

        let token = match c {
            '(' => Token::new(TokenKind::LParen, "(", start),
            ')' => Token::new(TokenKind::RParen, ")", start),
            '{' => Token::new(TokenKind::LBrace, "{", start),
            '}' => Token::new(TokenKind::RBrace, "}", start),
            '[' => Token::new(TokenKind::LBracket, "[", start),
            ']' => Token::new(TokenKind::RBracket, "]", start),
            ',' => Token::new(TokenKind::Comma, ",", start),
            '.' => Token::new(TokenKind::Dot, ".", start),
            '+' => Token::new(TokenKind::Plus, "+", start),
            '-' => Token::new(TokenKind::Minus, "-", start),
            '*' => Token::new(TokenKind::Multiply, "*", start),
            ':' => Token::new(TokenKind::Colon, ":", start),
            ';' => Token::new(TokenKind::Semicolon, ";", start),
            '=' => {
                if self.advance_if('=') {
                    Token::new(TokenKind::Eq, "==", start)
                } else {
                    Token::new(TokenKind::Assign, "=", start)
                }
            }
            '!' => {
                if self.advance_if('=') {
                    Token::new(TokenKind::Neq, "!=", start)
                } else {
                    Token::new(TokenKind::Not, "!", start)
                }
            }
            '<' => {
                if self.advance_if('=') {
                    Token::new(TokenKind::Lte, "<=", start)
                } else {
                    Token::new(TokenKind::Lt, "<", start)
                }
            }
            '>' => {
                if self.advance_if('=') {
                    Token::new(TokenKind::Gte, ">=", start)
                } else {
                    Token::new(TokenKind::Gt, ">", start)
                }
            }
            '&' => {
                if self.advance_if('&') {
                    Token::new(TokenKind::And, "&&", start)
                } else {
                    return Err(Error::lex(format!("Unexpected character '&'"), start.line));
                }
            }
            '|' => {
                if self.advance_if('|') {
                    Token::new(TokenKind::Or, "||", start)
                } else {
                    return Err(Error::lex(format!("Unexpected character '|'"), start.line));
                }
            }
            '"' => self.scan_string(start)?,
            c if c.is_ascii_digit() => self.scan_number(c, start),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(c, start),
            c => return Err(Error::lex(format!("Unexpected character '{c}'"), start.line)),
        };

        Ok(Some(token))
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// String bodies may contain any character except an unescaped `"`;
    /// `\` consumes the following character verbatim. The stored lexeme
    /// excludes the surrounding quotes and is *not* unescaped.
    fn scan_string(&mut self, start: Span) -> Result<Token> {
        let mut value = String::new();
        loop {
            match self.advance() {
                None => return Err(Error::lex("Unterminated string", start.line)),
                Some('"') => break,
                Some('\\') => {
                    match self.advance() {
                        Some(escaped) => {
                            value.push('\\');
                            value.push(escaped);
                        }
                        None => return Err(Error::lex("Unterminated string", start.line)),
                    }
                }
                Some(c) => value.push(c),
            }
        }
        Ok(Token::new(TokenKind::Str(value.clone()), value, start))
    }

    fn scan_number(&mut self, first: char, start: Span) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }

        // A float requires a `.` followed by at least one digit; otherwise
        // the `.` belongs to a later token (e.g. member access).
        if self.peek() == Some('.') {
            let mut lookahead = self.chars.clone();
            lookahead.next();
            if matches!(lookahead.peek(), Some(c) if c.is_ascii_digit()) {
                lexeme.push('.');
                self.advance();
                while let Some(c) = self.peek() {
                    if c.is_ascii_digit() {
                        lexeme.push(c);
                        self.advance();
                    } else {
                        break;
                    }
                }
                return Token::new(TokenKind::Float(lexeme.clone()), lexeme, start);
            }
        }

        Token::new(TokenKind::Integer(lexeme.clone()), lexeme, start)
    }

    fn scan_identifier(&mut self, first: char, start: Span) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first);
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                lexeme.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = keyword_or_ident(lexeme.clone());
        Token::new(kind, lexeme, start)
    }
}

/// Convenience entry point mirroring the teacher's free-function
/// `tokenize(path, source)` wrapper around `ParserContext`/`Token::eat`.
pub fn tokenize(source: &str) -> Result<Vec<Token>> {
    Lexer::new(source).tokenize()
}
