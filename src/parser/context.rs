//! The parser's token cursor.
//!
//! Grounded on the teacher's `ParserContext`
//! (`compiler/parser/src/parser/context.rs`): a flat `Vec<Token>` with a
//! cursor index, `bump`/`check`/`eat`/`expect` primitives, and errors
//! that cite the offending token's lexeme and line.

use crate::error::{Error, Result};
use crate::token::{Token, TokenKind};

pub struct Cursor {
    tokens: Vec<Token>,
    pos: usize,
}

impl Cursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    pub fn previous(&self) -> &Token {
        &self.tokens[self.pos.saturating_sub(1)]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn check(&self, kind: &TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == *kind
    }

    pub fn bump(&mut self) -> Token {
        if !self.is_at_end() {
            self.pos += 1;
        }
        self.previous().clone()
    }

    /// Consumes and returns the current token if it matches `kind`.
    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    /// Consumes the current token if it matches `kind`, otherwise raises
    /// a parse error with `message`.
    pub fn expect(&mut self, kind: &TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.bump())
        } else {
            Err(self.error_at_current(message))
        }
    }

    /// Consumes the current token if it is any `ID`, otherwise raises a
    /// parse error with `message`. Needed because `TokenKind::Ident`
    /// carries the matched name, so a plain `expect` would only match
    /// one specific identifier spelling.
    pub fn expect_identifier(&mut self, message: &str) -> Result<Token> {
        if matches!(self.peek().kind, TokenKind::Ident(_)) {
            Ok(self.bump())
        } else {
            Err(self.error_at_current(message))
        }
    }

    pub fn error_at_current(&self, message: &str) -> Error {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            Error::parse(format!("{message} at end"), token.line())
        } else {
            Error::parse(format!("{message} at '{}'", token.lexeme), token.line())
        }
    }
}
