//! Tokens → AST, by recursive descent with precedence climbing for
//! expressions. Split across files the way the teacher splits its
//! parser: a cursor (`context`), expression grammar (`expression`),
//! and statement grammar (`statement`), all as `impl` blocks on one
//! `Parser` type.

mod context;
mod expression;
mod statement;
#[cfg(test)]
mod tests;

use crate::ast::Program;
use crate::error::Result;
use crate::token::Token;
use context::Cursor;

/// Declarations and calls both cap their parameter/argument count here,
/// matching the grammar's `// max 255` annotations.
pub const MAX_ARITY: usize = 255;

pub struct Parser {
    cursor: Cursor,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { cursor: Cursor::new(tokens) }
    }

    /// `program → declaration* EOF`
    #[tracing::instrument(skip_all)]
    pub fn parse(mut self) -> Result<Program> {
        let mut statements = Vec::new();
        while !self.cursor.is_at_end() {
            statements.push(self.declaration()?);
        }
        Ok(Program { statements })
    }
}

/// Convenience entry point mirroring the teacher's free-function
/// `parse(tokens)` wrapper around `ParserContext`.
pub fn parse(tokens: Vec<Token>) -> Result<Program> {
    Parser::new(tokens).parse()
}
