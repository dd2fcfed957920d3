//! The crate's single error type.
//!
//! Grounded on the teacher's `AstError`/`FormattedError` shape
//! (`#[derive(Debug, Error)]` over one enum with a message + line), but
//! collapsed to the three categories spec.md §7 calls for: lexical,
//! parse, and runtime. Non-local `return` is deliberately **not**
//! represented here — see [`crate::interpreter::Signal`].

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    #[error("Lexical error at line {line}: {message}")]
    Lex { message: String, line: usize },

    #[error("Parse error at line {line}: {message}")]
    Parse { message: String, line: usize },

    #[error("Runtime error at line {line}: {message}")]
    Runtime { message: String, line: usize },
}

impl Error {
    pub fn lex(message: impl Into<String>, line: usize) -> Self {
        Error::Lex { message: message.into(), line }
    }

    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Error::Parse { message: message.into(), line }
    }

    pub fn runtime(message: impl Into<String>, line: usize) -> Self {
        Error::Runtime { message: message.into(), line }
    }

    /// The source line the error occurred at, where available.
    pub fn line(&self) -> usize {
        match self {
            Error::Lex { line, .. } | Error::Parse { line, .. } | Error::Runtime { line, .. } => *line,
        }
    }
}
