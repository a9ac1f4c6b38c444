//! Error handling for the symbolic layer

use thiserror::Error;

/// The expression text is not a well-formed expression in the declared variable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("empty expression")]
    Empty,
    #[error("unexpected input at position {position}: '{fragment}'")]
    Unexpected { position: usize, fragment: String },
    #[error("unknown function '{name}' at position {position}")]
    UnknownFunction { name: String, position: usize },
    #[error("unknown symbol '{name}', the only variable is '{variable}'")]
    UnknownSymbol { name: String, variable: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SymbolicError {
    #[error("variable '{name}' is not bound, expected '{expected}'")]
    UnboundVariable { name: String, expected: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
