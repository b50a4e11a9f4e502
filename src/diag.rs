//! Front-end diagnostics.

use thiserror::Error;

/// Line number (starting at one).
pub type Position = u32;

/// First lexical or syntactic error found in a source text.
#[derive(Debug, PartialEq, Clone, Error)]
#[error("syntax error: line {pos}: {kind}")]
pub struct SyntaxError {
    pub pos: Position,
    pub kind: SyntaxErrorKind,
}

impl SyntaxError {
    pub fn new(pos: Position, kind: SyntaxErrorKind) -> SyntaxError {
        SyntaxError { pos, kind }
    }
}

#[derive(Debug, PartialEq, Clone, Error)]
pub enum SyntaxErrorKind {
    #[error("unexpected token '{found}', expected '{expected}'")]
    UnexpectedToken { found: String, expected: String },
    #[error("unexpected character: {0}")]
    UnexpectedChar(char),
    #[error("unterminated string")]
    UnterminatedString,
    #[error("cannot parse floating point literal: {0}")]
    BadNumberLiteral(String),
    #[error("invalid assignment target")]
    InvalidAssignmentTarget,
    #[error("expected expression, found '{0}'")]
    ExpectedExpression(String),
    #[error("expected identifier, found '{0}'")]
    ExpectedIdentifier(String),
}
