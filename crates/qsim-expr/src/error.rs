//! Error types for parsing and evaluating expressions.

use qsim_stats::LookupError;
use thiserror::Error;

/// What went wrong while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    #[error("empty expression")]
    Empty,

    #[error("unexpected character '{0}'")]
    UnexpectedCharacter(char),

    #[error("invalid number")]
    InvalidNumber,

    #[error("unterminated string")]
    UnterminatedString,

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unexpected '{0}'")]
    UnexpectedToken(String),

    #[error("unknown name \"{0}\"")]
    UnknownIdentifier(String),

    #[error("expected '{0}'")]
    Expected(char),

    #[error("{function} takes exactly one argument")]
    ArgumentCount { function: &'static str },

    #[error("{function} expects a quoted selector")]
    ExpectedSelector { function: &'static str },
}

/// A parse failure at a character offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} at position {}", .position + 1)]
pub struct ParseError {
    /// 0-based character offset of the failing character.
    pub position: usize,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(position: usize, kind: ParseErrorKind) -> Self {
        Self { position, kind }
    }

    /// 1-based position as shown to users.
    pub fn display_position(&self) -> usize {
        self.position + 1
    }
}

/// Evaluation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,

    /// Argument outside the domain of the named function.
    #[error("argument outside the domain of {0}")]
    Domain(&'static str),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// The selected value cannot be read as a number or distribution.
    #[error("value of \"{0}\" is not a number")]
    NotANumber(String),

    #[error("result is not a finite number")]
    NonFinite,
}
