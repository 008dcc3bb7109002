//! Error handling for the math engine.
//!
//! Calculators return [`MathError`]; the HTTP layer turns it into an
//! [`HttpErrorResponse`] through [`ErrorCode`].
//!
//! # HTTP Status Codes
//!
//! | Code | Status | Usage |
//! |------|--------|-------|
//! | `INVALID_REQUEST` | 400 | Malformed JSON or unknown task tag |
//! | `INVALID_INPUT` | 422 | A field is missing, non-positive or out of range |
//! | `DIVISION_BY_ZERO` | 422 | A ratio or fixed-point division by zero |
//! | `PARSE_ERROR` | 422 | An arithmetic expression with a syntax problem |
//! | `NUMERIC_OVERFLOW` | 422 | A value left the fixed-point range |
//! | `INTERNAL_ERROR` | 500 | Unexpected server error |
//!
//! A free-text question that matches no recognised pattern is not an error;
//! see [`crate::parse::ParseOutcome::Declined`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Invalid request body (bad JSON, unknown task type).
    InvalidRequest,
    /// A calculator input violated its domain.
    InvalidInput,
    /// Division by a zero denominator.
    DivisionByZero,
    /// Expression syntax problem.
    ParseError,
    /// Fixed-point range exceeded.
    NumericOverflow,
    /// Internal server error.
    InternalError,
}

impl ErrorCode {
    /// HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidRequest => 400,
            Self::InvalidInput | Self::DivisionByZero | Self::ParseError | Self::NumericOverflow => {
                422
            }
            Self::InternalError => 500,
        }
    }

    /// Stable reason string.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "INVALID_REQUEST",
            Self::InvalidInput => "INVALID_INPUT",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::ParseError => "PARSE_ERROR",
            Self::NumericOverflow => "NUMERIC_OVERFLOW",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.reason())
    }
}

/// Syntax problems found while tokenizing or evaluating an arithmetic expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Expression contained nothing to evaluate.
    #[error("expression is empty")]
    Empty,
    /// A character outside digits, `.`, whitespace and `+ - * / ( )`.
    #[error("unknown character '{ch}' at position {position}")]
    UnknownCharacter {
        /// The offending character.
        ch: char,
        /// Zero-based character offset.
        position: usize,
    },
    /// A run of digits and dots that is not a number (e.g. `1.2.3`).
    #[error("malformed number '{text}' at position {position}")]
    MalformedNumber {
        /// The raw number run.
        text: String,
        /// Zero-based character offset of the run.
        position: usize,
    },
    /// Unbalanced `(` or `)`.
    #[error("mismatched parentheses")]
    MismatchedParentheses,
    /// A token where an operand or operator of the other kind was required.
    #[error("unexpected '{token}' at position {position}")]
    UnexpectedToken {
        /// Token text.
        token: String,
        /// Zero-based character offset.
        position: usize,
    },
    /// Expression ended while an operand was still expected.
    #[error("expression ended while an operand was expected")]
    MissingOperand,
}

/// Errors raised by the math engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// A required field is missing, non-positive or out of its domain.
    #[error("invalid input for '{field}': {reason}")]
    InvalidInput {
        /// Field name as it appears in the JSON input.
        field: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// A ratio or fixed-point division had a zero denominator.
    #[error("division by zero in {context}")]
    DivisionByZero {
        /// Where the division happened.
        context: &'static str,
    },

    /// An arithmetic expression had a syntax problem.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A fixed-point value exceeded its representable range.
    #[error("numeric overflow in {operation}")]
    Overflow {
        /// Operation that overflowed.
        operation: &'static str,
    },
}

impl MathError {
    /// Shorthand for a non-positive field.
    #[must_use]
    pub fn not_positive(field: &'static str, value: f64) -> Self {
        Self::InvalidInput {
            field,
            reason: format!("must be a finite number greater than 0, got {value}"),
        }
    }

    /// The API error code for this error.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { .. } => ErrorCode::InvalidInput,
            Self::DivisionByZero { .. } => ErrorCode::DivisionByZero,
            Self::Parse(_) => ErrorCode::ParseError,
            Self::Overflow { .. } => ErrorCode::NumericOverflow,
        }
    }

    /// Key/value context for API clients.
    #[must_use]
    pub fn context(&self) -> Vec<(String, String)> {
        match self {
            Self::InvalidInput { field, .. } => vec![("field".to_string(), (*field).to_string())],
            Self::DivisionByZero { context } => {
                vec![("context".to_string(), (*context).to_string())]
            }
            Self::Parse(ParseError::UnknownCharacter { position, .. })
            | Self::Parse(ParseError::MalformedNumber { position, .. })
            | Self::Parse(ParseError::UnexpectedToken { position, .. }) => {
                vec![("position".to_string(), position.to_string())]
            }
            Self::Parse(_) => Vec::new(),
            Self::Overflow { operation } => {
                vec![("operation".to_string(), (*operation).to_string())]
            }
        }
    }

    /// Convert to an HTTP-compatible error body.
    #[must_use]
    pub fn to_http_response(&self) -> HttpErrorResponse {
        HttpErrorResponse::new(self.code(), self.to_string(), self.context())
    }
}

/// Failure body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpErrorResponse {
    /// Always `false`.
    pub ok: bool,
    /// Human-readable message.
    pub error: String,
    /// Error code string.
    pub code: String,
    /// Additional details.
    pub details: HashMap<String, String>,
}

impl HttpErrorResponse {
    /// Build a failure body.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>, context: Vec<(String, String)>) -> Self {
        Self {
            ok: false,
            error: message.into(),
            code: code.reason().to_string(),
            details: context.into_iter().collect(),
        }
    }
}
