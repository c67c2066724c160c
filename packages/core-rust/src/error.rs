//! Error taxonomy shared by the operation layer and the request layer.

use crate::validation::ValidationError;

/// Message returned verbatim for any division whose divisor is zero.
pub const DIVISION_BY_ZERO_MESSAGE: &str = "Cannot divide by zero!";

/// Every way a calculation can fail.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    /// Request input did not satisfy the numeric-field contract.
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// Divisor was `0.0` or `-0.0`.
    #[error("Cannot divide by zero!")]
    DivisionByZero,
    /// Any other failure during dispatch.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Discriminant of [`CalcError`], used for status mapping and event fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    DivisionByZero,
    Unexpected,
}

impl ErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::DivisionByZero => "division_by_zero",
            ErrorKind::Unexpected => "unexpected",
        }
    }
}

impl CalcError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::Validation(_) => ErrorKind::Validation,
            CalcError::DivisionByZero => ErrorKind::DivisionByZero,
            CalcError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }

    /// Whether the caller is at fault (invalid operands or a zero divisor).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        !matches!(self, CalcError::Unexpected(_))
    }
}
