//! The four arithmetic operations and the `Operator` that names them.
//!
//! All operations work on IEEE-754 doubles with no rounding, clamping, or
//! overflow checks: `f64::MAX * 2.0` is `inf`, not an error. Only [`divide`]
//! can fail.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::CalcError;

// --- Operator ---

/// One of the four supported arithmetic operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// All operators, in display order.
    pub const ALL: [Operator; 4] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
    ];

    /// Lowercase name used in URLs and structured events (`"add"`, ...).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Add => "add",
            Operator::Subtract => "subtract",
            Operator::Multiply => "multiply",
            Operator::Divide => "divide",
        }
    }

    /// Infix symbol for human-readable log lines.
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Applies this operator to `a` and `b`.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivisionByZero`] for `Divide` when `b` is zero.
    pub fn apply(self, a: f64, b: f64) -> Result<f64, CalcError> {
        match self {
            Operator::Add => Ok(add(a, b)),
            Operator::Subtract => Ok(subtract(a, b)),
            Operator::Multiply => Ok(multiply(a, b)),
            Operator::Divide => divide(a, b),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown operator name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown operator: {0}")]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "add" => Ok(Operator::Add),
            "subtract" => Ok(Operator::Subtract),
            "multiply" => Ok(Operator::Multiply),
            "divide" => Ok(Operator::Divide),
            other => Err(UnknownOperator(other.to_string())),
        }
    }
}

// --- Operations ---

/// Returns `a + b`.
#[must_use]
pub fn add(a: f64, b: f64) -> f64 {
    let result = a + b;
    debug!(a, b, result, "add");
    result
}

/// Returns `a - b`.
#[must_use]
pub fn subtract(a: f64, b: f64) -> f64 {
    let result = a - b;
    debug!(a, b, result, "subtract");
    result
}

/// Returns `a * b`.
#[must_use]
pub fn multiply(a: f64, b: f64) -> f64 {
    let result = a * b;
    debug!(a, b, result, "multiply");
    result
}

/// Returns `a / b`.
///
/// The zero check is exact equality against `0.0`, which also matches `-0.0`.
/// Tiny non-zero divisors are divided normally.
///
/// # Errors
///
/// Returns [`CalcError::DivisionByZero`] when `b == 0.0`.
pub fn divide(a: f64, b: f64) -> Result<f64, CalcError> {
    if b == 0.0 {
        debug!(a, b, "division by zero rejected");
        return Err(CalcError::DivisionByZero);
    }
    let result = a / b;
    debug!(a, b, result, "divide");
    Ok(result)
}
