use serde::{Deserialize, Serialize};

/// The two operands of a single calculation.
///
/// Built from request input, consumed by exactly one operation, then dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OperandPair {
    /// Left-hand operand (dividend, minuend).
    pub a: f64,
    /// Right-hand operand (divisor, subtrahend).
    pub b: f64,
}

impl OperandPair {
    #[must_use]
    pub fn new(a: f64, b: f64) -> Self {
        Self { a, b }
    }
}

impl From<(f64, f64)> for OperandPair {
    fn from((a, b): (f64, f64)) -> Self {
        Self { a, b }
    }
}
