use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::operations::Operator;
use crate::types::OperandPair;

/// Structured record of one finished calculation, handed to an
/// [`OperationObserver`](crate::traits::OperationObserver).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationEvent {
    pub operator: Operator,
    pub a: f64,
    pub b: f64,
    pub outcome: EventOutcome,
    /// Wall-clock completion time, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
    /// Time spent inside the operation.
    pub duration_micros: u64,
}

/// Result of the calculation as recorded in an [`OperationEvent`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventOutcome {
    Result(f64),
    Error(String),
}

impl OperationEvent {
    #[must_use]
    pub fn new(
        operator: Operator,
        operands: OperandPair,
        outcome: EventOutcome,
        duration_micros: u64,
    ) -> Self {
        Self {
            operator,
            a: operands.a,
            b: operands.b,
            outcome,
            timestamp_ms: now_millis(),
            duration_micros,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, EventOutcome::Result(_))
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
