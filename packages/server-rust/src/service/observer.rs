//! Observer that forwards calculation events to `tracing`.

use calcweb_core::{EventOutcome, OperationEvent, OperationObserver};
use tracing::{error, info};

/// Emits one structured `tracing` record per calculation.
///
/// Successes log at `INFO`, failures at `ERROR`, both under the
/// `calcweb::operations` target so they can be filtered independently of
/// request logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl OperationObserver for TracingObserver {
    fn on_operation(&self, event: &OperationEvent) {
        let operation = event.operator.as_str();
        match &event.outcome {
            EventOutcome::Result(result) => info!(
                target: "calcweb::operations",
                operation,
                operand_a = event.a,
                operand_b = event.b,
                result = *result,
                timestamp_ms = event.timestamp_ms,
                duration_us = event.duration_micros,
                "Operation completed: {} {} {} = {}",
                event.a,
                event.operator.symbol(),
                event.b,
                result,
            ),
            EventOutcome::Error(message) => error!(
                target: "calcweb::operations",
                operation,
                operand_a = event.a,
                operand_b = event.b,
                error = %message,
                timestamp_ms = event.timestamp_ms,
                "Operation failed: {operation} - {message}",
            ),
        }
    }
}
