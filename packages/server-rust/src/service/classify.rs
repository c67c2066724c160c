//! Request classification: turns a raw request body into a typed `Operation`.

use std::sync::atomic::{AtomicU64, Ordering};

use calcweb_core::{parse_operands, Operator, ValidationError};

use super::operation::{Operation, OperationContext};

/// Validates request bodies and wraps them into `Operation` values.
///
/// Each successful classification receives a fresh call ID. Bodies that
/// fail validation never reach the pipeline.
#[derive(Debug)]
pub struct RequestClassifier {
    call_id_counter: AtomicU64,
}

impl RequestClassifier {
    #[must_use]
    pub fn new() -> Self {
        Self {
            call_id_counter: AtomicU64::new(1),
        }
    }

    fn next_call_id(&self) -> u64 {
        self.call_id_counter.fetch_add(1, Ordering::Relaxed)
    }

    /// Number of operations classified so far.
    #[must_use]
    pub fn classified_count(&self) -> u64 {
        self.call_id_counter.load(Ordering::Relaxed) - 1
    }

    /// Classify a request body for `operator` into an `Operation`.
    ///
    /// # Errors
    ///
    /// Returns the `ValidationError` produced by operand parsing.
    pub fn classify(
        &self,
        operator: Operator,
        body: &[u8],
        request_id: Option<String>,
    ) -> Result<Operation, ValidationError> {
        let operands = parse_operands(body)?;
        let mut ctx = OperationContext::new(self.next_call_id());
        ctx.request_id = request_id;
        Ok(Operation {
            ctx,
            operator,
            operands,
        })
    }
}

impl Default for RequestClassifier {
    fn default() -> Self {
        Self::new()
    }
}
