//! Operator dispatch with an optional structured-event sink.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::error::CalcError;
use crate::event::{EventOutcome, OperationEvent};
use crate::operations::Operator;
use crate::traits::OperationObserver;
use crate::types::OperandPair;

/// Stateless calculator. Cloning is cheap; the observer is shared.
#[derive(Clone, Default)]
pub struct Calculator {
    observer: Option<Arc<dyn OperationObserver>>,
}

impl Calculator {
    /// A calculator that emits no events.
    #[must_use]
    pub fn new() -> Self {
        Self { observer: None }
    }

    /// A calculator that reports every call to `observer`.
    #[must_use]
    pub fn with_observer(observer: Arc<dyn OperationObserver>) -> Self {
        Self {
            observer: Some(observer),
        }
    }

    #[must_use]
    pub fn has_observer(&self) -> bool {
        self.observer.is_some()
    }

    /// Runs `operator` over `operands`, then notifies the observer if any.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::DivisionByZero`] for a zero divisor.
    pub fn calculate(&self, operator: Operator, operands: OperandPair) -> Result<f64, CalcError> {
        let start = Instant::now();
        let result = operator.apply(operands.a, operands.b);

        if let Some(observer) = &self.observer {
            let outcome = match &result {
                Ok(value) => EventOutcome::Result(*value),
                Err(err) => EventOutcome::Error(err.to_string()),
            };
            let duration_micros = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
            observer.on_operation(&OperationEvent::new(
                operator,
                operands,
                outcome,
                duration_micros,
            ));
        }

        result
    }
}

impl fmt::Debug for Calculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Calculator")
            .field("observer", &self.observer.is_some())
            .finish()
    }
}
