//! Arithmetic domain service: runs the calculator for each operation.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use calcweb_core::Calculator;
use tower::Service;

use crate::service::operation::{Operation, OperationError, OperationResponse};

/// Tower service that evaluates an `Operation` with a shared `Calculator`.
///
/// The calculation is synchronous and side-effect free apart from the
/// calculator's observer, so the returned future is already complete.
#[derive(Debug, Clone, Default)]
pub struct ArithmeticService {
    calculator: Calculator,
}

impl ArithmeticService {
    #[must_use]
    pub fn new(calculator: Calculator) -> Self {
        Self { calculator }
    }
}

impl Service<Operation> for ArithmeticService {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let call_id = op.ctx.call_id;
        let operator = op.operator;
        let result = self.calculator.calculate(operator, op.operands);
        Box::pin(async move {
            let value = result?;
            Ok(OperationResponse {
                call_id,
                operator,
                value,
            })
        })
    }
}
