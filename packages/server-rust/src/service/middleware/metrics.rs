//! Metrics middleware for operations.
//!
//! Records operation duration and outcome on a `tracing` span per call.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use tower::{Layer, Service};
use tracing::{info_span, Instrument};

use crate::service::operation::{Operation, OperationError, OperationResponse};

/// Tower layer that instruments operations with timing via `tracing` spans.
#[derive(Debug, Clone)]
pub struct MetricsLayer;

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

/// Service wrapper that records operation duration and outcome.
#[derive(Debug, Clone)]
pub struct MetricsService<S> {
    inner: S,
}

/// Short label for the outcome of a pipeline pass.
fn outcome_label(result: &Result<OperationResponse, OperationError>) -> &'static str {
    match result {
        Ok(_) => "ok",
        Err(OperationError::Calc(err)) => err.kind().as_str(),
        Err(OperationError::Internal(_)) => "internal",
    }
}

impl<S> Service<Operation> for MetricsService<S>
where
    S: Service<Operation, Response = OperationResponse, Error = OperationError> + Send,
    S::Future: Send + 'static,
{
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let operator = op.operator.as_str();
        let call_id = op.ctx().call_id;

        let span = info_span!(
            "operation",
            operator = operator,
            call_id = call_id,
            request_id = op.ctx().request_id.as_deref().unwrap_or("-"),
            duration_us = tracing::field::Empty,
            outcome = tracing::field::Empty,
        );

        let fut = self.inner.call(op);

        Box::pin(
            async move {
                let start = Instant::now();
                let result = fut.await;
                let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
                let outcome = outcome_label(&result);

                tracing::Span::current().record("duration_us", duration_us);
                tracing::Span::current().record("outcome", outcome);

                tracing::debug!(
                    operator = operator,
                    call_id = call_id,
                    duration_us = duration_us,
                    outcome = outcome,
                    "operation complete"
                );

                result
            }
            .instrument(span),
        )
    }
}
