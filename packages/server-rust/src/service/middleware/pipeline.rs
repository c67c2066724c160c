//! Pipeline composition: wraps the arithmetic service into the boxed service
//! shared by every calculation handler.

use tower::util::BoxCloneSyncService;
use tower::ServiceBuilder;

use super::metrics::MetricsLayer;
use crate::service::domain::ArithmeticService;
use crate::service::operation::{Operation, OperationError, OperationResponse};

/// Type-erased operation pipeline shared through axum state.
pub type OperationPipeline = BoxCloneSyncService<Operation, OperationResponse, OperationError>;

/// Wraps `service` in `MetricsLayer` (timing and outcome span) and boxes it.
#[must_use]
pub fn build_operation_pipeline(service: ArithmeticService) -> OperationPipeline {
    let stack = ServiceBuilder::new().layer(MetricsLayer).service(service);
    BoxCloneSyncService::new(stack)
}

#[cfg(test)]
mod tests {
    use calcweb_core::{CalcError, OperandPair, Operator};
    use tower::ServiceExt;

    use super::*;
    use crate::service::operation::OperationContext;

    fn make_op(operator: Operator, a: f64, b: f64) -> Operation {
        Operation {
            ctx: OperationContext::new(42),
            operator,
            operands: OperandPair::new(a, b),
        }
    }

    #[tokio::test]
    async fn pipeline_routes_through_all_layers() {
        let svc = build_operation_pipeline(ArithmeticService::default());
        let resp = svc
            .oneshot(make_op(Operator::Divide, 6.0, 3.0))
            .await
            .unwrap();
        assert_eq!(resp.call_id, 42);
        assert_eq!(resp.operator, Operator::Divide);
        assert_eq!(resp.value, 2.0);
    }

    #[tokio::test]
    async fn pipeline_surfaces_division_by_zero() {
        let svc = build_operation_pipeline(ArithmeticService::default());
        let err = svc
            .oneshot(make_op(Operator::Divide, 10.0, -0.0))
            .await
            .unwrap_err();
        assert!(matches!(err, OperationError::Calc(CalcError::DivisionByZero)));
    }

    #[tokio::test]
    async fn clones_run_independently() {
        let svc = build_operation_pipeline(ArithmeticService::default());
        let calls: Vec<_> = (0..64_u32)
            .map(|i| {
                let svc = svc.clone();
                let handle = tokio::spawn(async move {
                    svc.oneshot(make_op(Operator::Multiply, f64::from(i), 2.0))
                        .await
                        .unwrap()
                        .value
                });
                (i, handle)
            })
            .collect();
        for (i, handle) in calls {
            assert_eq!(handle.await.unwrap(), f64::from(i) * 2.0);
        }
    }
}
