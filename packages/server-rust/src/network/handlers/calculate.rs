//! Arithmetic endpoints: `POST /add`, `/subtract`, `/multiply`, `/divide`.
//!
//! The body is read as raw bytes and parsed by `RequestClassifier` so that
//! every operand problem is reported in a single `{"error": ...}` response
//! instead of axum's default `Json` rejection text.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use bytes::Bytes;
use calcweb_core::Operator;
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tracing::{error, warn};
use utoipa::ToSchema;

use super::AppState;
use crate::error::{ApiError, ErrorResponse};
use crate::network::middleware::REQUEST_ID_HEADER;

/// Operands accepted by every calculation endpoint.
///
/// Numeric strings such as `"5"` are accepted as well as JSON numbers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationRequest {
    /// Left operand.
    #[schema(example = 10.0)]
    pub a: f64,
    /// Right operand.
    #[schema(example = 5.0)]
    pub b: f64,
}

/// Successful calculation.
///
/// Non-finite results (`inf`, `NaN`) serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CalculationResponse {
    #[schema(example = 15.0)]
    pub result: f64,
}

#[utoipa::path(
    post,
    path = "/add",
    tag = "calculator",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Sum of a and b", body = CalculationResponse),
        (status = 400, description = "Invalid operands", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    )
)]
pub async fn add_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CalculationResponse>, ApiError> {
    calculate(&state, Operator::Add, &headers, &body).await
}

#[utoipa::path(
    post,
    path = "/subtract",
    tag = "calculator",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Difference a - b", body = CalculationResponse),
        (status = 400, description = "Invalid operands", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    )
)]
pub async fn subtract_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CalculationResponse>, ApiError> {
    calculate(&state, Operator::Subtract, &headers, &body).await
}

#[utoipa::path(
    post,
    path = "/multiply",
    tag = "calculator",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Product of a and b", body = CalculationResponse),
        (status = 400, description = "Invalid operands", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    )
)]
pub async fn multiply_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CalculationResponse>, ApiError> {
    calculate(&state, Operator::Multiply, &headers, &body).await
}

/// Divides `a` by `b`. A zero divisor (either sign) is a 400.
#[utoipa::path(
    post,
    path = "/divide",
    tag = "calculator",
    request_body = CalculationRequest,
    responses(
        (status = 200, description = "Quotient a / b", body = CalculationResponse),
        (status = 400, description = "Invalid operands or division by zero", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    )
)]
pub async fn divide_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<CalculationResponse>, ApiError> {
    calculate(&state, Operator::Divide, &headers, &body).await
}

async fn calculate(
    state: &AppState,
    operator: Operator,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Json<CalculationResponse>, ApiError> {
    let _guard = state.shutdown.in_flight_guard();

    let request_id = headers
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);

    let outcome = match state.classifier.classify(operator, body, request_id) {
        Ok(op) => state
            .pipeline
            .clone()
            .oneshot(op)
            .await
            .map(|resp| CalculationResponse { result: resp.value })
            .map_err(ApiError::from),
        Err(e) => Err(ApiError::from(e)),
    };

    match outcome {
        Ok(resp) => Ok(Json(resp)),
        Err(err) => {
            let path = format!("/{}", operator.as_str());
            if err.is_server_error() {
                error!(path = %path, status = err.status_code().as_u16(), error = %err, "request failed");
            } else {
                warn!(path = %path, status = err.status_code().as_u16(), error = %err, "request rejected");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Instant;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use axum::Router;
    use serde_json::{json, Value};

    use super::*;
    use crate::network::ShutdownController;
    use crate::service::{build_operation_pipeline, ArithmeticService, RequestClassifier};

    fn test_state() -> AppState {
        AppState {
            pipeline: build_operation_pipeline(ArithmeticService::default()),
            classifier: Arc::new(RequestClassifier::new()),
            shutdown: Arc::new(ShutdownController::new()),
            start_time: Instant::now(),
        }
    }

    fn app() -> Router {
        Router::new()
            .route("/add", post(add_handler))
            .route("/subtract", post(subtract_handler))
            .route("/multiply", post(multiply_handler))
            .route("/divide", post(divide_handler))
            .with_state(test_state())
    }

    async fn post_raw(app: Router, path: &str, body: impl Into<Body>) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(body.into())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_json(app: Router, path: &str, body: &Value) -> (StatusCode, Value) {
        post_raw(app, path, body.to_string()).await
    }

    // --- Successful calculations ---

    #[tokio::test]
    async fn add_returns_sum() {
        let (status, json) = post_json(app(), "/add", &json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"result": 15.0}));
    }

    #[tokio::test]
    async fn subtract_returns_difference() {
        let (status, json) = post_json(app(), "/subtract", &json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 5.0);
    }

    #[tokio::test]
    async fn multiply_returns_product() {
        let (status, json) = post_json(app(), "/multiply", &json!({"a": 10, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 50.0);
    }

    #[tokio::test]
    async fn divide_returns_quotient() {
        let (status, json) = post_json(app(), "/divide", &json!({"a": 6, "b": 3})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 2.0);

        let (status, json) = post_json(app(), "/divide", &json!({"a": 1, "b": 4})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 0.25);
    }

    #[tokio::test]
    async fn numeric_strings_are_coerced() {
        let (status, json) = post_json(app(), "/add", &json!({"a": "5", "b": 3})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, json!({"result": 8.0}));

        let (status, json) = post_json(app(), "/divide", &json!({"a": "7.5", "b": " 2.5 "})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 3.0);
    }

    // --- Rejections ---

    #[tokio::test]
    async fn divide_by_any_zero_is_rejected() {
        for b in [json!(0), json!(0.0), json!(-0.0)] {
            let (status, json) = post_json(app(), "/divide", &json!({"a": 10, "b": b})).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "b = {b}");
            assert_eq!(json, json!({"error": "Cannot divide by zero!"}));
        }

        let (status, json) = post_json(app(), "/divide", &json!({"a": 10, "b": "0"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Cannot divide by zero!");
    }

    #[tokio::test]
    async fn zero_dividend_is_fine() {
        let (status, json) = post_json(app(), "/divide", &json!({"a": 0, "b": 5})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"], 0.0);
    }

    #[tokio::test]
    async fn non_numeric_operand_is_rejected() {
        let (status, json) = post_json(app(), "/add", &json!({"a": "x", "b": 5})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({"error": "a: value is not a valid number"}));
    }

    #[tokio::test]
    async fn every_field_problem_is_reported() {
        let (status, json) = post_json(app(), "/multiply", &json!({"a": true})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            json["error"],
            "a: value is not a valid number; b: field required"
        );
    }

    #[tokio::test]
    async fn malformed_body_is_rejected() {
        let (status, json) = post_raw(app(), "/subtract", "{not json").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let message = json["error"].as_str().unwrap();
        assert!(message.starts_with("body: invalid JSON"), "{message}");

        let (status, json) = post_raw(app(), "/subtract", Body::empty()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "body: field required");
    }

    #[tokio::test]
    async fn overflow_serializes_as_null() {
        let (status, json) =
            post_json(app(), "/multiply", &json!({"a": 1e308, "b": 10})).await;
        assert_eq!(status, StatusCode::OK);
        assert!(json["result"].is_null());
    }

    #[tokio::test]
    async fn in_flight_guard_is_released() {
        let state = test_state();
        let shutdown = Arc::clone(&state.shutdown);
        let app = Router::new()
            .route("/add", post(add_handler))
            .with_state(state);

        let (status, _) = post_json(app, "/add", &json!({"a": 1, "b": 2})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(shutdown.in_flight_count(), 0);
    }
}
