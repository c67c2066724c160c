//! HTTP error mapping for calculation endpoints.
//!
//! Every failure leaves the server as `{"error": "<message>"}`. Client
//! mistakes (bad operands, division by zero) are 400; anything else is a
//! 500 whose body never includes internals.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use calcweb_core::{CalcError, ValidationError};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::OperationError;

/// Body returned for every failed calculation.
const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

/// Error payload shared by all calculation endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable description of the failure.
    #[schema(example = "Cannot divide by zero!")]
    pub error: String,
}

/// Failure of a calculation request, convertible into an HTTP response.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Operation(#[from] OperationError),
}

impl ApiError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Operation(OperationError::Calc(err)) if err.is_client_error() => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Operation(OperationError::Calc(_) | OperationError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message safe to show the caller.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Validation(err) => err.to_string(),
            ApiError::Operation(
                OperationError::Calc(CalcError::Unexpected(_)) | OperationError::Internal(_),
            ) => INTERNAL_ERROR_MESSAGE.to_string(),
            ApiError::Operation(err) => err.to_string(),
        }
    }

    #[must_use]
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: self.public_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
