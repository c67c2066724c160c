//! OpenAPI document for the calculator endpoints, served at `/openapi.json`.

use axum::Json;
use utoipa::OpenApi;

use super::calculate::{self, CalculationRequest, CalculationResponse};
use crate::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(title = "calcweb", description = "Four-function calculator over HTTP"),
    paths(
        calculate::add_handler,
        calculate::subtract_handler,
        calculate::multiply_handler,
        calculate::divide_handler,
    ),
    components(schemas(CalculationRequest, CalculationResponse, ErrorResponse)),
    tags(
        (name = "calculator", description = "Arithmetic on two numbers")
    )
)]
pub struct ApiDoc;

pub async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
