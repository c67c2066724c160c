//! HTTP handler definitions for the calcweb server.
//!
//! This module defines `AppState` (the shared state carried through axum
//! extractors) and re-exports all handler functions for convenient access
//! when building the router.

pub mod calculate;
pub mod health;
pub mod homepage;
pub mod openapi;

pub use calculate::{
    add_handler, divide_handler, multiply_handler, subtract_handler, CalculationRequest,
    CalculationResponse,
};
pub use health::{health_handler, liveness_handler, readiness_handler};
pub use homepage::homepage_handler;
pub use openapi::{openapi_handler, ApiDoc};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::service::{OperationPipeline, RequestClassifier};

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Load-shed, timed, instrumented arithmetic service.
    pub pipeline: OperationPipeline,
    /// Turns request bodies into typed operations.
    pub classifier: Arc<RequestClassifier>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
