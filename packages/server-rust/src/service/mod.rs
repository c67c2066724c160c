//! Operation classification and execution.
//!
//! This module implements the request-to-result path:
//!
//! 1. **Classification** (`classify`): request body -> `Result<Operation, ValidationError>`
//! 2. **Middleware** (`middleware`): the metrics layer and pipeline composition
//! 3. **Domain service** (`domain`): evaluates the operation with a `Calculator`
//! 4. **Observer** (`observer`): turns calculation events into log records

pub mod classify;
pub mod domain;
pub mod middleware;
pub mod observer;
pub mod operation;

pub use classify::RequestClassifier;
pub use domain::ArithmeticService;
pub use middleware::{build_operation_pipeline, OperationPipeline};
pub use observer::TracingObserver;
pub use operation::{Operation, OperationContext, OperationError, OperationResponse};
