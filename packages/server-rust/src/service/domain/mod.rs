//! Domain services.
//!
//! Each service implements `tower::Service<Operation>` and sits at the
//! innermost position of the operation pipeline.

pub mod arithmetic;

pub use arithmetic::ArithmeticService;
