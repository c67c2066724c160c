//! Typed operations flowing through the pipeline, and their outcomes.

use calcweb_core::{CalcError, OperandPair, Operator};

/// Context carried with every operation through the pipeline.
#[derive(Debug, Clone)]
pub struct OperationContext {
    /// Process-unique, monotonically increasing call identifier.
    pub call_id: u64,
    /// `x-request-id` of the HTTP request that produced this operation.
    pub request_id: Option<String>,
}

impl OperationContext {
    #[must_use]
    pub fn new(call_id: u64) -> Self {
        Self {
            call_id,
            request_id: None,
        }
    }
}

/// A validated calculation ready for dispatch.
#[derive(Debug, Clone)]
pub struct Operation {
    pub ctx: OperationContext,
    pub operator: Operator,
    pub operands: OperandPair,
}

impl Operation {
    #[must_use]
    pub fn ctx(&self) -> &OperationContext {
        &self.ctx
    }
}

/// Successful response from the arithmetic service.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationResponse {
    pub call_id: u64,
    pub operator: Operator,
    pub value: f64,
}

/// Errors returned by the operation pipeline.
#[derive(Debug, thiserror::Error)]
pub enum OperationError {
    #[error(transparent)]
    Calc(#[from] CalcError),
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
