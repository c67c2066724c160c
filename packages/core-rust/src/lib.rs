//! `calcweb` core: arithmetic operations, operand validation, and operation events.

pub mod calculator;
pub mod error;
pub mod event;
pub mod operations;
pub mod traits;
pub mod types;
pub mod validation;

pub use calculator::Calculator;
pub use error::{CalcError, ErrorKind, DIVISION_BY_ZERO_MESSAGE};
pub use event::{EventOutcome, OperationEvent};
pub use operations::{add, divide, multiply, subtract, Operator, UnknownOperator};
pub use traits::OperationObserver;
pub use types::OperandPair;
pub use validation::{
    parse_operands, validate_operands, FieldError, FieldProblem, ValidationError,
};
