//! Operand validation for request bodies.
//!
//! A request body must be a JSON object carrying numeric `a` and `b` fields.
//! A field may be a JSON number or a string holding one (`"5"`, `" 2.5 "`).
//! Every failing field is reported, not just the first one, so a body of `{}`
//! produces `"a: field required; b: field required"`.

use std::fmt;

use serde_json::Value;

use crate::types::OperandPair;

/// Names of the operand fields, in reporting order.
pub const OPERAND_FIELDS: [&str; 2] = ["a", "b"];

/// Pseudo-field used when the body as a whole is unusable.
pub const BODY_FIELD: &str = "body";

/// What was wrong with a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field was absent.
    Missing,
    /// The field was present but neither a number nor a numeric string.
    NotANumber,
    /// The body could not be read as a JSON object.
    MalformedBody(String),
}

impl fmt::Display for FieldProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldProblem::Missing => f.write_str("field required"),
            FieldProblem::NotANumber => f.write_str("value is not a valid number"),
            FieldProblem::MalformedBody(detail) => f.write_str(detail),
        }
    }
}

/// A single field-qualified validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub problem: FieldProblem,
}

impl FieldError {
    pub fn new(field: impl Into<String>, problem: FieldProblem) -> Self {
        Self {
            field: field.into(),
            problem,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// One or more field failures. Displays as `"<field>: <problem>"` pairs
/// joined with `"; "`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    errors: Vec<FieldError>,
}

impl ValidationError {
    #[must_use]
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    fn body(problem: FieldProblem) -> Self {
        Self::new(vec![FieldError::new(BODY_FIELD, problem)])
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Names of the offending fields, in reporting order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Parses a raw request body into an [`OperandPair`].
///
/// # Errors
///
/// Returns a [`ValidationError`] when the body is empty, is not valid JSON,
/// is not a JSON object, or when either operand is missing or non-numeric.
pub fn parse_operands(body: &[u8]) -> Result<OperandPair, ValidationError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ValidationError::body(FieldProblem::Missing));
    }
    let value: Value = serde_json::from_slice(body).map_err(|e| {
        ValidationError::body(FieldProblem::MalformedBody(format!(
            "invalid JSON at line {} column {}",
            e.line(),
            e.column()
        )))
    })?;
    validate_operands(&value)
}

/// Validates an already-decoded JSON value as an operand object.
///
/// JSON numbers and numeric strings (`"5"`, surrounding whitespace allowed)
/// are accepted. Other strings, booleans and `null` are rejected. Unknown
/// extra fields are ignored.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every missing or non-numeric operand,
/// or a single `body` entry when `value` is not an object.
pub fn validate_operands(value: &Value) -> Result<OperandPair, ValidationError> {
    let Some(object) = value.as_object() else {
        return Err(ValidationError::body(FieldProblem::MalformedBody(
            "expected a JSON object with numeric fields a and b".to_string(),
        )));
    };

    let mut errors = Vec::new();
    let mut operands = [0.0_f64; 2];

    for (slot, field) in operands.iter_mut().zip(OPERAND_FIELDS) {
        match object.get(field).map(numeric_value) {
            None => errors.push(FieldError::new(field, FieldProblem::Missing)),
            Some(Some(v)) => *slot = v,
            Some(None) => errors.push(FieldError::new(field, FieldProblem::NotANumber)),
        }
    }

    if errors.is_empty() {
        Ok(OperandPair::new(operands[0], operands[1]))
    } else {
        Err(ValidationError::new(errors))
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // --- Accepted operands ---

    #[test]
    fn accepts_integers_and_floats() {
        let pair = validate_operands(&json!({"a": 10, "b": 2.5})).unwrap();
        assert_eq!(pair, OperandPair::new(10.0, 2.5));

        let pair = validate_operands(&json!({"a": -3, "b": -0.0})).unwrap();
        assert_eq!(pair.a, -3.0);
        assert!(pair.b == 0.0 && pair.b.is_sign_negative());
    }

    #[test]
    fn large_integers_convert_to_f64() {
        let pair = validate_operands(&json!({"a": 1_000_000_000_000_i64, "b": u64::MAX})).unwrap();
        assert_eq!(pair.a, 1e12);
        assert!(pair.b > 1.8e19);
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let pair = validate_operands(&json!({"a": "5", "b": " 2.5 "})).unwrap();
        assert_eq!(pair, OperandPair::new(5.0, 2.5));

        let pair = validate_operands(&json!({"a": "-1e3", "b": "0"})).unwrap();
        assert_eq!(pair, OperandPair::new(-1000.0, 0.0));
    }

    // --- Rejected operands ---

    #[test]
    fn string_operand_is_rejected_by_field() {
        let err = validate_operands(&json!({"a": "x", "b": 5})).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(err.to_string(), "a: value is not a valid number");
    }

    #[test]
    fn text_booleans_and_null_are_not_numbers() {
        for bad in [
            json!("x"),
            json!(""),
            json!("5 apples"),
            json!(true),
            json!(null),
            json!([1]),
            json!({"v": 1}),
        ] {
            let err = validate_operands(&json!({"a": 1, "b": bad})).unwrap_err();
            assert_eq!(
                err.errors(),
                &[FieldError::new("b", FieldProblem::NotANumber)]
            );
        }
    }

    #[test]
    fn reports_every_failing_field() {
        let err = validate_operands(&json!({})).unwrap_err();
        assert_eq!(err.to_string(), "a: field required; b: field required");

        let err = validate_operands(&json!({"a": "one", "b": "two"})).unwrap_err();
        assert_eq!(
            err.to_string(),
            "a: value is not a valid number; b: value is not a valid number"
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let pair = validate_operands(&json!({"a": 1, "b": 2, "op": "add"})).unwrap();
        assert_eq!(pair, OperandPair::new(1.0, 2.0));
    }

    #[test]
    fn non_object_body_is_a_body_error() {
        let err = validate_operands(&json!([1, 2])).unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec![BODY_FIELD]);
        assert!(err.to_string().starts_with("body: expected a JSON object"));
    }

    // --- Raw bodies ---

    #[test]
    fn parse_operands_from_bytes() {
        let pair = parse_operands(br#"{"a": 6, "b": 3}"#).unwrap();
        assert_eq!(pair, OperandPair::new(6.0, 3.0));
    }

    #[test]
    fn parse_operands_empty_body() {
        let err = parse_operands(b"  ").unwrap_err();
        assert_eq!(err.to_string(), "body: field required");
    }

    #[test]
    fn parse_operands_malformed_json() {
        let err = parse_operands(b"{\"a\": 1,").unwrap_err();
        assert_eq!(err.fields().collect::<Vec<_>>(), vec![BODY_FIELD]);
        assert!(err.to_string().starts_with("body: invalid JSON at line 1"));
    }
}
