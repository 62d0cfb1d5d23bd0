//! Allowed-value-set validation

use serde_json::Value;

use super::{Validation, Verdict};
use crate::schema::{ProcessError, ProcessResult};

/// Validates a value against a fixed list of permitted values.
///
/// Membership is structural value equality; on failure the error reports the
/// rejected value and the permitted set.
pub struct AllowedValues {
    values: Vec<Value>,
}

impl AllowedValues {
    /// Creates the validation with its permitted values.
    pub fn new(values: impl Into<Vec<Value>>) -> Self {
        Self {
            values: values.into(),
        }
    }
}

impl Validation for AllowedValues {
    fn validate(&self, value: Value) -> ProcessResult<Verdict> {
        if self.values.contains(&value) {
            return Ok(Verdict::Value(value));
        }

        let allowed = self
            .values
            .iter()
            .map(Value::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        Err(ProcessError::InvalidValue {
            value,
            context: format!("allowed values are [{}]", allowed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_member_passes_through() {
        let validation = AllowedValues::new(vec![json!("a"), json!("b")]);
        assert_eq!(
            validation.validate(json!("a")).unwrap(),
            Verdict::Value(json!("a"))
        );
    }

    #[test]
    fn test_non_member_rejected_with_set() {
        let validation = AllowedValues::new(vec![json!(1), json!(2)]);
        let err = validation.validate(json!(12)).unwrap_err();
        assert_eq!(err.code(), "CONF_INVALID_VALUE");
        let msg = err.to_string();
        assert!(msg.contains("12"));
        assert!(msg.contains("allowed values are [1, 2]"));
    }

    #[test]
    fn test_structured_values_compare_structurally() {
        let validation = AllowedValues::new(vec![json!({"a": 1})]);
        assert_eq!(
            validation.validate(json!({"a": 1})).unwrap(),
            Verdict::Value(json!({"a": 1}))
        );
        assert!(validation.validate(json!({"a": 2})).is_err());
    }
}
