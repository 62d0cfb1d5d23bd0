//! Single-type predicate validation

use serde_json::Value;

use super::{Validation, Verdict};
use crate::schema::{type_name, ProcessError, ProcessResult, SchemaResult, ValueType};

/// Validates a value against one named primitive-type predicate.
///
/// The tag is resolved at construction time; an unknown tag name fails there,
/// never at validation time.
#[derive(Debug)]
pub struct IsType {
    expected: ValueType,
}

impl IsType {
    /// Creates the validation from a tag name, e.g. `"string"`.
    pub fn new(tag: &str) -> SchemaResult<Self> {
        Ok(Self {
            expected: ValueType::from_tag(tag)?,
        })
    }

    /// Creates the validation from an already-resolved type.
    pub fn of(expected: ValueType) -> Self {
        Self { expected }
    }
}

impl Validation for IsType {
    fn validate(&self, value: Value) -> ProcessResult<Verdict> {
        if self.expected.matches(&value) {
            return Ok(Verdict::Value(value));
        }

        let context = format!(
            "expected type \"{}\", got \"{}\"",
            self.expected,
            type_name(&value)
        );
        Err(ProcessError::InvalidValue { value, context })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_matching_type_passes_through() {
        let validation = IsType::new("string").unwrap();
        assert_eq!(
            validation.validate(json!("x")).unwrap(),
            Verdict::Value(json!("x"))
        );
    }

    #[test]
    fn test_mismatch_reports_both_types() {
        let validation = IsType::of(ValueType::Int);
        let err = validation.validate(json!("x")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("expected type \"int\""));
        assert!(msg.contains("got \"string\""));
    }

    #[test]
    fn test_unknown_tag_fails_at_construction() {
        let err = IsType::new("resource").unwrap_err();
        assert_eq!(err.code(), "CONF_UNKNOWN_TYPE_TAG");
    }
}
