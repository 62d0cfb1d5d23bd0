//! Deactivation toggle validation

use serde_json::Value;

use super::{Validation, Verdict};
use crate::schema::ProcessResult;

/// Drops the key entirely when the value is exactly the boolean `false`.
///
/// Any other value passes through unchanged. The removal is a control
/// signal, not an error.
#[derive(Default)]
pub struct IsDisableable;

impl IsDisableable {
    /// Creates the toggle.
    pub fn new() -> Self {
        Self
    }
}

impl Validation for IsDisableable {
    fn validate(&self, value: Value) -> ProcessResult<Verdict> {
        if value == Value::Bool(false) {
            return Ok(Verdict::Remove);
        }

        Ok(Verdict::Value(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_false_removes() {
        assert_eq!(
            IsDisableable::new().validate(json!(false)).unwrap(),
            Verdict::Remove
        );
    }

    #[test]
    fn test_everything_else_passes_through() {
        assert_eq!(
            IsDisableable::new().validate(json!("content")).unwrap(),
            Verdict::Value(json!("content"))
        );
        assert_eq!(
            IsDisableable::new().validate(json!(true)).unwrap(),
            Verdict::Value(json!(true))
        );
    }
}
