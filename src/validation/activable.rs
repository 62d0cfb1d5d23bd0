//! Activation toggle validation

use serde_json::Value;

use super::{Validation, Verdict};
use crate::schema::ProcessResult;

/// Expands the boolean `true` into a preconfigured replacement value.
///
/// Lets a boolean flag in the tree activate a richer default payload; any
/// other value passes through unchanged.
pub struct IsActivable {
    value: Value,
}

impl IsActivable {
    /// Creates the toggle with the value substituted on activation.
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

impl Validation for IsActivable {
    fn validate(&self, value: Value) -> ProcessResult<Verdict> {
        if value == Value::Bool(true) {
            return Ok(Verdict::Value(self.value.clone()));
        }

        Ok(Verdict::Value(value))
    }
}
