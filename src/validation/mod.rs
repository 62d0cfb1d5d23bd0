//! Validation strategies
//!
//! A validation is a pluggable unit with one operation: transform or reject
//! a candidate value. Strategies run in registration order per node, before
//! structural descent. Outcomes are explicit verdicts, never unwinding
//! control flow:
//!
//! - `Verdict::Value(v)` — pass, possibly with a replaced value
//! - `Verdict::Remove` — drop the key entirely, not an error
//! - `Err(ProcessError)` — terminal rejection
//!
//! Bare closures with the same signature satisfy the contract.

use serde_json::Value;

use crate::schema::{NodeId, ProcessResult};

mod activable;
mod allowed_values;
mod disableable;
mod is_type;

pub use activable::IsActivable;
pub use allowed_values::AllowedValues;
pub use disableable::IsDisableable;
pub use is_type::IsType;

/// The result of one validation step.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Keep processing with this (possibly replaced) value
    Value(Value),
    /// Drop the key entirely; not an error
    Remove,
}

/// A single value transformation or check in a node's chain.
pub trait Validation {
    /// Validates the value, replacing it, passing it through, removing the
    /// key or rejecting it.
    fn validate(&self, value: Value) -> ProcessResult<Verdict>;
}

impl<F> Validation for F
where
    F: Fn(Value) -> ProcessResult<Verdict>,
{
    fn validate(&self, value: Value) -> ProcessResult<Verdict> {
        self(value)
    }
}

/// A validation deferred until the whole tree has been normalized.
///
/// Post-validations see the entire normalized value, not a single field, and
/// may perform cross-field consistency checks. The origin is bound exactly
/// once, at registration time, so the strategy can report which schema
/// position it came from.
pub trait PostValidation: Validation {
    /// Binds the schema position this validation was registered from.
    fn bind_origin(&mut self, origin: NodeId, path: String);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_closures_are_validations() {
        let double = |value: Value| -> ProcessResult<Verdict> {
            let n = value.as_i64().unwrap_or(0);
            Ok(Verdict::Value(json!(n * 2)))
        };
        assert_eq!(double.validate(json!(21)).unwrap(), Verdict::Value(json!(42)));
    }
}
