//! Configuration processing
//!
//! Processing semantics:
//! - Pre-order, single pass: type gate, validation chain, then descent
//! - Fail-fast: the first failure at any node aborts its remaining work and
//!   unwinds as a nested-error chain carrying the full path
//! - Non-error outcomes ("skip", "removed") are tagged results consumed by
//!   the immediate parent, never unwinding control flow
//! - The root runs its deferred post-validations once, after the whole tree
//!   has been normalized
//!
//! Recursion depth is bounded by the schema's own nesting, not user input
//! depth: unknown keys are rejected, not traversed.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::errors::{ProcessError, ProcessResult};
use super::tree::{NodeId, SchemaTree};
use super::types::{type_name, TypeSet};
use crate::validation::Verdict;

/// The outcome of processing one node.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The normalized value
    Value(Value),
    /// The value was legitimately absent and the node optional; the parent
    /// omits the key
    Skip,
    /// A validation strategy instructed the key to be dropped
    Removed,
}

impl Outcome {
    /// Returns the normalized value, or None for a skip/removed outcome.
    pub fn into_value(self) -> Option<Value> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Skip | Outcome::Removed => None,
        }
    }
}

impl SchemaTree {
    /// Processes a candidate configuration against the tree.
    ///
    /// Normalization either fully succeeds or the whole call fails with a
    /// path-annotated error; there is no partial result.
    pub fn process(&self, value: &Value) -> ProcessResult<Outcome> {
        debug!("processing configuration");
        let outcome = self.process_node(self.root(), Some(value), true)?;
        let Outcome::Value(mut value) = outcome else {
            return Ok(outcome);
        };

        // Deferred pass: each post-validation sees the entire normalized
        // tree and may replace it.
        for validation in &self.post_validations {
            value = match validation.validate(value)? {
                Verdict::Value(v) => v,
                Verdict::Remove => return Ok(Outcome::Removed),
            };
        }

        Ok(Outcome::Value(value))
    }

    fn process_node(
        &self,
        id: NodeId,
        value: Option<&Value>,
        as_prototype: bool,
    ) -> ProcessResult<Outcome> {
        let node = &self.nodes[id.0];

        // Type gate. Null is "no value"; a required node reports it against
        // the allowed set, an optional one skips.
        let value = match value {
            Some(v) if !v.is_null() => v,
            _ => {
                if !node.required {
                    return Ok(Outcome::Skip);
                }
                return Err(ProcessError::InvalidType {
                    actual: "null",
                    allowed: TypeSet(node.allowed_types.clone()),
                });
            }
        };
        if !node.allowed_types.iter().any(|ty| ty.matches(value)) {
            return Err(ProcessError::InvalidType {
                actual: type_name(value),
                allowed: TypeSet(node.allowed_types.clone()),
            });
        }

        // Prototype mode: the collection only passes the type gate; the
        // validation chain and child matching apply per entry.
        if node.prototype && as_prototype {
            return self.process_prototype(id, value.clone());
        }

        // Validation chain, in registration order.
        let mut value = value.clone();
        for validation in &node.validations {
            value = match validation.validate(value)? {
                Verdict::Value(v) => v,
                Verdict::Remove => return Ok(Outcome::Removed),
            };
        }

        // Structural descent, only for collection values with declared
        // children. A childless node passes any surviving value through.
        if node.children.is_empty() {
            return Ok(Outcome::Value(value));
        }
        let empty = Map::new();
        let map = match &value {
            Value::Object(map) => map,
            // A sequence carries no declared keys: its indices are unknown
            // keys, and an empty one resolves children like an empty mapping.
            Value::Array(entries) => {
                if !entries.is_empty() {
                    return Err(ProcessError::UnknownKey { key: "0".into() });
                }
                &empty
            }
            _ => return Ok(Outcome::Value(value)),
        };

        // Every present key must name a declared child, before any child
        // is processed.
        for key in map.keys() {
            if node.child(key).is_none() {
                return Err(ProcessError::UnknownKey { key: key.clone() });
            }
        }

        let mut out = Map::new();
        for (key, child_id) in &node.children {
            trace!(%key, "processing child");
            let child = &self.nodes[child_id.0];
            let input = match map.get(key) {
                Some(v) if !v.is_null() => Some(v.clone()),
                _ => match &child.default {
                    Some(default) => Some(default.clone()),
                    None if child.required => {
                        return Err(ProcessError::MissingElement { key: key.clone() })
                    }
                    None => None,
                },
            };

            match self
                .process_node(*child_id, input.as_ref(), true)
                .map_err(|source| ProcessError::Nested {
                    key: key.clone(),
                    source: Box::new(source),
                })? {
                Outcome::Value(v) => {
                    out.insert(key.clone(), v);
                }
                Outcome::Skip | Outcome::Removed => {}
            }
        }

        Ok(Outcome::Value(Value::Object(out)))
    }

    /// Prototype descent: every entry of the collection is independently
    /// processed through this node's own schema, keyed by its original key.
    fn process_prototype(&self, id: NodeId, value: Value) -> ProcessResult<Outcome> {
        match value {
            Value::Object(map) => {
                let mut out = Map::new();
                for (key, entry) in map {
                    let input = (!entry.is_null()).then_some(&entry);
                    match self.process_node(id, input, false).map_err(|source| {
                        ProcessError::Nested {
                            key: key.clone(),
                            source: Box::new(source),
                        }
                    })? {
                        Outcome::Value(v) => {
                            out.insert(key, v);
                        }
                        Outcome::Skip | Outcome::Removed => {}
                    }
                }
                Ok(Outcome::Value(Value::Object(out)))
            }
            Value::Array(entries) => {
                let mut out = Vec::new();
                for (index, entry) in entries.iter().enumerate() {
                    let input = (!entry.is_null()).then_some(entry);
                    match self.process_node(id, input, false).map_err(|source| {
                        ProcessError::Nested {
                            key: index.to_string(),
                            source: Box::new(source),
                        }
                    })? {
                        Outcome::Value(v) => out.push(v),
                        Outcome::Skip | Outcome::Removed => {}
                    }
                }
                Ok(Outcome::Value(Value::Array(out)))
            }
            // The type gate admitted a non-collection (extra allowed type);
            // there is nothing to iterate.
            other => Ok(Outcome::Value(other)),
        }
    }
}
