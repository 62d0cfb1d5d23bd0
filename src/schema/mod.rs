//! Configuration schema subsystem
//!
//! A schema is a tree of nodes, each declaring allowed primitive types,
//! child nodes, a default value, requiredness and an ordered validation
//! chain. Processing a candidate value flows depth-first, pre-order for
//! per-node validation and type checking, producing a new normalized value
//! bottom-up; the root then runs its deferred post-validations over the
//! fully normalized result.
//!
//! # Design principles
//!
//! - Fail-fast: the first failure unwinds with the full path to the fault
//! - Single-owner tree: a node attaches to exactly one parent, once
//! - Construction bugs fail at build time, never inside `process`
//! - Deterministic: output is a pure function of input plus tree shape

mod errors;
mod node;
mod processor;
mod tree;
mod types;

pub use errors::{ProcessError, ProcessResult, SchemaError, SchemaResult, Severity};
pub use node::Node;
pub use processor::Outcome;
pub use tree::{NodeId, SchemaTree};
pub use types::{type_name, TypeSet, ValueType};
