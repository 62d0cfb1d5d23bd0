//! conftree - A strict, deterministic configuration schema tree
//!
//! Validates and normalizes hierarchical configuration data (nested
//! mappings, sequences and scalars) against a declaratively built schema
//! tree, producing a normalized value or a path-annotated failure.
//!
//! Phase 0: in-memory values only; no file loading, no serialization format.

pub mod schema;
pub mod validation;
