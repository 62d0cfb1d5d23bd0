//! Schema error types
//!
//! Two families, split by lifecycle:
//! - `SchemaError` (FATAL): schema-construction bugs, reported at tree-build
//!   time, never deferred to `process`
//! - `ProcessError` (REJECT): a candidate configuration was rejected
//!
//! Error codes:
//! - CONF_UNKNOWN_TYPE_TAG (FATAL)
//! - CONF_CHILDREN_REQUIRE_ARRAY (FATAL)
//! - CONF_ALREADY_ATTACHED (FATAL)
//! - CONF_DUPLICATE_CHILD (FATAL)
//! - CONF_REQUIRED_WITH_DEFAULT (FATAL)
//! - CONF_PROTOTYPE_REQUIRES_ARRAY (FATAL)
//! - CONF_UNKNOWN_NODE (FATAL)
//! - CONF_MISSING_ELEMENT (REJECT)
//! - CONF_INVALID_TYPE (REJECT)
//! - CONF_INVALID_VALUE (REJECT)
//! - CONF_UNKNOWN_KEY (REJECT)
//! - CONF_NESTED_FAILURE (REJECT)

use serde_json::Value;
use std::fmt;
use thiserror::Error;

use super::types::TypeSet;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Candidate configuration rejected
    Reject,
    /// Schema construction bug, the tree itself is wrong
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-construction errors, raised while building or mutating a tree
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// A type tag name resolved to no known predicate
    #[error("unknown type tag \"{0}\"")]
    UnknownTypeTag(String),

    /// Children were declared on a node that does not allow "array"
    #[error("type \"array\" must be allowed if element has children")]
    ChildrenRequireArrayType,

    /// The node is already defined as a child of another node
    #[error("node is already defined as a child")]
    AlreadyAttached,

    /// A child with this key is already registered on the parent
    #[error("child \"{0}\" is already registered")]
    DuplicateChild(String),

    /// A node cannot be both required and carry a default value
    #[error("a required element cannot have a default value")]
    RequiredWithDefault,

    /// Prototype mode is only meaningful on array-typed nodes
    #[error("type \"array\" must be allowed to enable prototype mode")]
    PrototypeRequiresArrayType,

    /// A node id does not belong to this tree
    #[error("node id does not belong to this tree")]
    UnknownNode,
}

impl SchemaError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::UnknownTypeTag(_) => "CONF_UNKNOWN_TYPE_TAG",
            SchemaError::ChildrenRequireArrayType => "CONF_CHILDREN_REQUIRE_ARRAY",
            SchemaError::AlreadyAttached => "CONF_ALREADY_ATTACHED",
            SchemaError::DuplicateChild(_) => "CONF_DUPLICATE_CHILD",
            SchemaError::RequiredWithDefault => "CONF_REQUIRED_WITH_DEFAULT",
            SchemaError::PrototypeRequiresArrayType => "CONF_PROTOTYPE_REQUIRES_ARRAY",
            SchemaError::UnknownNode => "CONF_UNKNOWN_NODE",
        }
    }

    /// Returns the severity level (always FATAL for construction errors)
    pub fn severity(&self) -> Severity {
        Severity::Fatal
    }
}

/// Result type for schema-construction operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Processing errors, raised while validating a candidate configuration
#[derive(Debug, Error)]
pub enum ProcessError {
    /// A required key was absent with no default
    #[error("element \"{key}\" is required")]
    MissingElement {
        /// The missing child key
        key: String,
    },

    /// The value's runtime type is not in the node's allowed set
    #[error("unallowed type \"{actual}\", allowed are [{allowed}]")]
    InvalidType {
        /// Runtime type name of the rejected value
        actual: &'static str,
        /// The node's allowed type tags
        allowed: TypeSet,
    },

    /// A validation strategy rejected the value
    #[error("value {value} is not allowed ({context})")]
    InvalidValue {
        /// The rejected value
        value: Value,
        /// Strategy-specific detail (allowed set, expected type, ...)
        context: String,
    },

    /// A mapping contained a key with no declared child
    #[error("key \"{key}\" does not exist")]
    UnknownKey {
        /// The offending key
        key: String,
    },

    /// A child failed while being processed
    #[error("error during process for key \"{key}\"")]
    Nested {
        /// The child key the failure occurred under
        key: String,
        /// The original failure
        #[source]
        source: Box<ProcessError>,
    },
}

impl ProcessError {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ProcessError::MissingElement { .. } => "CONF_MISSING_ELEMENT",
            ProcessError::InvalidType { .. } => "CONF_INVALID_TYPE",
            ProcessError::InvalidValue { .. } => "CONF_INVALID_VALUE",
            ProcessError::UnknownKey { .. } => "CONF_UNKNOWN_KEY",
            ProcessError::Nested { .. } => "CONF_NESTED_FAILURE",
        }
    }

    /// Returns the severity level (always REJECT for processing errors)
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }

    /// Returns the bracketed path from the root to the failure point,
    /// e.g. `[services][0][name]`. Empty for a failure at the root itself.
    pub fn path(&self) -> String {
        let mut path = String::new();
        let mut err = self;
        loop {
            match err {
                ProcessError::Nested { key, source } => {
                    path.push('[');
                    path.push_str(key);
                    path.push(']');
                    err = source;
                }
                ProcessError::MissingElement { key } | ProcessError::UnknownKey { key } => {
                    path.push('[');
                    path.push_str(key);
                    path.push(']');
                    break;
                }
                _ => break,
            }
        }
        path
    }

    /// Returns the innermost failure of a nested chain
    pub fn root_cause(&self) -> &ProcessError {
        let mut err = self;
        while let ProcessError::Nested { source, .. } = err {
            err = source;
        }
        err
    }
}

/// Result type for processing operations
pub type ProcessResult<T> = Result<T, ProcessError>;
