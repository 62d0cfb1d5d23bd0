//! Schema node definitions
//!
//! A `Node` describes one position in the configuration tree: its allowed
//! primitive types, requiredness, default value and validation chain. Nodes
//! are built standalone, then admitted into a [`SchemaTree`] which owns them
//! and wires parent/child links.
//!
//! [`SchemaTree`]: super::tree::SchemaTree

use serde_json::Value;

use super::tree::NodeId;
use super::types::ValueType;
use crate::validation::Validation;

/// A schema node under construction.
///
/// Variant constructors mirror the closed set of node shapes: generic
/// ([`Node::new`]), scalar, string, integer and array. Structural invariants
/// (required vs. default, prototype on non-array nodes) are enforced when the
/// node is pushed into a tree.
pub struct Node {
    pub(crate) allowed_types: Vec<ValueType>,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) validations: Vec<Box<dyn Validation>>,
    pub(crate) prototype: bool,
}

impl Node {
    /// Creates a generic node with the given allowed types.
    pub fn new(allowed_types: impl Into<Vec<ValueType>>) -> Self {
        Self {
            allowed_types: allowed_types.into(),
            required: false,
            default: None,
            validations: Vec::new(),
            prototype: false,
        }
    }

    /// Creates a scalar node (int, float, string, bool).
    pub fn scalar() -> Self {
        Self::new(vec![
            ValueType::Int,
            ValueType::Float,
            ValueType::String,
            ValueType::Bool,
        ])
    }

    /// Creates a string-only node.
    pub fn string() -> Self {
        Self::new(vec![ValueType::String])
    }

    /// Creates an integer-only node.
    pub fn integer() -> Self {
        Self::new(vec![ValueType::Int])
    }

    /// Creates an array node (mapping or sequence).
    pub fn array() -> Self {
        Self::new(vec![ValueType::Array])
    }

    /// Adds an allowed type to the node.
    pub fn allow(mut self, ty: ValueType) -> Self {
        self.allowed_types.push(ty);
        self
    }

    /// Marks the node as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the default value used when the key is absent.
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Appends a validation to the node's chain.
    pub fn validate_with(mut self, validation: impl Validation + 'static) -> Self {
        self.validations.push(Box::new(validation));
        self
    }

    /// Enables prototype mode: every entry of the incoming collection is
    /// processed through this node's own schema.
    pub fn prototype(mut self) -> Self {
        self.prototype = true;
        self
    }
}

/// A node as stored in the tree arena, with its wiring state.
pub(crate) struct NodeState {
    pub(crate) allowed_types: Vec<ValueType>,
    pub(crate) required: bool,
    pub(crate) default: Option<Value>,
    pub(crate) validations: Vec<Box<dyn Validation>>,
    pub(crate) prototype: bool,
    /// Back-reference, set exactly once at attachment. None for the root.
    pub(crate) parent: Option<NodeId>,
    /// Insertion-ordered child registry.
    pub(crate) children: Vec<(String, NodeId)>,
}

impl NodeState {
    pub(crate) fn from_node(node: Node) -> Self {
        Self {
            allowed_types: node.allowed_types,
            required: node.required,
            default: node.default,
            validations: node.validations,
            prototype: node.prototype,
            parent: None,
            children: Vec::new(),
        }
    }

    pub(crate) fn allows(&self, ty: ValueType) -> bool {
        self.allowed_types.contains(&ty)
    }

    pub(crate) fn child(&self, key: &str) -> Option<NodeId> {
        self.children
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_are_optional_without_default() {
        let node = Node::string();
        assert!(!node.required);
        assert!(node.default.is_none());
        assert!(!node.prototype);
        assert!(node.validations.is_empty());
    }

    #[test]
    fn test_variant_allowed_types() {
        assert_eq!(Node::string().allowed_types, vec![ValueType::String]);
        assert_eq!(Node::integer().allowed_types, vec![ValueType::Int]);
        assert_eq!(Node::array().allowed_types, vec![ValueType::Array]);
        assert_eq!(
            Node::scalar().allowed_types,
            vec![
                ValueType::Int,
                ValueType::Float,
                ValueType::String,
                ValueType::Bool
            ]
        );
    }

    #[test]
    fn test_allow_appends_in_order() {
        let node = Node::new(vec![ValueType::Bool]).allow(ValueType::Array);
        assert_eq!(
            node.allowed_types,
            vec![ValueType::Bool, ValueType::Array]
        );
    }

    #[test]
    fn test_builder_state_carries_over() {
        let node = Node::string().required();
        let state = NodeState::from_node(node);
        assert!(state.required);
        assert!(state.parent.is_none());
        assert!(state.children.is_empty());
    }

    #[test]
    fn test_default_value_set() {
        let node = Node::string().default_value(json!("fallback"));
        assert_eq!(node.default, Some(json!("fallback")));
    }
}
