//! Schema tree arena
//!
//! The tree owns every node; callers hold [`NodeId`] indices. Parent links
//! are non-owning back-references set exactly once at attachment, so the
//! structure is always a single-owner tree, never a graph.
//!
//! Structural invariants enforced here, at build time:
//! - a node with children must keep "array" among its allowed types
//! - a node already assigned a parent cannot be attached again
//! - child keys are unique per parent
//! - required and default value are mutually exclusive
//! - prototype mode requires the "array" type
//!
//! Tree mutation must happen before or between `process` calls, never
//! during one.

use serde_json::Value;
use tracing::debug;

use super::errors::{SchemaError, SchemaResult};
use super::node::{Node, NodeState};
use super::types::ValueType;
use crate::validation::{PostValidation, Validation};

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A configuration schema tree.
///
/// The root is created with the tree and owns the post-validation registry;
/// further nodes are admitted with [`push`](SchemaTree::push) and wired with
/// [`attach`](SchemaTree::attach). A tree is reused across any number of
/// `process` calls and carries no per-invocation state.
pub struct SchemaTree {
    pub(crate) nodes: Vec<NodeState>,
    pub(crate) post_validations: Vec<Box<dyn PostValidation>>,
}

impl std::fmt::Debug for SchemaTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaTree")
            .field("nodes", &self.nodes.len())
            .field("post_validations", &self.post_validations.len())
            .finish()
    }
}

impl SchemaTree {
    /// Creates a tree whose root is a plain array-typed mapping node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeState::from_node(Node::array())],
            post_validations: Vec::new(),
        }
    }

    /// Creates a tree with a custom root node.
    ///
    /// The root must allow the "array" type and satisfy the same structural
    /// invariants as any pushed node.
    pub fn with_root(root: Node) -> SchemaResult<Self> {
        check_node(&root)?;
        if !root.allowed_types.contains(&ValueType::Array) {
            return Err(SchemaError::ChildrenRequireArrayType);
        }
        Ok(Self {
            nodes: vec![NodeState::from_node(root)],
            post_validations: Vec::new(),
        })
    }

    /// Returns the root node id.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Admits a node into the arena, unattached.
    pub fn push(&mut self, node: Node) -> SchemaResult<NodeId> {
        check_node(&node)?;
        self.nodes.push(NodeState::from_node(node));
        Ok(NodeId(self.nodes.len() - 1))
    }

    /// Attaches `child` under `parent` at `key`.
    ///
    /// Sets the child's parent link, which may happen only once; attaching a
    /// node that already has a parent is fatal.
    pub fn attach(
        &mut self,
        parent: NodeId,
        key: impl Into<String>,
        child: NodeId,
    ) -> SchemaResult<()> {
        let key = key.into();
        self.state(parent)?;
        self.state(child)?;
        if !self.nodes[parent.0].allows(ValueType::Array) {
            return Err(SchemaError::ChildrenRequireArrayType);
        }
        // The root anchors the tree and can never become a child.
        if child == self.root() || self.nodes[child.0].parent.is_some() {
            return Err(SchemaError::AlreadyAttached);
        }
        if self.nodes[parent.0].child(&key).is_some() {
            return Err(SchemaError::DuplicateChild(key));
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push((key.clone(), child));
        debug!(parent = parent.0, child = child.0, %key, "attached child node");
        Ok(())
    }

    /// Detaches the child at `key`, clearing its parent link so it may be
    /// attached elsewhere. Returns the detached node id, if any.
    pub fn detach(&mut self, parent: NodeId, key: &str) -> Option<NodeId> {
        let pos = self
            .nodes
            .get(parent.0)?
            .children
            .iter()
            .position(|(k, _)| k == key)?;
        let (_, child) = self.nodes[parent.0].children.remove(pos);
        self.nodes[child.0].parent = None;
        debug!(parent = parent.0, child = child.0, %key, "detached child node");
        Some(child)
    }

    /// Returns the child of `id` registered at `key`.
    pub fn child_of(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.nodes.get(id.0)?.child(key)
    }

    /// Returns the parent of `id`, None for the root.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Returns the declared child keys of `id`, in insertion order.
    pub fn child_keys(&self, id: NodeId) -> SchemaResult<Vec<&str>> {
        Ok(self
            .state(id)?
            .children
            .iter()
            .map(|(k, _)| k.as_str())
            .collect())
    }

    /// Returns the bracketed path of `id` from the root, e.g. `[a][b]`.
    /// The root's path is empty.
    pub fn path_of(&self, id: NodeId) -> SchemaResult<String> {
        let mut segments = Vec::new();
        let mut current = id;
        while let Some(parent) = self.state(current)?.parent {
            let key = self.nodes[parent.0]
                .children
                .iter()
                .find(|(_, c)| *c == current)
                .map(|(k, _)| k.as_str())
                .ok_or(SchemaError::UnknownNode)?;
            segments.push(key);
            current = parent;
        }
        segments.reverse();
        let mut path = String::new();
        for segment in segments {
            path.push('[');
            path.push_str(segment);
            path.push(']');
        }
        Ok(path)
    }

    /// Returns the allowed types of `id`.
    pub fn allowed_types_of(&self, id: NodeId) -> SchemaResult<&[ValueType]> {
        Ok(&self.state(id)?.allowed_types)
    }

    /// Returns whether `id` is required.
    pub fn is_required(&self, id: NodeId) -> SchemaResult<bool> {
        Ok(self.state(id)?.required)
    }

    /// Returns the default value of `id`, if any.
    pub fn default_of(&self, id: NodeId) -> SchemaResult<Option<&Value>> {
        Ok(self.state(id)?.default.as_ref())
    }

    /// Returns whether `id` is in prototype mode.
    pub fn is_prototype(&self, id: NodeId) -> SchemaResult<bool> {
        Ok(self.state(id)?.prototype)
    }

    /// Marks `id` as required or optional.
    pub fn set_required(&mut self, id: NodeId, required: bool) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if required && state.default.is_some() {
            return Err(SchemaError::RequiredWithDefault);
        }
        state.required = required;
        Ok(())
    }

    /// Sets the default value of `id`.
    pub fn set_default(&mut self, id: NodeId, value: Value) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if state.required {
            return Err(SchemaError::RequiredWithDefault);
        }
        state.default = Some(value);
        Ok(())
    }

    /// Removes the default value of `id`.
    pub fn clear_default(&mut self, id: NodeId) -> SchemaResult<()> {
        self.state_mut(id)?.default = None;
        Ok(())
    }

    /// Replaces the allowed types of `id`.
    ///
    /// The "array" type must remain allowed while the node has children or
    /// is in prototype mode.
    pub fn set_allowed_types(&mut self, id: NodeId, types: Vec<ValueType>) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if !types.contains(&ValueType::Array) {
            if !state.children.is_empty() {
                return Err(SchemaError::ChildrenRequireArrayType);
            }
            if state.prototype {
                return Err(SchemaError::PrototypeRequiresArrayType);
            }
        }
        state.allowed_types = types;
        Ok(())
    }

    /// Adds an allowed type to `id`.
    pub fn add_allowed_type(&mut self, id: NodeId, ty: ValueType) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if !state.allows(ty) {
            state.allowed_types.push(ty);
        }
        Ok(())
    }

    /// Removes an allowed type from `id`, subject to the same "array"
    /// invariants as [`set_allowed_types`](SchemaTree::set_allowed_types).
    pub fn remove_allowed_type(&mut self, id: NodeId, ty: ValueType) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if ty == ValueType::Array {
            if !state.children.is_empty() {
                return Err(SchemaError::ChildrenRequireArrayType);
            }
            if state.prototype {
                return Err(SchemaError::PrototypeRequiresArrayType);
            }
        }
        state.allowed_types.retain(|t| *t != ty);
        Ok(())
    }

    /// Appends a validation to the chain of `id`.
    pub fn add_validation(
        &mut self,
        id: NodeId,
        validation: impl Validation + 'static,
    ) -> SchemaResult<()> {
        self.state_mut(id)?.validations.push(Box::new(validation));
        Ok(())
    }

    /// Switches prototype mode of `id`.
    pub fn set_prototype(&mut self, id: NodeId, prototype: bool) -> SchemaResult<()> {
        let state = self.state_mut(id)?;
        if prototype && !state.allows(ValueType::Array) {
            return Err(SchemaError::PrototypeRequiresArrayType);
        }
        state.prototype = prototype;
        Ok(())
    }

    /// Registers a post-validation, bound to the node it originates from.
    ///
    /// The registry is root-owned and append-only; execution happens once,
    /// after the whole tree has been normalized, in registration order. The
    /// strategy is told its origin (node and path) exactly once, here.
    pub fn add_post_validation(
        &mut self,
        origin: NodeId,
        mut validation: Box<dyn PostValidation>,
    ) -> SchemaResult<()> {
        let path = self.path_of(origin)?;
        validation.bind_origin(origin, path);
        self.post_validations.push(validation);
        Ok(())
    }

    pub(crate) fn state(&self, id: NodeId) -> SchemaResult<&NodeState> {
        self.nodes.get(id.0).ok_or(SchemaError::UnknownNode)
    }

    fn state_mut(&mut self, id: NodeId) -> SchemaResult<&mut NodeState> {
        self.nodes.get_mut(id.0).ok_or(SchemaError::UnknownNode)
    }
}

impl Default for SchemaTree {
    fn default() -> Self {
        Self::new()
    }
}

fn check_node(node: &Node) -> SchemaResult<()> {
    if node.required && node.default.is_some() {
        return Err(SchemaError::RequiredWithDefault);
    }
    if node.prototype && !node.allowed_types.contains(&ValueType::Array) {
        return Err(SchemaError::PrototypeRequiresArrayType);
    }
    Ok(())
}
