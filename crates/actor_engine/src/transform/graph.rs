//! Arena-backed transformation graph
//!
//! Nodes live in a [`SlotMap`](slotmap::SlotMap) and refer to each other by
//! [`NodeId`]. Every mutation recomputes the cached global matrix of the
//! touched node and its whole subtree before returning, parents before
//! children, so a read never observes a stale global.

use crate::error::{EngineError, EngineResult};
use crate::foundation::collections::{NodeArena, NodeId};
use crate::foundation::math::Mat3;

/// A single node of the graph
#[derive(Debug, Clone)]
pub struct TransformNode {
    local: Mat3,
    global: Mat3,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl TransformNode {
    fn new(local: Mat3) -> Self {
        Self {
            local,
            global: local,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Local matrix relative to the parent
    pub fn local(&self) -> &Mat3 {
        &self.local
    }

    /// Cached `parent.global * local`
    pub fn global(&self) -> &Mat3 {
        &self.global
    }

    /// Current parent, if attached
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Direct children in attachment order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Hierarchical transformation graph
#[derive(Debug, Default)]
pub struct TransformGraph {
    nodes: NodeArena<TransformNode>,
}

impl TransformGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached node; its global equals its local
    pub fn create_node(&mut self, local: Mat3) -> NodeId {
        self.nodes.insert(TransformNode::new(local))
    }

    /// Remove a node from the graph
    ///
    /// The node is detached from its parent and its children become roots,
    /// each recomputed against the identity root.
    pub fn destroy_node(&mut self, node: NodeId) -> EngineResult<()> {
        self.detach_from_parent(node)?;
        let removed = self.nodes.remove(node).ok_or(EngineError::UnknownNode(node))?;
        for child in removed.children {
            if let Some(child_node) = self.nodes.get_mut(child) {
                child_node.parent = None;
            }
            self.propagate(child, Mat3::identity());
        }
        Ok(())
    }

    /// Whether the node exists
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    /// Borrow a node
    pub fn node(&self, node: NodeId) -> EngineResult<&TransformNode> {
        self.nodes.get(node).ok_or(EngineError::UnknownNode(node))
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Local matrix of a node
    pub fn local(&self, node: NodeId) -> EngineResult<Mat3> {
        Ok(self.node(node)?.local)
    }

    /// Global matrix of a node
    pub fn global(&self, node: NodeId) -> EngineResult<Mat3> {
        Ok(self.node(node)?.global)
    }

    /// Replace the local matrix and refresh the subtree
    pub fn set_local(&mut self, node: NodeId, local: Mat3) -> EngineResult<()> {
        let parent = {
            let entry = self.nodes.get_mut(node).ok_or(EngineError::UnknownNode(node))?;
            entry.local = local;
            entry.parent
        };
        let parent_global = self.parent_global(parent);
        self.propagate(node, parent_global);
        Ok(())
    }

    /// Left-multiply the local matrix by `delta` (a movement step)
    pub fn apply_local(&mut self, node: NodeId, delta: &Mat3) -> EngineResult<()> {
        let local = self.local(node)?;
        self.set_local(node, delta * local)
    }

    /// Attach `node` under `parent`, leaving any previous parent first
    ///
    /// Attaching a node under itself or one of its descendants is rejected
    /// with [`EngineError::TransformCycle`].
    pub fn attach_to(&mut self, node: NodeId, parent: NodeId) -> EngineResult<()> {
        if !self.nodes.contains_key(node) {
            return Err(EngineError::UnknownNode(node));
        }
        if !self.nodes.contains_key(parent) {
            return Err(EngineError::UnknownNode(parent));
        }
        if self.is_ancestor_or_self(node, parent) {
            return Err(EngineError::TransformCycle(node));
        }

        self.unlink(node);
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.push(node);
        }
        if let Some(child_node) = self.nodes.get_mut(node) {
            child_node.parent = Some(parent);
        }

        let parent_global = self.parent_global(Some(parent));
        self.propagate(node, parent_global);
        Ok(())
    }

    /// Detach from the current parent; a no-op when already detached
    pub fn detach_from_parent(&mut self, node: NodeId) -> EngineResult<()> {
        let has_parent = self.node(node)?.parent.is_some();
        if has_parent {
            self.unlink(node);
            self.propagate(node, Mat3::identity());
        }
        Ok(())
    }

    /// Iterate over every node with its id
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TransformNode)> {
        self.nodes.iter()
    }

    fn parent_global(&self, parent: Option<NodeId>) -> Mat3 {
        parent
            .and_then(|p| self.nodes.get(p))
            .map_or_else(Mat3::identity, |p| p.global)
    }

    /// Remove the parent edge without recomputing anything
    fn unlink(&mut self, node: NodeId) {
        let Some(parent) = self.nodes.get_mut(node).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(parent_node) = self.nodes.get_mut(parent) {
            parent_node.children.retain(|&c| c != node);
        }
    }

    /// True when `ancestor` is `node` or lies on the parent chain of `node`
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.nodes.get(current).and_then(|n| n.parent);
        }
        false
    }

    /// Depth-first refresh, parent before children
    fn propagate(&mut self, root: NodeId, root_parent_global: Mat3) {
        let mut stack = vec![(root, root_parent_global)];
        while let Some((id, parent_global)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(id) else {
                continue;
            };
            node.global = parent_global * node.local;
            let global = node.global;
            stack.extend(node.children.iter().rev().map(|&child| (child, global)));
        }
    }
}
