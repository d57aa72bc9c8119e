//! Specialized collection types

pub use slotmap::{SecondaryMap, SlotMap};

slotmap::new_key_type! {
    /// Handle to a node in the [`TransformGraph`](crate::transform::TransformGraph) arena
    pub struct NodeId;
}

/// Arena of values addressed by [`NodeId`]
pub type NodeArena<T> = SlotMap<NodeId, T>;
