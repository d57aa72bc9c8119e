//! Hierarchical transformations
//!
//! A [`TransformGraph`] owns every node; actors hold a [`NodeId`] into it.
//! Global matrices are pushed down eagerly on each mutation.

mod graph;

pub use crate::foundation::collections::NodeId;
pub use graph::{TransformGraph, TransformNode};
