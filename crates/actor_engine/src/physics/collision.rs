//! Per-actor collision participation
//!
//! [`Collision`] holds the shapes, group and sensor flag of one actor, plus
//! an enabled switch. Each tick it produces a fresh
//! [`CollisionRepresentation`] from the actor's current global matrix; the
//! representation is a value snapshot and is never updated in place.

use super::aabb::AABB;
use super::collision_layers::CollisionGroup;
use super::shape::CollisionShape;
use crate::error::{EngineError, EngineResult};
use crate::foundation::math::Mat3;
use crate::lifecycle::ActorId;

/// Parameters for [`Collision::init`]
#[derive(Debug, Clone, Default)]
pub struct CollisionDesc {
    /// Shapes in local space
    pub shapes: Vec<CollisionShape>,
    /// Category and mask
    pub group: CollisionGroup,
    /// Sensor-only representation
    pub is_excess: bool,
}

impl CollisionDesc {
    /// Descriptor with a single shape
    pub fn new(shape: CollisionShape, group: CollisionGroup) -> Self {
        Self {
            shapes: vec![shape],
            group,
            is_excess: false,
        }
    }

    /// Builder pattern: Add another shape
    pub fn with_shape(mut self, shape: CollisionShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Builder pattern: Mark as excess (sensor-only)
    pub fn as_excess(mut self) -> Self {
        self.is_excess = true;
        self
    }
}

/// Snapshot of one actor's broad-phase footprint for a single tick
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionRepresentation {
    /// World-space boxes; empty while collision is disabled
    pub boxes: Vec<AABB>,
    /// Category and mask
    pub group: CollisionGroup,
    /// Sensor-only flag
    pub is_excess: bool,
}

#[derive(Debug, Clone)]
struct CollisionState {
    shapes: Vec<CollisionShape>,
    group: CollisionGroup,
    is_excess: bool,
}

/// Collision participation of an actor
#[derive(Debug, Clone)]
pub struct Collision {
    owner: ActorId,
    state: Option<CollisionState>,
    enabled: bool,
}

impl Collision {
    /// Uninitialized collision for `owner`
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            state: None,
            enabled: false,
        }
    }

    /// Install shapes and group; enables collision
    ///
    /// Initializing twice is a contract violation.
    pub fn init(&mut self, desc: CollisionDesc) -> EngineResult<()> {
        if self.state.is_some() {
            return Err(EngineError::CollisionAlreadyInitialized(self.owner));
        }
        self.state = Some(CollisionState {
            shapes: desc.shapes,
            group: desc.group,
            is_excess: desc.is_excess,
        });
        self.enabled = true;
        Ok(())
    }

    /// Whether [`init`](Self::init) has run
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Whether the actor currently contributes boxes
    pub fn is_enabled(&self) -> bool {
        self.enabled && self.state.is_some()
    }

    /// Resume contributing boxes
    pub fn enable(&mut self) -> EngineResult<()> {
        if self.state.is_none() {
            return Err(EngineError::CollisionNotInitialized(self.owner));
        }
        self.enabled = true;
        Ok(())
    }

    /// Stop contributing boxes; disabling twice is a no-op
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Category and mask, if initialized
    pub fn group(&self) -> Option<CollisionGroup> {
        self.state.as_ref().map(|s| s.group)
    }

    /// Replace the category and mask
    pub fn set_group(&mut self, group: CollisionGroup) -> EngineResult<()> {
        let state = self
            .state
            .as_mut()
            .ok_or(EngineError::CollisionNotInitialized(self.owner))?;
        state.group = group;
        Ok(())
    }

    /// Build this tick's representation from the actor's global matrix
    ///
    /// Returns `None` before initialization. While disabled the
    /// representation exists but carries no boxes.
    pub fn calc_representation(&self, transform: &Mat3) -> Option<CollisionRepresentation> {
        let state = self.state.as_ref()?;
        let mut boxes = Vec::new();
        if self.enabled {
            for shape in &state.shapes {
                shape.append_boxes(transform, &mut boxes);
            }
        }
        Some(CollisionRepresentation {
            boxes,
            group: state.group,
            is_excess: state.is_excess,
        })
    }
}
