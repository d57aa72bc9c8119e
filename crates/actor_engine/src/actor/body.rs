//! Engine-side state of an actor

use crate::foundation::collections::NodeId;
use crate::foundation::math::Mat3;
use crate::lifecycle::{ActorId, TimerSet};
use crate::physics::{Collision, CollisionDesc};

/// Creation parameters for an actor
#[derive(Debug, Clone)]
pub struct ActorDesc {
    /// Initial local matrix
    pub local: Mat3,
    /// Actor whose transform node becomes the parent
    pub parent: Option<ActorId>,
    /// Collision to initialize at creation
    pub collision: Option<CollisionDesc>,
    /// Seconds until the actor removes itself
    pub lifetime: Option<f32>,
    /// Multiplier applied to the world delta for this actor
    pub time_scale: f32,
}

impl Default for ActorDesc {
    fn default() -> Self {
        Self {
            local: Mat3::identity(),
            parent: None,
            collision: None,
            lifetime: None,
            time_scale: 1.0,
        }
    }
}

impl ActorDesc {
    /// Descriptor placed at `local`
    pub fn at(local: Mat3) -> Self {
        Self {
            local,
            ..Self::default()
        }
    }

    /// Builder pattern: Parent transform
    pub fn with_parent(mut self, parent: ActorId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Builder pattern: Collision
    pub fn with_collision(mut self, collision: CollisionDesc) -> Self {
        self.collision = Some(collision);
        self
    }

    /// Builder pattern: Lifetime in seconds
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.lifetime = Some(seconds);
        self
    }

    /// Builder pattern: Time scale
    ///
    /// Must be finite and non-negative or creating the actor fails.
    pub fn with_time_scale(mut self, scale: f32) -> Self {
        self.time_scale = scale;
        self
    }
}

/// Transform, collision, timers and lifetime of one actor
#[derive(Debug)]
pub struct ActorBody {
    id: ActorId,
    node: NodeId,
    /// Collision participation
    pub collision: Collision,
    /// Pending timers
    pub timers: TimerSet,
    /// Multiplier applied to the world delta
    pub time_scale: f32,
    lifetime: Option<f32>,
    removal_requested: bool,
}

impl ActorBody {
    pub(crate) fn new(id: ActorId, node: NodeId, desc: &ActorDesc) -> Self {
        Self {
            id,
            node,
            collision: Collision::new(id),
            timers: TimerSet::new(),
            time_scale: desc.time_scale,
            lifetime: desc.lifetime,
            removal_requested: false,
        }
    }

    /// Owning actor
    pub fn id(&self) -> ActorId {
        self.id
    }

    /// Transform node in the engine's graph
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Remaining lifetime in seconds, `None` when unbounded
    pub fn remaining_lifetime(&self) -> Option<f32> {
        self.lifetime
    }

    /// Replace the remaining lifetime
    pub fn set_lifetime(&mut self, seconds: Option<f32>) {
        self.lifetime = seconds;
    }

    /// Whether the lifetime has run out
    pub fn lifetime_exhausted(&self) -> bool {
        self.lifetime.is_some_and(|remaining| remaining <= 0.0)
    }

    /// Flag the actor for removal at the end of the current tick
    pub fn request_removal(&mut self) {
        self.removal_requested = true;
    }

    /// Whether removal has been requested
    pub fn removal_requested(&self) -> bool {
        self.removal_requested
    }

    /// `world_delta` scaled by this actor's time scale; zero when the
    /// product is not a finite non-negative number
    pub(crate) fn scaled_delta(&self, world_delta: f32) -> f32 {
        let delta = world_delta * self.time_scale;
        if delta.is_finite() && delta >= 0.0 {
            delta
        } else {
            0.0
        }
    }

    pub(crate) fn consume_lifetime(&mut self, delta_sec: f32) {
        if let Some(remaining) = self.lifetime.as_mut() {
            *remaining -= delta_sec;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::TransformGraph;

    #[test]
    fn lifetime_runs_out() {
        let mut graph = TransformGraph::new();
        let node = graph.create_node(Mat3::identity());
        let mut body = ActorBody::new(ActorId::next(), node, &ActorDesc::default().with_lifetime(1.0));

        body.consume_lifetime(0.4);
        assert!(!body.lifetime_exhausted());
        body.consume_lifetime(0.6);
        assert!(body.lifetime_exhausted());
    }

    #[test]
    fn scaled_delta_drops_overflowing_products() {
        let mut graph = TransformGraph::new();
        let node = graph.create_node(Mat3::identity());
        let mut body = ActorBody::new(ActorId::next(), node, &ActorDesc::default().with_time_scale(4.0));

        assert_eq!(body.scaled_delta(0.25), 1.0);
        body.time_scale = f32::MAX;
        assert_eq!(body.scaled_delta(10.0), 0.0);
        body.time_scale = -1.0;
        assert_eq!(body.scaled_delta(0.25), 0.0);
    }

    #[test]
    fn unbounded_lifetime_never_runs_out() {
        let mut graph = TransformGraph::new();
        let node = graph.create_node(Mat3::identity());
        let mut body = ActorBody::new(ActorId::next(), node, &ActorDesc::default());

        body.consume_lifetime(1000.0);
        assert!(!body.lifetime_exhausted());
        assert!(!body.removal_requested());
    }
}
