//! Callback view of the engine

use std::collections::{BTreeSet, HashMap};

use super::body::{ActorBody, ActorDesc};
use super::commands::Commands;
use super::Actor;
use crate::error::{EngineError, EngineResult};
use crate::foundation::collections::NodeId;
use crate::foundation::math::Mat3;
use crate::lifecycle::{ActorId, ActorRegistry, TimerSet, WorldId};
use crate::physics::Collision;
use crate::transform::TransformGraph;

/// What an actor sees while one of its callbacks runs
///
/// Mutable access is limited to the actor's own body and to the transform
/// graph. Other actors are observed through the registry and their global
/// matrices, and changed only through deferred commands.
pub struct ActorContext<'a> {
    pub(crate) world: WorldId,
    pub(crate) body: &'a mut ActorBody,
    pub(crate) graph: &'a mut TransformGraph,
    pub(crate) registry: &'a ActorRegistry,
    pub(crate) nodes: &'a HashMap<ActorId, NodeId>,
    pub(crate) commands: &'a mut Commands,
}

impl<'a> ActorContext<'a> {
    /// The actor being called
    pub fn id(&self) -> ActorId {
        self.body.id()
    }

    /// World the actor belongs to
    pub fn world(&self) -> WorldId {
        self.world
    }

    /// The actor's transform node
    pub fn node(&self) -> NodeId {
        self.body.node()
    }

    /// Local matrix of this actor
    pub fn local(&self) -> EngineResult<Mat3> {
        self.graph.local(self.body.node())
    }

    /// Global matrix of this actor, current as of the last transform change
    pub fn global(&self) -> EngineResult<Mat3> {
        self.graph.global(self.body.node())
    }

    /// Global matrix of any live actor
    pub fn global_of(&self, actor: ActorId) -> EngineResult<Mat3> {
        let node = self.nodes.get(&actor).ok_or(EngineError::UnknownActor(actor))?;
        self.graph.global(*node)
    }

    /// Replace the local matrix; the subtree is refreshed immediately
    pub fn set_local(&mut self, local: Mat3) -> EngineResult<()> {
        self.graph.set_local(self.body.node(), local)
    }

    /// Pre-multiply the local matrix by `delta`
    pub fn apply_local(&mut self, delta: &Mat3) -> EngineResult<()> {
        self.graph.apply_local(self.body.node(), delta)
    }

    /// Make this actor's node a child of `parent`'s node
    pub fn attach_to(&mut self, parent: ActorId) -> EngineResult<()> {
        let parent_node = *self.nodes.get(&parent).ok_or(EngineError::UnknownActor(parent))?;
        self.graph.attach_to(self.body.node(), parent_node)
    }

    /// Detach this actor's node from its parent
    pub fn detach(&mut self) -> EngineResult<()> {
        self.graph.detach_from_parent(self.body.node())
    }

    /// Read-only transform graph
    pub fn graph(&self) -> &TransformGraph {
        &*self.graph
    }

    /// Own collision
    pub fn collision(&self) -> &Collision {
        &self.body.collision
    }

    /// Own collision, mutable
    pub fn collision_mut(&mut self) -> &mut Collision {
        &mut self.body.collision
    }

    /// Own timers
    pub fn timers(&mut self) -> &mut TimerSet {
        &mut self.body.timers
    }

    /// Own body
    pub fn body(&self) -> &ActorBody {
        &*self.body
    }

    /// Own body, mutable
    pub fn body_mut(&mut self) -> &mut ActorBody {
        &mut *self.body
    }

    /// Flag this actor for removal at the end of the current tick
    pub fn request_removal(&mut self) {
        self.body.request_removal();
    }

    /// Active actors of this actor's world
    pub fn active_actors(&self) -> EngineResult<&BTreeSet<ActorId>> {
        self.registry.active_actors(self.world)
    }

    /// World currently holding `actor`, if any
    pub fn world_contains_actor(&self, actor: ActorId) -> Option<WorldId> {
        self.registry.world_contains_actor(actor)
    }

    /// Create an actor in this world; it is staged and joins next tick
    pub fn spawn<A>(&mut self, actor: A, desc: ActorDesc) -> ActorId
    where
        A: Actor + 'static,
    {
        self.commands.spawn(self.world, Box::new(actor), desc)
    }

    /// Remove another actor; the request is applied after the current phase
    pub fn remove(&mut self, actor: ActorId) {
        self.commands.remove(actor);
    }
}
