//! Engine error types

use crate::config::ConfigError;
use crate::foundation::collections::NodeId;
use crate::lifecycle::{ActorId, WorldId};
use thiserror::Error;

/// Result alias used by every fallible engine entry point
pub type EngineResult<T> = Result<T, EngineError>;

/// Contract violations and configuration failures
///
/// Benign repeats (detaching a detached node, removing an actor that is
/// already leaving, disabling disabled collision) are not errors and never
/// produce one of these.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The actor id was never created or has been destroyed
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),

    /// The world id was never created or has been destroyed
    #[error("unknown world {0}")]
    UnknownWorld(WorldId),

    /// The transform node does not exist in the graph
    #[error("unknown transform node {0:?}")]
    UnknownNode(NodeId),

    /// The actor is already registered with a world
    #[error("actor {actor} is already registered with world {world}")]
    AlreadyInWorld {
        /// Actor being staged
        actor: ActorId,
        /// World that currently holds it
        world: WorldId,
    },

    /// The actor is not a member of the world it was removed from
    #[error("actor {actor} is not a member of world {world}")]
    NotInWorld {
        /// Actor being removed
        actor: ActorId,
        /// World named by the caller
        world: WorldId,
    },

    /// Collision was initialized a second time
    #[error("collision already initialized for {0}")]
    CollisionAlreadyInitialized(ActorId),

    /// Collision was toggled before being initialized
    #[error("collision not initialized for {0}")]
    CollisionNotInitialized(ActorId),

    /// A world or actor time scale was negative or not finite
    #[error("time scale must be finite and non-negative, got {0}")]
    InvalidTimeScale(f32),

    /// Attaching would make a node its own ancestor
    #[error("attaching {0:?} would create a cycle in the transform graph")]
    TransformCycle(NodeId),

    /// Configuration could not be loaded or validated
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
