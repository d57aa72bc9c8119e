//! # Actor Engine
//!
//! The simulation core of a 2D game: a transform hierarchy, broad-phase
//! overlap detection with collision groups, and an actor lifecycle driven
//! by a fixed per-tick sequence.
//!
//! ## Features
//!
//! - **Transform graph**: parent/child matrices with push-based propagation
//! - **Overlaps**: AABB broad phase (brute force or uniform grid) with
//!   category/mask filtering and sensor-only representations
//! - **Lifecycle**: staged, active and removing pools per world
//! - **Timers and waits**: simulated-time helpers with cancellation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use actor_engine::prelude::*;
//!
//! struct Mover;
//!
//! impl Actor for Mover {
//!     fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
//!         ctx.apply_local(&Mat3::translation(10.0 * delta_sec, 0.0))
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut engine = Engine::new(EngineConfig::default())?;
//!     let world = engine.create_world();
//!     engine.spawn(world, Mover, ActorDesc::default())?;
//!     engine.update_world(world, 1.0 / 60.0)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod actor;
pub mod config;
pub mod foundation;
pub mod lifecycle;
pub mod physics;
pub mod transform;

mod application;
mod engine;
mod error;

pub use application::{AppError, Application};
pub use engine::{Engine, TickReport, WorldClock};
pub use error::{EngineError, EngineResult};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        actor::{Actor, ActorContext, ActorDesc, Drawing, DrawingRepresentation},
        config::{BroadPhaseKind, Config, EngineConfig, MaskPolicy},
        foundation::math::{Mat3, Mat3Ext, Vec2},
        lifecycle::{ActorId, ActorState, CancellationToken, TimerId, Wait, WorldId},
        physics::{CollisionDesc, CollisionGroup, CollisionLayers, CollisionShape, Overlap},
        AppError, Application, Engine, EngineError, EngineResult, TickReport,
    };
}

#[cfg(test)]
mod tests;
