//! Actor behaviors and their view of the engine
//!
//! Game code implements [`Actor`]. The engine owns each actor's
//! [`ActorBody`] (transform node, collision, timers, lifetime) and calls the
//! behavior with an [`ActorContext`] that exposes the body, the transform
//! graph and read-only lifecycle queries. Anything that would change
//! another actor's membership goes through the deferred [`Commands`] queue.

mod body;
pub(crate) mod commands;
mod context;
mod drawing;

pub use body::{ActorBody, ActorDesc};
pub use commands::Commands;
pub use context::ActorContext;
pub use drawing::{Drawing, DrawingRepresentation};

use crate::error::EngineResult;
use crate::lifecycle::{ActorId, TimerId};
use crate::physics::Overlap;

/// Per-actor callbacks, dispatched by the engine in tick order
///
/// Every callback has a no-op default. Returning an error aborts the
/// current tick step and propagates to the caller of
/// [`Engine::update_world`](crate::Engine::update_world).
pub trait Actor {
    /// The actor was promoted into its world's active set
    fn on_added(&mut self, _ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// First update phase; every active actor runs it before any `update`
    fn pre_update(&mut self, _ctx: &mut ActorContext<'_>, _delta_sec: f32) -> EngineResult<()> {
        Ok(())
    }

    /// Main update phase
    fn update(&mut self, _ctx: &mut ActorContext<'_>, _delta_sec: f32) -> EngineResult<()> {
        Ok(())
    }

    /// A timer scheduled on this actor fired during the update phase
    fn on_timer(&mut self, _ctx: &mut ActorContext<'_>, _timer: TimerId) -> EngineResult<()> {
        Ok(())
    }

    /// Last update phase; every active actor has finished `update`
    fn post_update(&mut self, _ctx: &mut ActorContext<'_>, _delta_sec: f32) -> EngineResult<()> {
        Ok(())
    }

    /// Overlaps computed from this tick's post-update transforms
    ///
    /// Called once per tick for every actor with enabled collision, with an
    /// empty slice when nothing overlaps.
    fn on_overlapped_with(
        &mut self,
        _ctx: &mut ActorContext<'_>,
        _others: &[Overlap<ActorId>],
    ) -> EngineResult<()> {
        Ok(())
    }

    /// Custom removal condition, evaluated at the end of each tick
    fn should_remove(&self, _ctx: &ActorContext<'_>) -> bool {
        false
    }

    /// The actor was purged; its node and collision are released afterwards
    fn on_removed(&mut self, _ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        Ok(())
    }

    /// What the renderer should draw for this actor, if anything
    fn drawing(&self) -> Option<Drawing> {
        None
    }
}
