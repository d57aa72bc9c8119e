//! Actor lifecycle
//!
//! Identities, the staged/active/removing registry, and the time-based
//! helpers (timers, waits) that run on tick boundaries.

mod ids;
pub mod registry;
pub mod timer;
pub mod wait;

pub use ids::{ActorId, WorldId};
pub use registry::{ActorRegistry, ActorState};
pub use timer::{TimerId, TimerSet};
pub use wait::{CancellationToken, Wait, WaitCancelled};
