//! Broad-phase collision detection
//!
//! Shapes produce world-space boxes, [`Collision`] packages them with a
//! group and sensor flag once per tick, and the [`OverlapEngine`] turns the
//! resulting representations into an overlap relation. Response physics is
//! left to the game.

pub mod aabb;
pub mod broad_phase;
pub mod collision;
pub mod collision_layers;
pub mod overlap;
pub mod shape;

pub use aabb::AABB;
pub use broad_phase::{BroadPhase, BruteForce, UniformGrid};
pub use collision::{Collision, CollisionDesc, CollisionRepresentation};
pub use collision_layers::{CollisionGroup, CollisionLayers};
pub use overlap::{Overlap, OverlapEngine, OverlapMap};
pub use shape::CollisionShape;
