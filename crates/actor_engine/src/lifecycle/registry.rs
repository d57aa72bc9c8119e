//! Actor lifecycle registry
//!
//! Owns the authoritative actor → world mapping and, per world, three
//! disjoint pools:
//!
//! ```text
//! absent --stage--> staged --promote--> active --remove--> removing --purge--> absent
//!                     |                                       ^
//!                     +---------------remove------------------+
//! ```
//!
//! Pools are ordered sets keyed by [`ActorId`], so iteration follows
//! creation order and is identical from run to run.

use super::ids::{ActorId, WorldId};
use crate::error::{EngineError, EngineResult};
use std::collections::{BTreeSet, HashMap};

/// Pool an actor currently sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorState {
    /// Registered, not yet participating
    Staged,
    /// Participating in update, collision and drawing
    Active,
    /// Leaving at the next purge
    Removing,
}

#[derive(Debug, Default)]
struct WorldPools {
    staged: BTreeSet<ActorId>,
    active: BTreeSet<ActorId>,
    removing: BTreeSet<ActorId>,
    /// Actors materialized by the most recent promotion
    promoted: BTreeSet<ActorId>,
}

impl WorldPools {
    fn state_of(&self, actor: ActorId) -> Option<ActorState> {
        if self.active.contains(&actor) {
            Some(ActorState::Active)
        } else if self.staged.contains(&actor) {
            Some(ActorState::Staged)
        } else if self.removing.contains(&actor) {
            Some(ActorState::Removing)
        } else {
            None
        }
    }

    fn all(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.staged
            .iter()
            .chain(&self.active)
            .chain(&self.removing)
            .copied()
    }
}

/// Lifecycle registry shared by every world of an engine
#[derive(Debug, Default)]
pub struct ActorRegistry {
    worlds: HashMap<WorldId, WorldPools>,
    membership: HashMap<ActorId, WorldId>,
}

impl ActorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a world
    pub fn register_world(&mut self, world: WorldId) {
        self.worlds.entry(world).or_default();
    }

    /// Stop tracking a world, forgetting every actor it held
    ///
    /// Returns the forgotten actors in id order.
    pub fn unregister_world(&mut self, world: WorldId) -> EngineResult<Vec<ActorId>> {
        let pools = self.worlds.remove(&world).ok_or(EngineError::UnknownWorld(world))?;
        let mut forgotten: Vec<_> = pools.all().collect();
        forgotten.sort_unstable();
        for actor in &forgotten {
            self.membership.remove(actor);
        }
        Ok(forgotten)
    }

    /// Whether the world is tracked
    pub fn has_world(&self, world: WorldId) -> bool {
        self.worlds.contains_key(&world)
    }

    /// `absent → staged`
    ///
    /// An actor belongs to at most one world; staging an actor that is
    /// already registered anywhere is rejected.
    pub fn stage(&mut self, world: WorldId, actor: ActorId) -> EngineResult<()> {
        if let Some(&current) = self.membership.get(&actor) {
            return Err(EngineError::AlreadyInWorld { actor, world: current });
        }
        let pools = self.pools_mut(world)?;
        pools.staged.insert(actor);
        self.membership.insert(actor, world);
        log::trace!("{actor} staged in {world}");
        Ok(())
    }

    /// `staged → active` for every staged actor of the world, as one batch
    ///
    /// The staged pool is emptied and its actors are added to the active
    /// set; actors that were already active stay active. The batch becomes
    /// the world's promoted generation (see [`Self::last_promoted`]), which
    /// is the only set this call overwrites. Returns that generation.
    pub fn promote_staged_to_active(&mut self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        let pools = self.pools_mut(world)?;
        let generation = std::mem::take(&mut pools.staged);
        pools.active.extend(generation.iter().copied());
        pools.promoted = generation;
        if !pools.promoted.is_empty() {
            log::trace!("{} actors promoted in {world}", pools.promoted.len());
        }
        Ok(&pools.promoted)
    }

    /// `active | staged → removing`
    ///
    /// Removing an actor that is already leaving is a no-op. Naming a world
    /// the actor does not belong to is a contract violation.
    pub fn remove(&mut self, world: WorldId, actor: ActorId) -> EngineResult<()> {
        if self.membership.get(&actor) != Some(&world) {
            return Err(EngineError::NotInWorld { actor, world });
        }
        let pools = self.pools_mut(world)?;
        if pools.active.remove(&actor) || pools.staged.remove(&actor) {
            pools.removing.insert(actor);
            log::trace!("{actor} removing from {world}");
        }
        Ok(())
    }

    /// `removing → absent` for the whole removing pool
    ///
    /// Returns the purged actors in id order.
    pub fn purge_removing(&mut self, world: WorldId) -> EngineResult<Vec<ActorId>> {
        let pools = self.pools_mut(world)?;
        let purged: Vec<_> = std::mem::take(&mut pools.removing).into_iter().collect();
        pools.promoted.retain(|actor| !purged.contains(actor));
        for actor in &purged {
            self.membership.remove(actor);
        }
        Ok(purged)
    }

    /// Live active set of a world
    pub fn active_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        Ok(&self.pools(world)?.active)
    }

    /// Staged set of a world
    pub fn staged_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        Ok(&self.pools(world)?.staged)
    }

    /// Removing set of a world
    pub fn removing_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        Ok(&self.pools(world)?.removing)
    }

    /// Actors added to the active set by the last promotion
    pub fn last_promoted(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        Ok(&self.pools(world)?.promoted)
    }

    /// World the actor currently belongs to
    pub fn world_contains_actor(&self, actor: ActorId) -> Option<WorldId> {
        self.membership.get(&actor).copied()
    }

    /// Pool the actor currently sits in
    pub fn state_of(&self, actor: ActorId) -> Option<ActorState> {
        let world = self.membership.get(&actor)?;
        self.worlds.get(world)?.state_of(actor)
    }

    /// Number of actors registered with any world
    pub fn actor_count(&self) -> usize {
        self.membership.len()
    }

    fn pools(&self, world: WorldId) -> EngineResult<&WorldPools> {
        self.worlds.get(&world).ok_or(EngineError::UnknownWorld(world))
    }

    fn pools_mut(&mut self, world: WorldId) -> EngineResult<&mut WorldPools> {
        self.worlds.get_mut(&world).ok_or(EngineError::UnknownWorld(world))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_world() -> (ActorRegistry, WorldId) {
        let mut registry = ActorRegistry::new();
        let world = WorldId::next();
        registry.register_world(world);
        (registry, world)
    }

    #[test]
    fn staged_actor_becomes_active_on_promotion() {
        let (mut registry, world) = registry_with_world();
        let actor = ActorId::next();

        registry.stage(world, actor).unwrap();
        assert_eq!(registry.state_of(actor), Some(ActorState::Staged));
        assert!(!registry.active_actors(world).unwrap().contains(&actor));

        let promoted = registry.promote_staged_to_active(world).unwrap();
        assert!(promoted.contains(&actor));
        assert!(registry.active_actors(world).unwrap().contains(&actor));
        assert!(registry.staged_actors(world).unwrap().is_empty());
    }

    #[test]
    fn promotion_merges_into_active_and_replaces_generation() {
        let (mut registry, world) = registry_with_world();
        let first = ActorId::next();
        let second = ActorId::next();

        registry.stage(world, first).unwrap();
        registry.promote_staged_to_active(world).unwrap();
        registry.stage(world, second).unwrap();
        let generation = registry.promote_staged_to_active(world).unwrap().clone();

        assert_eq!(generation.into_iter().collect::<Vec<_>>(), vec![second]);
        let active = registry.active_actors(world).unwrap();
        assert!(active.contains(&first) && active.contains(&second));

        assert!(registry.promote_staged_to_active(world).unwrap().is_empty());
        assert!(registry.last_promoted(world).unwrap().is_empty());
        assert_eq!(registry.active_actors(world).unwrap().len(), 2);
        assert_eq!(registry.state_of(first), Some(ActorState::Active));
    }

    #[test]
    fn double_staging_is_rejected() {
        let (mut registry, world) = registry_with_world();
        let other_world = WorldId::next();
        registry.register_world(other_world);
        let actor = ActorId::next();
        registry.stage(world, actor).unwrap();

        assert!(matches!(
            registry.stage(world, actor),
            Err(EngineError::AlreadyInWorld { .. })
        ));
        assert!(matches!(
            registry.stage(other_world, actor),
            Err(EngineError::AlreadyInWorld { world: w, .. }) if w == world
        ));
        assert_eq!(registry.world_contains_actor(actor), Some(world));
    }

    #[test]
    fn removal_then_purge_forgets_actor() {
        let (mut registry, world) = registry_with_world();
        let actor = ActorId::next();
        registry.stage(world, actor).unwrap();
        registry.promote_staged_to_active(world).unwrap();

        registry.remove(world, actor).unwrap();
        assert_eq!(registry.state_of(actor), Some(ActorState::Removing));
        assert_eq!(registry.world_contains_actor(actor), Some(world));

        registry.remove(world, actor).unwrap();
        assert_eq!(registry.purge_removing(world).unwrap(), vec![actor]);

        assert_eq!(registry.world_contains_actor(actor), None);
        assert_eq!(registry.state_of(actor), None);
        assert!(registry.active_actors(world).unwrap().is_empty());
        assert!(registry.removing_actors(world).unwrap().is_empty());
    }

    #[test]
    fn removing_staged_actor_skips_activation() {
        let (mut registry, world) = registry_with_world();
        let actor = ActorId::next();
        registry.stage(world, actor).unwrap();

        registry.remove(world, actor).unwrap();
        assert!(registry.promote_staged_to_active(world).unwrap().is_empty());
        assert_eq!(registry.purge_removing(world).unwrap(), vec![actor]);
    }

    #[test]
    fn removal_from_wrong_world_is_rejected() {
        let (mut registry, world) = registry_with_world();
        let other = WorldId::next();
        registry.register_world(other);
        let actor = ActorId::next();
        registry.stage(world, actor).unwrap();

        assert!(matches!(
            registry.remove(other, actor),
            Err(EngineError::NotInWorld { .. })
        ));
        assert!(matches!(
            registry.remove(world, ActorId::next()),
            Err(EngineError::NotInWorld { .. })
        ));
    }

    #[test]
    fn purged_actor_can_join_another_world() {
        let (mut registry, world) = registry_with_world();
        let other = WorldId::next();
        registry.register_world(other);
        let actor = ActorId::next();
        registry.stage(world, actor).unwrap();
        registry.remove(world, actor).unwrap();
        registry.purge_removing(world).unwrap();

        registry.stage(other, actor).unwrap();
        assert_eq!(registry.world_contains_actor(actor), Some(other));
    }

    #[test]
    fn unregistering_world_forgets_every_pool() {
        let (mut registry, world) = registry_with_world();
        let staged = ActorId::next();
        let active = ActorId::next();
        registry.stage(world, active).unwrap();
        registry.promote_staged_to_active(world).unwrap();
        registry.stage(world, staged).unwrap();

        let forgotten = registry.unregister_world(world).unwrap();

        assert_eq!(forgotten, vec![active, staged]);
        assert_eq!(registry.actor_count(), 0);
        assert!(matches!(
            registry.active_actors(world),
            Err(EngineError::UnknownWorld(_))
        ));
    }
}
