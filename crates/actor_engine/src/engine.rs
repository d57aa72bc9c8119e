//! World orchestration
//!
//! [`Engine`] owns the transform graph, the lifecycle registry, the overlap
//! engine and every actor. Worlds are advanced one tick at a time with
//! [`Engine::update_world`], which runs the fixed tick sequence:
//!
//! 1. promote staged actors and notify them
//! 2. pre-update, update (with timers and lifetime), post-update
//! 3. compute overlaps from the post-update transforms and notify
//! 4. evaluate removal and move leaving actors to the removing pool
//! 5. purge the removing pool
//!
//! Deferred commands issued from callbacks are applied after every step.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::actor::commands::Command;
use crate::actor::{Actor, ActorBody, ActorContext, ActorDesc, Commands, DrawingRepresentation};
use crate::application::{AppError, Application};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::foundation::collections::NodeId;
use crate::foundation::math::Mat3;
use crate::foundation::time::{Stopwatch, TickClock};
use crate::lifecycle::{ActorId, ActorRegistry, ActorState, WorldId};
use crate::physics::{broad_phase, OverlapEngine};
use crate::transform::TransformGraph;

struct ActorSlot {
    actor: Box<dyn Actor>,
    body: ActorBody,
}

/// Clock and time scale of one world
#[derive(Debug, Clone)]
pub struct WorldClock {
    clock: TickClock,
    time_scale: f32,
}

impl WorldClock {
    fn new(time_scale: f32) -> Self {
        Self {
            clock: TickClock::new(),
            time_scale,
        }
    }

    /// Ticks completed
    pub fn tick(&self) -> u64 {
        self.clock.tick()
    }

    /// Simulated seconds elapsed
    pub fn elapsed_sec(&self) -> f64 {
        self.clock.elapsed_sec()
    }

    /// Multiplier applied to every delta of this world
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }
}

/// Summary of one world tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// World that was advanced
    pub world: WorldId,
    /// Tick number after advancing, starting at 1
    pub tick: u64,
    /// World-scaled delta consumed by the tick
    pub delta_sec: f32,
    /// Actors promoted at the start of the tick
    pub promoted: Vec<ActorId>,
    /// Actors that ran the update phases
    pub updated: usize,
    /// Distinct overlapping actor pairs
    pub overlapping_pairs: usize,
    /// Actors destroyed at the end of the tick
    pub purged: Vec<ActorId>,
}

/// Main engine struct
///
/// Owns every world and actor. Callbacks see the engine only through an
/// [`ActorContext`]; the engine itself is driven from outside, by a game
/// loop or by [`Engine::run`].
pub struct Engine {
    config: EngineConfig,
    registry: ActorRegistry,
    graph: TransformGraph,
    overlap: OverlapEngine,
    worlds: BTreeMap<WorldId, WorldClock>,
    actors: HashMap<ActorId, ActorSlot>,
    nodes: HashMap<ActorId, NodeId>,
    commands: Commands,
    running: bool,
}

impl Engine {
    /// Create an engine from a validated configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let broad_phase = broad_phase::from_config(&config.broad_phase);
        log::info!(
            "Initializing engine: {} broad phase, {:?} mask policy",
            broad_phase.name(),
            config.mask_policy
        );
        let overlap = OverlapEngine::new(broad_phase, config.mask_policy);

        Ok(Self {
            config,
            registry: ActorRegistry::new(),
            graph: TransformGraph::new(),
            overlap,
            worlds: BTreeMap::new(),
            actors: HashMap::new(),
            nodes: HashMap::new(),
            commands: Commands::default(),
            running: true,
        })
    }

    /// Run `app` for at most `max_frames` frames of `fixed_delta` seconds
    ///
    /// Each frame calls [`Application::update`] and then advances every
    /// world. The loop ends early once [`quit`](Self::quit) is called.
    pub fn run<T: Application>(
        config: EngineConfig,
        app: &mut T,
        max_frames: u64,
        fixed_delta: f32,
    ) -> Result<(), AppError> {
        let mut engine = Self::new(config)?;
        app.initialize(&mut engine)?;

        log::info!("Starting main loop...");
        let mut frame = 0;
        while engine.running && frame < max_frames {
            app.update(&mut engine, fixed_delta)?;
            engine.update_all(fixed_delta)?;
            frame += 1;
        }

        app.cleanup(&mut engine);
        log::info!("Engine shutdown complete after {frame} frames");
        Ok(())
    }

    /// Request shutdown of [`run`](Self::run)
    pub fn quit(&mut self) {
        log::info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether [`quit`](Self::quit) has not been called
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // --- worlds ---

    /// Create an empty world using the configured time scale
    pub fn create_world(&mut self) -> WorldId {
        let world = WorldId::next();
        self.registry.register_world(world);
        self.worlds.insert(world, WorldClock::new(self.config.time_scale));
        log::info!("Created {world}");
        world
    }

    /// Destroy a world and every actor registered with it
    ///
    /// Destroyed actors receive no further callbacks.
    pub fn destroy_world(&mut self, world: WorldId) -> EngineResult<()> {
        if self.worlds.remove(&world).is_none() {
            return Err(EngineError::UnknownWorld(world));
        }
        let forgotten = self.registry.unregister_world(world)?;
        for &actor in &forgotten {
            self.release_actor(actor)?;
        }
        log::info!("Destroyed {world} with {} actors", forgotten.len());
        Ok(())
    }

    /// Worlds in creation order
    pub fn worlds(&self) -> impl Iterator<Item = WorldId> + '_ {
        self.worlds.keys().copied()
    }

    /// Clock of a world
    pub fn world_clock(&self, world: WorldId) -> EngineResult<&WorldClock> {
        self.worlds.get(&world).ok_or(EngineError::UnknownWorld(world))
    }

    /// Change a world's time scale; zero pauses the world
    pub fn set_world_time_scale(&mut self, world: WorldId, time_scale: f32) -> EngineResult<()> {
        let clock = self.worlds.get_mut(&world).ok_or(EngineError::UnknownWorld(world))?;
        if !time_scale.is_finite() || time_scale < 0.0 {
            return Err(EngineError::InvalidTimeScale(time_scale));
        }
        clock.time_scale = time_scale;
        Ok(())
    }

    // --- actors ---

    /// Create an actor that belongs to no world yet
    pub fn create_actor<A>(&mut self, actor: A, desc: ActorDesc) -> EngineResult<ActorId>
    where
        A: Actor + 'static,
    {
        self.insert_actor(ActorId::next(), Box::new(actor), desc)
    }

    /// Stage a created actor in a world; it joins on the next tick
    pub fn stage(&mut self, world: WorldId, actor: ActorId) -> EngineResult<()> {
        if !self.actors.contains_key(&actor) {
            return Err(EngineError::UnknownActor(actor));
        }
        self.registry.stage(world, actor)
    }

    /// Create an actor and stage it in `world`
    pub fn spawn<A>(&mut self, world: WorldId, actor: A, desc: ActorDesc) -> EngineResult<ActorId>
    where
        A: Actor + 'static,
    {
        if !self.worlds.contains_key(&world) {
            return Err(EngineError::UnknownWorld(world));
        }
        let id = self.create_actor(actor, desc)?;
        self.registry.stage(world, id)?;
        Ok(id)
    }

    /// Move an active or staged actor to the removing pool
    ///
    /// It is purged at the end of the next tick of `world`. Removing an
    /// actor that is already leaving does nothing.
    pub fn remove(&mut self, world: WorldId, actor: ActorId) -> EngineResult<()> {
        self.registry.remove(world, actor)
    }

    /// Destroy an actor that belongs to no world
    pub fn destroy_actor(&mut self, actor: ActorId) -> EngineResult<()> {
        if let Some(world) = self.registry.world_contains_actor(actor) {
            return Err(EngineError::AlreadyInWorld { actor, world });
        }
        self.release_actor(actor)
    }

    /// Active actors of a world, in id order
    pub fn active_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        self.registry.active_actors(world)
    }

    /// Staged actors of a world
    pub fn staged_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        self.registry.staged_actors(world)
    }

    /// Actors of a world waiting to be purged
    pub fn removing_actors(&self, world: WorldId) -> EngineResult<&BTreeSet<ActorId>> {
        self.registry.removing_actors(world)
    }

    /// World currently holding the actor
    pub fn world_contains_actor(&self, actor: ActorId) -> Option<WorldId> {
        self.registry.world_contains_actor(actor)
    }

    /// Lifecycle pool of the actor; `None` when absent
    pub fn actor_state(&self, actor: ActorId) -> Option<ActorState> {
        self.registry.state_of(actor)
    }

    /// Whether the actor exists, in a world or not
    pub fn contains_actor(&self, actor: ActorId) -> bool {
        self.actors.contains_key(&actor)
    }

    /// Number of live actors
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Engine-side state of an actor
    pub fn body(&self, actor: ActorId) -> EngineResult<&ActorBody> {
        self.actors
            .get(&actor)
            .map(|slot| &slot.body)
            .ok_or(EngineError::UnknownActor(actor))
    }

    /// Engine-side state of an actor, mutable
    pub fn body_mut(&mut self, actor: ActorId) -> EngineResult<&mut ActorBody> {
        self.actors
            .get_mut(&actor)
            .map(|slot| &mut slot.body)
            .ok_or(EngineError::UnknownActor(actor))
    }

    // --- transforms ---

    /// Transform graph shared by every world
    pub fn graph(&self) -> &TransformGraph {
        &self.graph
    }

    /// Local matrix of an actor
    pub fn local_transform(&self, actor: ActorId) -> EngineResult<Mat3> {
        self.graph.local(self.node_of(actor)?)
    }

    /// Global matrix of an actor
    pub fn global_transform(&self, actor: ActorId) -> EngineResult<Mat3> {
        self.graph.global(self.node_of(actor)?)
    }

    /// Replace an actor's local matrix
    pub fn set_local_transform(&mut self, actor: ActorId, local: Mat3) -> EngineResult<()> {
        let node = self.node_of(actor)?;
        self.graph.set_local(node, local)
    }

    /// Parent `child`'s transform to `parent`'s
    pub fn attach(&mut self, child: ActorId, parent: ActorId) -> EngineResult<()> {
        let (child_node, parent_node) = (self.node_of(child)?, self.node_of(parent)?);
        self.graph.attach_to(child_node, parent_node)
    }

    /// Detach an actor's transform from its parent
    pub fn detach(&mut self, actor: ActorId) -> EngineResult<()> {
        let node = self.node_of(actor)?;
        self.graph.detach_from_parent(node)
    }

    // --- ticking ---

    /// Advance every world by `delta_sec`, in creation order
    pub fn update_all(&mut self, delta_sec: f32) -> EngineResult<Vec<TickReport>> {
        let worlds: Vec<WorldId> = self.worlds.keys().copied().collect();
        worlds
            .into_iter()
            .map(|world| self.update_world(world, delta_sec))
            .collect()
    }

    /// Advance one world by one tick
    pub fn update_world(&mut self, world: WorldId, delta_sec: f32) -> EngineResult<TickReport> {
        let stopwatch = Stopwatch::start_new();
        let delta = self.clamp_delta(delta_sec);
        let clock = self.worlds.get_mut(&world).ok_or(EngineError::UnknownWorld(world))?;
        let world_delta = delta * clock.time_scale;
        clock.clock.advance(world_delta);
        let tick = clock.clock.tick();

        let promoted: Vec<ActorId> = self
            .registry
            .promote_staged_to_active(world)?
            .iter()
            .copied()
            .collect();
        for &actor in &promoted {
            self.dispatch(world, actor, |actor, ctx| actor.on_added(ctx))?;
        }
        self.apply_commands()?;

        let active: Vec<ActorId> = self.registry.active_actors(world)?.iter().copied().collect();

        for &actor in &active {
            self.dispatch(world, actor, |actor, ctx| {
                let delta = ctx.body.scaled_delta(world_delta);
                actor.pre_update(ctx, delta)
            })?;
        }
        self.apply_commands()?;

        for &actor in &active {
            self.dispatch(world, actor, |actor, ctx| {
                let delta = ctx.body.scaled_delta(world_delta);
                actor.update(ctx, delta)?;
                for timer in ctx.body.timers.advance(delta) {
                    actor.on_timer(ctx, timer)?;
                }
                ctx.body.consume_lifetime(delta);
                Ok(())
            })?;
        }
        self.apply_commands()?;

        for &actor in &active {
            self.dispatch(world, actor, |actor, ctx| {
                let delta = ctx.body.scaled_delta(world_delta);
                actor.post_update(ctx, delta)
            })?;
        }
        self.apply_commands()?;

        let overlapping_pairs = self.notify_overlaps(world, &active)?;
        self.apply_commands()?;

        let mut leaving = Vec::new();
        for &actor in &active {
            if self.registry.state_of(actor) != Some(ActorState::Active) {
                continue;
            }
            let remove = self.dispatch(world, actor, |actor, ctx| {
                Ok(ctx.body.removal_requested() || ctx.body.lifetime_exhausted() || actor.should_remove(ctx))
            })?;
            if remove {
                leaving.push(actor);
            }
        }
        for &actor in &leaving {
            self.registry.remove(world, actor)?;
        }

        let purged = self.registry.purge_removing(world)?;
        for &actor in &purged {
            self.dispatch(world, actor, |actor, ctx| actor.on_removed(ctx))?;
            self.release_actor(actor)?;
        }
        self.apply_commands()?;

        log::debug!(
            "{world} tick {tick}: {} promoted, {} updated, {overlapping_pairs} overlapping pairs, {} purged in {:.3} ms",
            promoted.len(),
            active.len(),
            purged.len(),
            stopwatch.elapsed_millis()
        );

        Ok(TickReport {
            world,
            tick,
            delta_sec: world_delta,
            promoted,
            updated: active.len(),
            overlapping_pairs,
            purged,
        })
    }

    /// Drawings of a world's active actors, ordered by layer then actor id
    pub fn collect_drawing_representations(&self, world: WorldId) -> EngineResult<Vec<DrawingRepresentation>> {
        let mut drawings = Vec::new();
        for &actor in self.registry.active_actors(world)? {
            let slot = self.actors.get(&actor).ok_or(EngineError::UnknownActor(actor))?;
            if let Some(drawing) = slot.actor.drawing() {
                drawings.push(DrawingRepresentation {
                    actor,
                    transform: self.graph.global(slot.body.node())?,
                    drawing,
                });
            }
        }
        drawings.sort_by_key(|repr| (repr.drawing.layer, repr.actor));
        Ok(drawings)
    }

    fn notify_overlaps(&mut self, world: WorldId, active: &[ActorId]) -> EngineResult<usize> {
        let mut representations = Vec::new();
        for &actor in active {
            let slot = self.actors.get(&actor).ok_or(EngineError::UnknownActor(actor))?;
            if !slot.body.collision.is_enabled() {
                continue;
            }
            let global = self.graph.global(slot.body.node())?;
            if let Some(repr) = slot.body.collision.calc_representation(&global) {
                representations.push((actor, repr));
            }
        }

        let entries: Vec<_> = representations.iter().map(|(actor, repr)| (*actor, repr)).collect();
        let overlaps = self.overlap.calc_overlap_all_vs_all(&entries);
        let pairs = overlaps
            .iter()
            .flat_map(|(&actor, others)| others.iter().map(move |o| (actor.min(o.other), actor.max(o.other))))
            .collect::<BTreeSet<_>>()
            .len();

        for &(actor, _) in &entries {
            let others = overlaps.get(&actor).map(Vec::as_slice).unwrap_or_default();
            self.dispatch(world, actor, |actor, ctx| actor.on_overlapped_with(ctx, others))?;
        }
        Ok(pairs)
    }

    fn dispatch<R, F>(&mut self, world: WorldId, actor: ActorId, f: F) -> EngineResult<R>
    where
        F: FnOnce(&mut dyn Actor, &mut ActorContext<'_>) -> EngineResult<R>,
    {
        let slot = self.actors.get_mut(&actor).ok_or(EngineError::UnknownActor(actor))?;
        let mut ctx = ActorContext {
            world,
            body: &mut slot.body,
            graph: &mut self.graph,
            registry: &self.registry,
            nodes: &self.nodes,
            commands: &mut self.commands,
        };
        f(slot.actor.as_mut(), &mut ctx)
    }

    fn apply_commands(&mut self) -> EngineResult<()> {
        for command in self.commands.drain() {
            match command {
                Command::Spawn {
                    world,
                    id,
                    actor,
                    desc,
                } => {
                    self.insert_actor(id, actor, desc)?;
                    self.registry.stage(world, id)?;
                }
                Command::Remove(actor) => self.remove_deferred(actor)?,
            }
        }
        Ok(())
    }

    /// Removal requested from a callback
    ///
    /// Active actors are flagged and leave at the end of the tick, after
    /// overlaps; staged actors go straight to the removing pool. Targets
    /// that are already gone are ignored.
    fn remove_deferred(&mut self, actor: ActorId) -> EngineResult<()> {
        let Some(world) = self.registry.world_contains_actor(actor) else {
            log::debug!("Ignoring removal of {actor}, which belongs to no world");
            return Ok(());
        };
        match self.registry.state_of(actor) {
            Some(ActorState::Active) => {
                self.body_mut(actor)?.request_removal();
                Ok(())
            }
            Some(ActorState::Staged) => self.registry.remove(world, actor),
            Some(ActorState::Removing) | None => Ok(()),
        }
    }

    fn insert_actor(&mut self, id: ActorId, actor: Box<dyn Actor>, desc: ActorDesc) -> EngineResult<ActorId> {
        if !desc.time_scale.is_finite() || desc.time_scale < 0.0 {
            return Err(EngineError::InvalidTimeScale(desc.time_scale));
        }
        let parent_node = desc.parent.map(|parent| self.node_of(parent)).transpose()?;

        let node = self.graph.create_node(desc.local);
        if let Some(parent_node) = parent_node {
            self.graph.attach_to(node, parent_node)?;
        }
        let mut body = ActorBody::new(id, node, &desc);
        if let Some(collision) = desc.collision {
            body.collision.init(collision)?;
        }

        self.nodes.insert(id, node);
        self.actors.insert(id, ActorSlot { actor, body });
        log::trace!("Created {id}");
        Ok(id)
    }

    fn release_actor(&mut self, actor: ActorId) -> EngineResult<()> {
        let slot = self.actors.remove(&actor).ok_or(EngineError::UnknownActor(actor))?;
        self.nodes.remove(&actor);
        self.graph.destroy_node(slot.body.node())?;
        log::trace!("Released {actor}");
        Ok(())
    }

    fn node_of(&self, actor: ActorId) -> EngineResult<NodeId> {
        self.nodes.get(&actor).copied().ok_or(EngineError::UnknownActor(actor))
    }

    fn clamp_delta(&self, delta_sec: f32) -> f32 {
        if !delta_sec.is_finite() || delta_sec < 0.0 {
            log::warn!("Ignoring invalid tick delta {delta_sec}");
            return 0.0;
        }
        if delta_sec > self.config.max_delta_sec {
            log::warn!(
                "Tick delta {delta_sec:.3}s exceeds limit, clamping to {:.3}s",
                self.config.max_delta_sec
            );
            return self.config.max_delta_sec;
        }
        delta_sec
    }
}
