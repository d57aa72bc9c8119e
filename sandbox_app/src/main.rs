//! Asteroid field sandbox
//!
//! A ship with a rotating turret drifts through a field of asteroids and
//! shoots at them. Runs headless for a fixed number of frames and logs what
//! happens. Pass a `.toml` or `.ron` engine config path as the first
//! argument to override the defaults.

use std::cell::Cell;
use std::rc::Rc;

use actor_engine::foundation::logging;
use actor_engine::prelude::*;
use rand::Rng;

const FRAMES: u64 = 600;
const FIXED_DELTA: f32 = 1.0 / 60.0;
const FIELD_HALF_SIZE: f32 = 400.0;
const INITIAL_ASTEROIDS: usize = 24;
const MIN_ASTEROIDS: usize = 8;
const ASTEROID_MAX_SPEED: f32 = 60.0;
const SHIP_SPEED: f32 = 80.0;
const TURRET_SPIN: f32 = 2.5;
const FIRE_PERIOD: f32 = 0.2;
const BULLET_SPEED: f32 = 400.0;
const BULLET_LIFETIME: f32 = 1.5;

/// Counters shared between actors and the application
#[derive(Default)]
struct Stats {
    shots: Cell<u32>,
    hits: Cell<u32>,
    ship_hits: Cell<u32>,
}

impl Stats {
    fn bump(counter: &Cell<u32>) {
        counter.set(counter.get() + 1);
    }
}

struct Ship {
    stats: Rc<Stats>,
}

impl Actor for Ship {
    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        ctx.apply_local(&Mat3::translation(SHIP_SPEED * delta_sec, 0.0))?;
        let x = ctx.global()?.translation_part().x;
        if x > FIELD_HALF_SIZE {
            ctx.set_local(Mat3::translation(-FIELD_HALF_SIZE, 0.0))?;
        }
        Ok(())
    }

    fn on_overlapped_with(&mut self, _ctx: &mut ActorContext<'_>, others: &[Overlap<ActorId>]) -> EngineResult<()> {
        for _ in others.iter().filter(|overlap| !overlap.is_excess) {
            Stats::bump(&self.stats.ship_hits);
        }
        Ok(())
    }

    fn drawing(&self) -> Option<Drawing> {
        Some(Drawing::new(1, "ship"))
    }
}

/// Rotates with its parent ship and fires along its own heading
struct Turret {
    stats: Rc<Stats>,
}

impl Actor for Turret {
    fn on_added(&mut self, ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        ctx.timers().schedule_repeating(FIRE_PERIOD);
        Ok(())
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        let local = ctx.local()?;
        ctx.set_local(local * Mat3::rotation(TURRET_SPIN * delta_sec))
    }

    fn on_timer(&mut self, ctx: &mut ActorContext<'_>, _timer: TimerId) -> EngineResult<()> {
        let global = ctx.global()?;
        let muzzle = global.apply_point(12.0, 0.0);
        let heading = global.transform_vector(&Vec2::new(1.0, 0.0)).normalize();

        let collision = CollisionDesc::new(
            CollisionShape::circle(2.0),
            CollisionGroup::new(CollisionLayers::PLAYER_BULLET, CollisionLayers::ENEMY),
        )
        .as_excess();
        ctx.spawn(
            Bullet {
                velocity: heading * BULLET_SPEED,
            },
            ActorDesc::at(Mat3::translation(muzzle.x, muzzle.y))
                .with_collision(collision)
                .with_lifetime(BULLET_LIFETIME),
        );
        Stats::bump(&self.stats.shots);
        Ok(())
    }

    fn drawing(&self) -> Option<Drawing> {
        Some(Drawing::new(2, "turret"))
    }
}

struct Bullet {
    velocity: Vec2,
}

impl Actor for Bullet {
    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        let step = self.velocity * delta_sec;
        ctx.apply_local(&Mat3::translation(step.x, step.y))
    }

    fn on_overlapped_with(&mut self, ctx: &mut ActorContext<'_>, others: &[Overlap<ActorId>]) -> EngineResult<()> {
        if !others.is_empty() {
            ctx.request_removal();
        }
        Ok(())
    }

    fn drawing(&self) -> Option<Drawing> {
        Some(Drawing::new(3, "bullet"))
    }
}

struct Asteroid {
    velocity: Vec2,
    spin: f32,
    stats: Rc<Stats>,
}

impl Actor for Asteroid {
    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        let step = self.velocity * delta_sec;
        ctx.apply_local(&Mat3::translation(step.x, step.y))?;
        let local = ctx.local()?;
        ctx.set_local(local * Mat3::rotation(self.spin * delta_sec))
    }

    fn on_overlapped_with(&mut self, ctx: &mut ActorContext<'_>, others: &[Overlap<ActorId>]) -> EngineResult<()> {
        if others.iter().any(|overlap| overlap.is_excess) {
            Stats::bump(&self.stats.hits);
            ctx.request_removal();
        }
        Ok(())
    }

    fn should_remove(&self, ctx: &ActorContext<'_>) -> bool {
        ctx.global().map_or(true, |global| {
            let position = global.translation_part();
            position.x.abs() > FIELD_HALF_SIZE * 1.5 || position.y.abs() > FIELD_HALF_SIZE * 1.5
        })
    }

    fn on_removed(&mut self, ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        log::trace!("Asteroid {} left the field", ctx.id());
        Ok(())
    }

    fn drawing(&self) -> Option<Drawing> {
        Some(Drawing::new(0, "asteroid"))
    }
}

struct AsteroidField {
    world: Option<WorldId>,
    stats: Rc<Stats>,
    frame: u64,
}

impl AsteroidField {
    fn new() -> Self {
        Self {
            world: None,
            stats: Rc::new(Stats::default()),
            frame: 0,
        }
    }

    fn world(&self) -> Result<WorldId, AppError> {
        self.world
            .ok_or_else(|| AppError::GameLogic("world not initialized".to_string()))
    }

    fn spawn_asteroid(&self, engine: &mut Engine, world: WorldId) -> Result<ActorId, AppError> {
        let mut rng = rand::thread_rng();
        let position = Vec2::new(
            rng.gen_range(-FIELD_HALF_SIZE..FIELD_HALF_SIZE),
            rng.gen_range(-FIELD_HALF_SIZE..FIELD_HALF_SIZE),
        );
        let velocity = Vec2::new(
            rng.gen_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
            rng.gen_range(-ASTEROID_MAX_SPEED..ASTEROID_MAX_SPEED),
        );
        let radius = rng.gen_range(8.0..24.0);

        let collision = CollisionDesc::new(
            CollisionShape::circle(radius),
            CollisionGroup::new(
                CollisionLayers::ENEMY,
                CollisionLayers::PLAYER | CollisionLayers::PLAYER_BULLET,
            ),
        );
        let asteroid = Asteroid {
            velocity,
            spin: rng.gen_range(-1.0..1.0),
            stats: Rc::clone(&self.stats),
        };
        let desc = ActorDesc::at(Mat3::translation(position.x, position.y)).with_collision(collision);
        Ok(engine.spawn(world, asteroid, desc)?)
    }
}

impl Application for AsteroidField {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let world = engine.create_world();
        self.world = Some(world);

        let ship_collision = CollisionDesc::new(
            CollisionShape::rect(20.0, 12.0),
            CollisionGroup::new(CollisionLayers::PLAYER, CollisionLayers::ENEMY),
        );
        let ship = engine.spawn(
            world,
            Ship {
                stats: Rc::clone(&self.stats),
            },
            ActorDesc::at(Mat3::translation(-FIELD_HALF_SIZE, 0.0)).with_collision(ship_collision),
        )?;
        engine.spawn(
            world,
            Turret {
                stats: Rc::clone(&self.stats),
            },
            ActorDesc::default().with_parent(ship),
        )?;

        for _ in 0..INITIAL_ASTEROIDS {
            self.spawn_asteroid(engine, world)?;
        }

        log::info!("Asteroid field ready with {} actors", engine.actor_count());
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        let world = self.world()?;
        self.frame += 1;

        let asteroids = engine
            .collect_drawing_representations(world)?
            .iter()
            .filter(|repr| repr.drawing.sprite == "asteroid")
            .count();
        if self.frame > 1 && asteroids < MIN_ASTEROIDS {
            for _ in asteroids..INITIAL_ASTEROIDS {
                self.spawn_asteroid(engine, world)?;
            }
            log::info!("Frame {}: asteroid wave respawned", self.frame);
        }

        if self.frame % 120 == 0 {
            log::info!(
                "Frame {}: {} active actors, {} shots, {} hits, {} ship hits",
                self.frame,
                engine.active_actors(world)?.len(),
                self.stats.shots.get(),
                self.stats.hits.get(),
                self.stats.ship_hits.get()
            );
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        if let Some(clock) = self.world.and_then(|world| engine.world_clock(world).ok()) {
            log::info!(
                "Simulated {:.1}s over {} ticks: {} shots, {} hits",
                clock.elapsed_sec(),
                clock.tick(),
                self.stats.shots.get(),
                self.stats.hits.get()
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading engine config from {path}");
            EngineConfig::load_from_file(&path)?
        }
        None => EngineConfig::default(),
    };

    log::info!("Starting asteroid field sandbox");
    let mut app = AsteroidField::new();
    Engine::run(config, &mut app, FRAMES, FIXED_DELTA)?;
    Ok(())
}
