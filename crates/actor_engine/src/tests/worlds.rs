use super::*;

#[test]
fn worlds_tick_independently() {
    let log = event_log();
    let mut engine = engine();
    let north = engine.create_world();
    let south = engine.create_world();
    engine
        .spawn(north, Recorder::new("n", &log), ActorDesc::default())
        .unwrap();
    engine
        .spawn(south, Recorder::new("s", &log), ActorDesc::default())
        .unwrap();

    engine.update_world(north, 0.1).unwrap();

    assert_eq!(labels(&log), vec!["n:added", "n:pre", "n:update", "n:post"]);
    assert_eq!(engine.world_clock(north).unwrap().tick(), 1);
    assert_eq!(engine.world_clock(south).unwrap().tick(), 0);
    assert_eq!(engine.staged_actors(south).unwrap().len(), 1);
}

#[test]
fn actors_in_different_worlds_never_overlap() {
    let log = event_log();
    let mut engine = engine();
    let north = engine.create_world();
    let south = engine.create_world();
    engine
        .spawn(north, Recorder::new("n", &log), ActorDesc::default().with_collision(square(2.0)))
        .unwrap();
    engine
        .spawn(south, Recorder::new("s", &log), ActorDesc::default().with_collision(square(2.0)))
        .unwrap();

    let reports = engine.update_all(0.1).unwrap();

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].world, north);
    assert_eq!(reports[1].world, south);
    assert!(overlaps_of(&log, "n")[0].is_empty());
    assert!(overlaps_of(&log, "s")[0].is_empty());
}

#[test]
fn destroying_a_world_releases_its_actors() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    let a = engine
        .spawn(world, Recorder::new("a", &log), ActorDesc::default())
        .unwrap();
    engine.update_world(world, 0.1).unwrap();
    let nodes_before = engine.graph().len();

    engine.destroy_world(world).unwrap();

    assert!(!engine.contains_actor(a));
    assert_eq!(engine.world_contains_actor(a), None);
    assert_eq!(engine.graph().len(), nodes_before - 1);
    assert_eq!(engine.worlds().count(), 0);
    assert!(matches!(
        engine.update_world(world, 0.1),
        Err(EngineError::UnknownWorld(id)) if id == world
    ));
    assert!(matches!(
        engine.destroy_world(world),
        Err(EngineError::UnknownWorld(_))
    ));
}

#[test]
fn unknown_ids_are_reported() {
    let mut engine = engine();
    let world = engine.create_world();
    let stray = ActorId::next();

    assert!(matches!(engine.stage(world, stray), Err(EngineError::UnknownActor(_))));
    assert!(matches!(engine.global_transform(stray), Err(EngineError::UnknownActor(_))));
    assert!(matches!(
        engine.spawn(WorldId::next(), OffWorld, ActorDesc::default()),
        Err(EngineError::UnknownWorld(_))
    ));
    assert!(matches!(
        engine.create_actor(OffWorld, ActorDesc::default().with_parent(stray)),
        Err(EngineError::UnknownActor(id)) if id == stray
    ));
    assert_eq!(engine.actor_count(), 0);
}

struct OffWorld;

impl Actor for OffWorld {}

#[test]
fn unstaged_actor_can_be_destroyed() {
    let mut engine = engine();
    let world = engine.create_world();
    let loose = engine.create_actor(OffWorld, ActorDesc::default()).unwrap();
    let member = engine.spawn(world, OffWorld, ActorDesc::default()).unwrap();

    engine.destroy_actor(loose).unwrap();
    assert!(!engine.contains_actor(loose));
    assert_eq!(engine.graph().len(), 1);

    assert!(matches!(
        engine.destroy_actor(member),
        Err(EngineError::AlreadyInWorld { .. })
    ));
}

#[test]
fn drawings_are_sorted_by_layer_then_actor() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    let top = engine
        .spawn(world, Recorder::new("top", &log).drawn_on(2), at(1.0, 2.0))
        .unwrap();
    let first = engine
        .spawn(world, Recorder::new("first", &log).drawn_on(1), ActorDesc::default())
        .unwrap();
    let second = engine
        .spawn(world, Recorder::new("second", &log).drawn_on(1), ActorDesc::default())
        .unwrap();
    engine
        .spawn(world, Recorder::new("hidden", &log), ActorDesc::default())
        .unwrap();

    assert!(engine.collect_drawing_representations(world).unwrap().is_empty());

    engine.update_world(world, 0.1).unwrap();
    let drawings = engine.collect_drawing_representations(world).unwrap();

    let order: Vec<_> = drawings.iter().map(|repr| repr.actor).collect();
    assert_eq!(order, vec![first, second, top]);
    assert_eq!(drawings[2].drawing, Drawing::new(2, "top"));
    assert_eq!(drawings[2].transform.translation_part(), Vec2::new(1.0, 2.0));
}

#[test]
fn invalid_config_is_rejected() {
    let result = Engine::new(EngineConfig::default().with_max_delta(0.0));
    assert!(matches!(result, Err(EngineError::Config(_))));
}

struct ShortGame {
    world: Option<WorldId>,
    frames: u32,
    cleaned_up: Rc<RefCell<Option<(u32, usize)>>>,
}

impl Application for ShortGame {
    fn initialize(&mut self, engine: &mut Engine) -> Result<(), AppError> {
        let world = engine.create_world();
        engine.spawn(world, OffWorld, ActorDesc::default().with_lifetime(10.0))?;
        self.world = Some(world);
        Ok(())
    }

    fn update(&mut self, engine: &mut Engine, _delta_time: f32) -> Result<(), AppError> {
        self.frames += 1;
        if self.frames == 3 {
            engine.quit();
        }
        Ok(())
    }

    fn cleanup(&mut self, engine: &mut Engine) {
        let ticks = self
            .world
            .and_then(|world| engine.world_clock(world).ok())
            .map_or(0, |clock| clock.tick());
        *self.cleaned_up.borrow_mut() = Some((self.frames, usize::try_from(ticks).unwrap_or(0)));
    }
}

#[test]
fn run_stops_when_the_application_quits() {
    let cleaned_up = Rc::new(RefCell::new(None));
    let mut game = ShortGame {
        world: None,
        frames: 0,
        cleaned_up: Rc::clone(&cleaned_up),
    };

    Engine::run(EngineConfig::default(), &mut game, 100, 1.0 / 60.0).unwrap();

    assert_eq!(*cleaned_up.borrow(), Some((3, 3)));
}

#[test]
fn run_stops_at_the_frame_limit() {
    let cleaned_up = Rc::new(RefCell::new(None));
    let mut game = ShortGame {
        world: None,
        frames: 0,
        cleaned_up: Rc::clone(&cleaned_up),
    };

    Engine::run(EngineConfig::default(), &mut game, 2, 1.0 / 60.0).unwrap();

    assert_eq!(*cleaned_up.borrow(), Some((2, 2)));
}
