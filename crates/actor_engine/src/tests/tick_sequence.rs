use super::*;

#[test]
fn callbacks_run_phase_by_phase() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    engine
        .spawn(world, Recorder::new("a", &log), at(0.0, 0.0).with_collision(square(1.0)))
        .unwrap();
    engine
        .spawn(world, Recorder::new("b", &log), at(50.0, 0.0).with_collision(square(1.0)))
        .unwrap();

    engine.update_world(world, 0.1).unwrap();

    assert_eq!(
        labels(&log),
        vec![
            "a:added", "b:added", "a:pre", "b:pre", "a:update", "b:update", "a:post", "b:post",
            "a:overlap", "b:overlap",
        ]
    );
    assert!(overlaps_of(&log, "a")[0].is_empty());
}

#[test]
fn overlap_sees_movement_from_the_same_tick() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    let a = engine
        .spawn(
            world,
            Recorder::new("a", &log).moving(100.0, 0.0),
            at(0.0, 0.0).with_collision(square(2.0)),
        )
        .unwrap();
    let b = engine
        .spawn(world, Recorder::new("b", &log), at(10.0, 0.0).with_collision(square(2.0)))
        .unwrap();

    let report = engine.update_world(world, 0.1).unwrap();

    assert_eq!(report.overlapping_pairs, 1);
    assert_eq!(
        overlaps_of(&log, "a"),
        vec![vec![Overlap {
            other: b,
            is_excess: false
        }]]
    );
    assert_eq!(
        overlaps_of(&log, "b"),
        vec![vec![Overlap {
            other: a,
            is_excess: false
        }]]
    );
}

#[test]
fn timers_fire_between_update_and_post_update() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    engine
        .spawn(world, Recorder::new("a", &log).with_timer(0.15), ActorDesc::default())
        .unwrap();

    engine.update_world(world, 0.1).unwrap();
    assert!(!labels(&log).contains(&"a:timer".to_string()));

    log.borrow_mut().clear();
    engine.update_world(world, 0.1).unwrap();
    assert_eq!(labels(&log), vec!["a:pre", "a:update", "a:timer", "a:post"]);
}

#[test]
fn report_counts_each_step() {
    let log = event_log();
    let mut engine = engine();
    let world = engine.create_world();
    let a = engine
        .spawn(world, Recorder::new("a", &log), ActorDesc::default())
        .unwrap();

    let first = engine.update_world(world, 0.1).unwrap();
    assert_eq!(first.tick, 1);
    assert_eq!(first.promoted, vec![a]);
    assert_eq!(first.updated, 1);
    assert!(first.purged.is_empty());

    engine.remove(world, a).unwrap();
    let second = engine.update_world(world, 0.1).unwrap();
    assert_eq!(second.tick, 2);
    assert!(second.promoted.is_empty());
    assert_eq!(second.updated, 0);
    assert_eq!(second.purged, vec![a]);
}
