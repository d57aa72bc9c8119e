//! Engine-level scenarios
//!
//! Unit tests live next to each module; these exercise whole ticks through
//! the public [`Engine`] API.

mod tick_sequence;
mod worlds;

use std::cell::RefCell;
use std::rc::Rc;

use crate::prelude::*;

/// A callback observed by [`Recorder`]
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    Added,
    Pre(f32),
    Update(f32),
    Timer(TimerId),
    Post(f32),
    Overlap(Vec<Overlap<ActorId>>),
    Removed,
}

impl Event {
    fn label(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Pre(_) => "pre",
            Self::Update(_) => "update",
            Self::Timer(_) => "timer",
            Self::Post(_) => "post",
            Self::Overlap(_) => "overlap",
            Self::Removed => "removed",
        }
    }
}

pub(crate) type EventLog = Rc<RefCell<Vec<(&'static str, Event)>>>;

pub(crate) fn event_log() -> EventLog {
    Rc::default()
}

/// `name:label` for every recorded event, in order
pub(crate) fn labels(log: &EventLog) -> Vec<String> {
    log.borrow()
        .iter()
        .map(|(name, event)| format!("{name}:{}", event.label()))
        .collect()
}

/// Overlap lists delivered to `name`, one per tick
pub(crate) fn overlaps_of(log: &EventLog, name: &str) -> Vec<Vec<Overlap<ActorId>>> {
    log.borrow()
        .iter()
        .filter(|(who, _)| *who == name)
        .filter_map(|(_, event)| match event {
            Event::Overlap(others) => Some(others.clone()),
            _ => None,
        })
        .collect()
}

/// Actor that records its callbacks
pub(crate) struct Recorder {
    name: &'static str,
    log: EventLog,
    velocity: Vec2,
    timer_after: Option<f32>,
    remove_on_update: bool,
    layer: Option<i32>,
}

impl Recorder {
    pub(crate) fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            velocity: Vec2::zeros(),
            timer_after: None,
            remove_on_update: false,
            layer: None,
        }
    }

    /// Move by `velocity * delta` in every update
    pub(crate) fn moving(mut self, vx: f32, vy: f32) -> Self {
        self.velocity = Vec2::new(vx, vy);
        self
    }

    /// Schedule a one-shot timer when added
    pub(crate) fn with_timer(mut self, after_sec: f32) -> Self {
        self.timer_after = Some(after_sec);
        self
    }

    /// Request removal during the first update
    pub(crate) fn removing_itself(mut self) -> Self {
        self.remove_on_update = true;
        self
    }

    /// Draw on `layer`
    pub(crate) fn drawn_on(mut self, layer: i32) -> Self {
        self.layer = Some(layer);
        self
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push((self.name, event));
    }
}

impl Actor for Recorder {
    fn on_added(&mut self, ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        if let Some(after) = self.timer_after {
            ctx.timers().schedule(after);
        }
        self.record(Event::Added);
        Ok(())
    }

    fn pre_update(&mut self, _ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        self.record(Event::Pre(delta_sec));
        Ok(())
    }

    fn update(&mut self, ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        let step = self.velocity * delta_sec;
        if step != Vec2::zeros() {
            ctx.apply_local(&Mat3::translation(step.x, step.y))?;
        }
        if self.remove_on_update {
            ctx.request_removal();
        }
        self.record(Event::Update(delta_sec));
        Ok(())
    }

    fn on_timer(&mut self, _ctx: &mut ActorContext<'_>, timer: TimerId) -> EngineResult<()> {
        self.record(Event::Timer(timer));
        Ok(())
    }

    fn post_update(&mut self, _ctx: &mut ActorContext<'_>, delta_sec: f32) -> EngineResult<()> {
        self.record(Event::Post(delta_sec));
        Ok(())
    }

    fn on_overlapped_with(
        &mut self,
        _ctx: &mut ActorContext<'_>,
        others: &[Overlap<ActorId>],
    ) -> EngineResult<()> {
        self.record(Event::Overlap(others.to_vec()));
        Ok(())
    }

    fn on_removed(&mut self, _ctx: &mut ActorContext<'_>) -> EngineResult<()> {
        self.record(Event::Removed);
        Ok(())
    }

    fn drawing(&self) -> Option<Drawing> {
        self.layer.map(|layer| Drawing::new(layer, self.name))
    }
}

pub(crate) fn engine() -> Engine {
    crate::foundation::logging::init_for_tests();
    Engine::new(EngineConfig::default()).expect("default config is valid")
}

/// Square collision accepting everything
pub(crate) fn square(size: f32) -> CollisionDesc {
    CollisionDesc::new(CollisionShape::rect(size, size), CollisionGroup::default())
}

pub(crate) fn at(x: f32, y: f32) -> ActorDesc {
    ActorDesc::at(Mat3::translation(x, y))
}
