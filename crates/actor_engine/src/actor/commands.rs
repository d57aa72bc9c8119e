//! Deferred membership changes requested from inside callbacks

use super::body::ActorDesc;
use super::Actor;
use crate::lifecycle::{ActorId, WorldId};

pub(crate) enum Command {
    Spawn {
        world: WorldId,
        id: ActorId,
        actor: Box<dyn Actor>,
        desc: ActorDesc,
    },
    Remove(ActorId),
}

/// Queue of spawn and removal requests
///
/// The engine drains it after each dispatch phase. Spawned actors are
/// staged and first take part in the following tick; removals only flag the
/// target, which leaves at the end of the current tick.
#[derive(Default)]
pub struct Commands {
    queue: Vec<Command>,
}

impl Commands {
    pub(crate) fn spawn(&mut self, world: WorldId, actor: Box<dyn Actor>, desc: ActorDesc) -> ActorId {
        let id = ActorId::next();
        self.queue.push(Command::Spawn {
            world,
            id,
            actor,
            desc,
        });
        id
    }

    pub(crate) fn remove(&mut self, actor: ActorId) {
        self.queue.push(Command::Remove(actor));
    }

    pub(crate) fn drain(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.queue)
    }

    /// Number of queued requests
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
