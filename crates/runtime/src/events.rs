//! Things that happened in the world, fed to the world-event hooks.
use mud_core::{EntityId, RoomId};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldEvent {
    /// A living entered a room, or was placed in one when `from` is `None`.
    Arrived {
        entity: EntityId,
        room: RoomId,
        from: Option<RoomId>,
    },
    /// A living left a room.
    Departed {
        entity: EntityId,
        room: RoomId,
        to: RoomId,
    },
    /// A living spoke aloud.
    Said {
        speaker: EntityId,
        room: RoomId,
        text: String,
    },
    /// A living asked another one a question.
    Asked {
        asker: EntityId,
        target: EntityId,
        question: String,
    },
    /// Combat started between two livings.
    Engaged {
        attacker: EntityId,
        defender: EntityId,
    },
    /// A living died. Emitted exactly once per death.
    Died {
        victim: EntityId,
        victim_name: String,
        killer: Option<EntityId>,
        room: RoomId,
    },
}

impl WorldEvent {
    /// Living the event is about.
    pub fn subject(&self) -> EntityId {
        match self {
            WorldEvent::Arrived { entity, .. } | WorldEvent::Departed { entity, .. } => *entity,
            WorldEvent::Said { speaker, .. } => *speaker,
            WorldEvent::Asked { asker, .. } => *asker,
            WorldEvent::Engaged { attacker, .. } => *attacker,
            WorldEvent::Died { victim, .. } => *victim,
        }
    }
}
