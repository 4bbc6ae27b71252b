//! Messaging and command execution primitives provided by the host.

use crate::ids::EntityId;

/// Who a message is meant for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Audience {
    /// A single entity.
    Entity(EntityId),
    /// Everyone in the location of `around`, except the listed entities.
    Room {
        around: EntityId,
        except: Vec<EntityId>,
    },
}

/// A line of text produced by the core for the host to deliver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub audience: Audience,
    pub text: String,
}

impl Message {
    pub fn to(entity: EntityId, text: impl Into<String>) -> Self {
        Self {
            audience: Audience::Entity(entity),
            text: text.into(),
        }
    }

    pub fn room(around: EntityId, except: Vec<EntityId>, text: impl Into<String>) -> Self {
        Self {
            audience: Audience::Room { around, except },
            text: text.into(),
        }
    }
}

/// Delivers text to entities.
pub trait Messenger {
    fn tell(&mut self, entity: EntityId, text: &str);

    fn tell_room(&mut self, around: EntityId, except: &[EntityId], text: &str);

    /// Deliver a core-produced message according to its audience.
    fn deliver(&mut self, message: &Message) {
        match &message.audience {
            Audience::Entity(entity) => self.tell(*entity, &message.text),
            Audience::Room { around, except } => self.tell_room(*around, except, &message.text),
        }
    }
}

/// Runs a command line as if the entity had typed it.
pub trait CommandHook {
    type Error;

    fn execute(&mut self, actor: EntityId, command: &str) -> Result<(), Self::Error>;
}
