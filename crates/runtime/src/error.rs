//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the core (sequence management, descriptor
//! validation, combat phases), content lookup, and command execution so
//! callers can bubble them up with consistent context.
use thiserror::Error;

use mud_core::{AttackRefusal, EntityId, PhaseError, RegistryError, RoomId, SequenceError};

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("unknown living {0}")]
    UnknownLiving(EntityId),

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("no room keyed `{0}`")]
    UnknownRoomKey(String),

    #[error("no NPC template named `{0}`")]
    UnknownTemplate(String),

    #[error("invalid NPC template `{key}`")]
    Template {
        key: String,
        #[source]
        source: RegistryError,
    },

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Phase(#[from] PhaseError),

    #[error(transparent)]
    Command(#[from] CommandError),
}

/// Why a command line could not be executed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown verb `{0}`")]
    UnknownVerb(String),

    #[error("`{verb}` needs {what}")]
    MissingArgument {
        verb: &'static str,
        what: &'static str,
    },

    #[error("no exit `{0}` here")]
    NoSuchExit(String),

    #[error("nobody called `{0}` here")]
    NoSuchTarget(String),

    #[error("actor {0} is gone")]
    ActorGone(EntityId),

    #[error("attack refused: {0}")]
    Refused(#[from] AttackRefusal),

    #[error("actor is not fighting")]
    NotFighting,

    #[error("nowhere to flee")]
    NowhereToFlee,
}
