//! Read-only view of the host world consulted while resolving instructions.

use crate::ids::{EntityId, Tick};

use super::props::PropValue;

/// Why an attack would be refused before it is issued.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AttackRefusal {
    #[error("combat is not allowed here")]
    Peaceful,
    #[error("target is not present")]
    TargetAbsent,
    #[error("target is already dead")]
    TargetDead,
    #[error("cannot attack oneself")]
    SameEntity,
}

/// Queries the core needs to answer about the world around an entity.
///
/// Implemented by the host. Every method takes the acting entity explicitly.
pub trait WorldView {
    /// Current host time.
    fn now(&self) -> Tick;

    /// Display name of an entity, if it still exists.
    fn name_of(&self, entity: EntityId) -> Option<String>;

    /// Whether the entity is currently fighting.
    fn in_combat(&self, entity: EntityId) -> bool;

    /// Last time an interactive observer was near the entity.
    fn last_observed(&self, entity: EntityId) -> Option<Tick>;

    /// Exit names of the entity's current location.
    fn exits(&self, entity: EntityId) -> Vec<String>;

    /// Whether both entities exist and share a location.
    fn is_near(&self, entity: EntityId, other: EntityId) -> bool;

    /// Whether `listener` could hear `speaker` right now.
    fn can_hear(&self, listener: EntityId, speaker: EntityId) -> bool;

    /// Whether `viewer` can see `target` right now.
    fn can_see(&self, viewer: EntityId, target: EntityId) -> bool;

    /// Pre-flight check for an attack that is about to be issued.
    fn may_attack(&self, attacker: EntityId, target: EntityId) -> Result<(), AttackRefusal>;

    /// Read a property of an entity.
    fn property(&self, entity: EntityId, key: &str) -> Option<PropValue>;
}
