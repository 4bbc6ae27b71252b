//! Generic named attributes stored on entities by the host.

use crate::ids::EntityId;

/// Value of a named property.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PropValue {
    Flag(bool),
    Int(i64),
    Text(String),
}

impl PropValue {
    /// Truthiness in the mudlib sense: false, zero, and empty text are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            PropValue::Flag(flag) => *flag,
            PropValue::Int(value) => *value != 0,
            PropValue::Text(text) => !text.is_empty(),
        }
    }
}

/// Well-known property keys shared between the core and hosts.
pub mod keys {
    /// Set while the entity is engaged in combat.
    pub const FIGHTING: &str = "fighting";
    /// Suppresses wimpy/flee checks while set.
    pub const FEAR_OVERRIDE: &str = "fear_override";
    /// Name of whoever dealt the killing blow.
    pub const KILLED_BY: &str = "killed_by";
    /// Combat is refused in a room carrying this flag.
    pub const PEACEFUL: &str = "peaceful";
}

/// Mutable property storage provided by the host.
pub trait PropertyStore {
    fn property(&self, entity: EntityId, key: &str) -> Option<PropValue>;

    fn set_property(&mut self, entity: EntityId, key: &str, value: PropValue);

    fn remove_property(&mut self, entity: EntityId, key: &str) -> Option<PropValue>;

    /// Convenience truthiness check.
    fn has_flag(&self, entity: EntityId, key: &str) -> bool {
        self.property(entity, key)
            .is_some_and(|value| value.is_truthy())
    }
}
