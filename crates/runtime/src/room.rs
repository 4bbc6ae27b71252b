//! Locations of the host world.
use std::collections::BTreeMap;

use mud_core::{RoomId, Tick};

#[derive(Clone, Debug)]
pub struct Room {
    pub id: RoomId,
    /// Content key, e.g. `"square"`.
    pub key: String,
    /// Combat is refused here.
    pub peaceful: bool,
    pub exits: BTreeMap<String, RoomId>,
    /// Last tick an interactive living stood here.
    pub last_visit: Option<Tick>,
}

impl Room {
    pub fn new(id: RoomId, key: impl Into<String>) -> Self {
        Self {
            id,
            key: key.into(),
            peaceful: false,
            exits: BTreeMap::new(),
            last_visit: None,
        }
    }

    pub fn peaceful(mut self, peaceful: bool) -> Self {
        self.peaceful = peaceful;
        self
    }

    pub fn exit(&self, name: &str) -> Option<RoomId> {
        self.exits.get(name).copied()
    }
}
