//! Registry of rooms, livings, and their properties.
//!
//! The census is the read side of the world: it implements the core's
//! [`WorldView`] and [`PropertyStore`] and knows nothing about brains,
//! combatants, or alarms.
use std::collections::BTreeMap;

use mud_core::env::keys;
use mud_core::{AttackRefusal, EntityId, PropValue, PropertyStore, RoomId, Tick, WorldView};

use crate::living::Living;
use crate::room::Room;

/// Property keys understood only by this runtime.
pub mod runtime_keys {
    /// The living cannot be seen.
    pub const INVISIBLE: &str = "invisible";
    /// The living cannot hear.
    pub const DEAF: &str = "deaf";
}

#[derive(Debug, Default)]
pub struct Census {
    now: Tick,
    rooms: BTreeMap<RoomId, Room>,
    livings: BTreeMap<EntityId, Living>,
    properties: BTreeMap<EntityId, BTreeMap<String, PropValue>>,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Tick {
        self.now
    }

    pub(crate) fn set_now(&mut self, now: Tick) {
        self.now = now;
    }

    // ===== rooms =====

    pub fn add_room(&mut self, room: Room) {
        self.rooms.insert(room.id, room);
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&id)
    }

    pub fn room_by_key(&self, key: &str) -> Option<&Room> {
        self.rooms.values().find(|room| room.key == key)
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.rooms.values()
    }

    // ===== livings =====

    pub(crate) fn insert_living(&mut self, living: Living) {
        let (room, interactive) = (living.room, living.interactive);
        self.livings.insert(living.id, living);
        if interactive {
            self.mark_visit(room);
        }
    }

    pub(crate) fn remove_living(&mut self, id: EntityId) -> Option<Living> {
        let living = self.livings.remove(&id)?;
        if living.interactive {
            self.mark_visit(living.room);
        }
        Some(living)
    }

    pub fn living(&self, id: EntityId) -> Option<&Living> {
        self.livings.get(&id)
    }

    pub(crate) fn living_mut(&mut self, id: EntityId) -> Option<&mut Living> {
        self.livings.get_mut(&id)
    }

    pub fn livings(&self) -> impl Iterator<Item = &Living> {
        self.livings.values()
    }

    pub fn room_of(&self, id: EntityId) -> Option<RoomId> {
        self.livings.get(&id).map(|living| living.room)
    }

    /// Livings standing in `room`, dead ones excluded.
    pub fn occupants(&self, room: RoomId) -> impl Iterator<Item = &Living> {
        self.livings
            .values()
            .filter(move |living| living.room == room && !living.dead)
    }

    /// First other living near `actor` answering to `word`.
    pub fn find_near(&self, actor: EntityId, word: &str) -> Option<EntityId> {
        let room = self.room_of(actor)?;
        self.occupants(room)
            .find(|living| living.id != actor && living.answers_to(word))
            .map(|living| living.id)
    }

    /// Relocates a living. Returns the room it left.
    pub(crate) fn move_living(&mut self, id: EntityId, to: RoomId) -> Option<RoomId> {
        let living = self.livings.get_mut(&id)?;
        let from = std::mem::replace(&mut living.room, to);
        if living.interactive {
            self.mark_visit(from);
            self.mark_visit(to);
        }
        Some(from)
    }

    fn mark_visit(&mut self, room: RoomId) {
        let now = self.now;
        if let Some(room) = self.rooms.get_mut(&room) {
            room.last_visit = Some(now);
        }
    }

    fn observed_now(&self, room: RoomId) -> bool {
        self.occupants(room).any(|living| living.interactive)
    }

    // ===== properties =====

    pub fn property(&self, entity: EntityId, key: &str) -> Option<PropValue> {
        self.properties.get(&entity)?.get(key).cloned()
    }

    pub fn has_flag(&self, entity: EntityId, key: &str) -> bool {
        self.property(entity, key).is_some_and(|value| value.is_truthy())
    }

    pub(crate) fn forget_properties(&mut self, entity: EntityId) {
        self.properties.remove(&entity);
    }
}

impl WorldView for Census {
    fn now(&self) -> Tick {
        self.now
    }

    fn name_of(&self, entity: EntityId) -> Option<String> {
        self.living(entity).map(|living| living.name.clone())
    }

    fn in_combat(&self, entity: EntityId) -> bool {
        self.has_flag(entity, keys::FIGHTING)
    }

    fn last_observed(&self, entity: EntityId) -> Option<Tick> {
        let room = self.room_of(entity)?;
        if self.observed_now(room) {
            return Some(self.now);
        }
        self.room(room)?.last_visit
    }

    fn exits(&self, entity: EntityId) -> Vec<String> {
        self.room_of(entity)
            .and_then(|room| self.room(room))
            .map(|room| room.exits.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn is_near(&self, entity: EntityId, other: EntityId) -> bool {
        match (self.living(entity), self.living(other)) {
            (Some(a), Some(b)) => a.room == b.room,
            _ => false,
        }
    }

    fn can_hear(&self, listener: EntityId, speaker: EntityId) -> bool {
        self.is_near(listener, speaker) && !self.has_flag(listener, runtime_keys::DEAF)
    }

    fn can_see(&self, viewer: EntityId, target: EntityId) -> bool {
        self.is_near(viewer, target) && !self.has_flag(target, runtime_keys::INVISIBLE)
    }

    fn may_attack(&self, attacker: EntityId, target: EntityId) -> Result<(), AttackRefusal> {
        if attacker == target {
            return Err(AttackRefusal::SameEntity);
        }
        if !self.is_near(attacker, target) {
            return Err(AttackRefusal::TargetAbsent);
        }
        if self.living(target).is_some_and(|living| living.dead) {
            return Err(AttackRefusal::TargetDead);
        }
        let peaceful = self
            .room_of(attacker)
            .and_then(|room| self.room(room))
            .is_some_and(|room| room.peaceful);
        if peaceful {
            return Err(AttackRefusal::Peaceful);
        }
        Ok(())
    }

    fn property(&self, entity: EntityId, key: &str) -> Option<PropValue> {
        Census::property(self, entity, key)
    }
}

impl PropertyStore for Census {
    fn property(&self, entity: EntityId, key: &str) -> Option<PropValue> {
        Census::property(self, entity, key)
    }

    fn set_property(&mut self, entity: EntityId, key: &str, value: PropValue) {
        self.properties
            .entry(entity)
            .or_default()
            .insert(key.to_owned(), value);
    }

    fn remove_property(&mut self, entity: EntityId, key: &str) -> Option<PropValue> {
        self.properties.get_mut(&entity)?.remove(key)
    }
}
