//! Test doubles for the collaborator traits.

use std::collections::BTreeMap;

use crate::env::{Alarm, AttackRefusal, PropValue, TimerFacility, WorldView};
use crate::ids::{AlarmId, EntityId, Tick};

/// Alarm list advanced by hand.
#[derive(Debug, Default)]
pub struct ManualTimers {
    pub now: Tick,
    next_id: u64,
    alarms: BTreeMap<AlarmId, (Tick, Option<u64>, Alarm)>,
}

impl ManualTimers {
    pub fn pending(&self) -> usize {
        self.alarms.len()
    }

    /// Jumps to the earliest pending alarm and fires it.
    pub fn fire_next(&mut self) -> Option<Alarm> {
        let (&id, &(due, repeat, alarm)) = self
            .alarms
            .iter()
            .min_by_key(|(id, (due, _, _))| (*due, **id))?;
        self.now = due;
        match repeat {
            Some(every) => {
                self.alarms.insert(id, (due + every.max(1), repeat, alarm));
            }
            None => {
                self.alarms.remove(&id);
            }
        }
        Some(alarm)
    }
}

impl TimerFacility for ManualTimers {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, delay: u64, repeat: Option<u64>, alarm: Alarm) -> AlarmId {
        self.next_id += 1;
        let id = AlarmId(self.next_id);
        self.alarms.insert(id, (self.now + delay, repeat, alarm));
        id
    }

    fn cancel(&mut self, id: AlarmId) -> bool {
        self.alarms.remove(&id).is_some()
    }

    fn remaining(&self, id: AlarmId) -> Option<u64> {
        self.alarms.get(&id).map(|(due, _, _)| due.since(self.now))
    }
}

/// Configurable world with a single room.
#[derive(Clone, Debug, Default)]
pub struct FakeView {
    pub now: Tick,
    pub exits: Vec<String>,
    pub fighting: bool,
    /// No observer has ever been near.
    pub unwatched: bool,
    /// Everyone else has left the room.
    pub apart: bool,
    pub deaf: bool,
    pub blind: bool,
    pub refusal: Option<AttackRefusal>,
}

impl WorldView for FakeView {
    fn now(&self) -> Tick {
        self.now
    }

    fn name_of(&self, entity: EntityId) -> Option<String> {
        Some(format!("thing {entity}"))
    }

    fn in_combat(&self, _entity: EntityId) -> bool {
        self.fighting
    }

    fn last_observed(&self, _entity: EntityId) -> Option<Tick> {
        (!self.unwatched).then_some(self.now)
    }

    fn exits(&self, _entity: EntityId) -> Vec<String> {
        self.exits.clone()
    }

    fn is_near(&self, _entity: EntityId, _other: EntityId) -> bool {
        !self.apart
    }

    fn can_hear(&self, _listener: EntityId, _speaker: EntityId) -> bool {
        !self.deaf
    }

    fn can_see(&self, _viewer: EntityId, _target: EntityId) -> bool {
        !self.blind
    }

    fn may_attack(&self, _attacker: EntityId, _target: EntityId) -> Result<(), AttackRefusal> {
        self.refusal.map_or(Ok(()), Err)
    }

    fn property(&self, _entity: EntityId, _key: &str) -> Option<PropValue> {
        None
    }
}
