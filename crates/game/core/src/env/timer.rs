//! Timer facility consumed by the sequencer and the combat driver.

use crate::ids::{AlarmId, EntityId, Tick};

/// What a fired alarm should drive.
///
/// Alarms carry data instead of closures: the host matches on the variant and
/// calls the corresponding entry point with the owning entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Alarm {
    /// Run one sequencer heartbeat for the entity.
    Heartbeat(EntityId),
    /// Resolve one combat round for the entity.
    CombatRound(EntityId),
}

impl Alarm {
    /// Entity that owns the alarm.
    pub const fn owner(&self) -> EntityId {
        match *self {
            Alarm::Heartbeat(id) | Alarm::CombatRound(id) => id,
        }
    }
}

/// Host-provided scheduling of deferred callbacks.
///
/// Single-threaded and cooperative: an alarm fires only when the host drains
/// due alarms, never concurrently with another.
pub trait TimerFacility {
    /// Current host time.
    fn now(&self) -> Tick;

    /// Schedule `alarm` to fire after `delay` ticks, then every `repeat`
    /// ticks when `repeat` is given.
    fn schedule(&mut self, delay: u64, repeat: Option<u64>, alarm: Alarm) -> AlarmId;

    /// Cancel a pending alarm. Returns false if it already fired or was
    /// cancelled.
    fn cancel(&mut self, id: AlarmId) -> bool;

    /// Ticks remaining until the alarm fires, if it is still pending.
    fn remaining(&self, id: AlarmId) -> Option<u64>;
}
