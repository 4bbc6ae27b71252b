//! Priority-queue timer facility.
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use mud_core::{Alarm, AlarmId, Tick, TimerFacility};

#[derive(Clone, Copy, Debug)]
struct Pending {
    alarm: Alarm,
    due: Tick,
    /// Queue position of the live heap entry; older entries are stale.
    seq: u64,
    repeat: Option<u64>,
}

/// Min-heap of alarms ordered by due tick, then insertion.
///
/// Cancellation is lazy: cancelled alarms are dropped from the index and
/// their heap entries skipped when they surface.
#[derive(Debug, Default)]
pub struct AlarmQueue {
    now: Tick,
    next_id: u64,
    next_seq: u64,
    heap: BinaryHeap<Reverse<(Tick, u64, AlarmId)>>,
    pending: HashMap<AlarmId, Pending>,
}

impl AlarmQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward. Never moves it back.
    pub fn advance_to(&mut self, now: Tick) {
        self.now = self.now.max(now);
    }

    /// Number of live alarms.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Live alarms matching `predicate`.
    pub fn count(&self, predicate: impl Fn(&Alarm) -> bool) -> usize {
        self.pending.values().filter(|p| predicate(&p.alarm)).count()
    }

    /// Pops the next alarm due at or before the current tick.
    ///
    /// Repeating alarms are re-queued before being returned, so cancelling
    /// from inside the handler works.
    pub fn pop_due(&mut self) -> Option<(AlarmId, Alarm)> {
        while let Some(&Reverse((due, seq, id))) = self.heap.peek() {
            if due > self.now {
                return None;
            }
            self.heap.pop();

            let Some(entry) = self.pending.get(&id).copied() else {
                continue;
            };
            if entry.seq != seq {
                continue;
            }
            match entry.repeat {
                Some(every) => {
                    let due = self.now + every.max(1);
                    let seq = self.push(due, id);
                    if let Some(live) = self.pending.get_mut(&id) {
                        live.due = due;
                        live.seq = seq;
                    }
                }
                None => {
                    self.pending.remove(&id);
                }
            }
            return Some((id, entry.alarm));
        }
        None
    }

    fn push(&mut self, due: Tick, id: AlarmId) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse((due, seq, id)));
        seq
    }
}

impl TimerFacility for AlarmQueue {
    fn now(&self) -> Tick {
        self.now
    }

    fn schedule(&mut self, delay: u64, repeat: Option<u64>, alarm: Alarm) -> AlarmId {
        let id = AlarmId(self.next_id);
        self.next_id += 1;
        let due = self.now + delay;
        let seq = self.push(due, id);
        self.pending.insert(
            id,
            Pending {
                alarm,
                due,
                seq,
                repeat,
            },
        );
        id
    }

    fn cancel(&mut self, id: AlarmId) -> bool {
        self.pending.remove(&id).is_some()
    }

    fn remaining(&self, id: AlarmId) -> Option<u64> {
        self.pending.get(&id).map(|entry| entry.due.since(self.now))
    }
}
