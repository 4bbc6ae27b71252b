//! Per-entity collection of sequences and the heartbeat that advances them.

use arrayvec::ArrayVec;

use crate::behavior::Behaviors;
use crate::config::CoreConfig;
use crate::env::{Alarm, RngOracle, TimerFacility, WorldView};
use crate::error::{CoreError, ErrorSeverity};
use crate::ids::{AlarmId, EntityId, Tick};

use super::{Instruction, ResolveContext, Resolved, Sequence, SequenceFlags};

/// Errors returned by sequence management.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SequenceError {
    #[error("sequence `{0}` already exists")]
    Duplicate(String),

    #[error("sequence limit of {limit} reached")]
    LimitReached { limit: usize },

    #[error("no sequence named `{0}`")]
    Unknown(String),
}

impl CoreError for SequenceError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Duplicate(_) => "SEQUENCE_DUPLICATE",
            Self::LimitReached { .. } => "SEQUENCE_LIMIT",
            Self::Unknown(_) => "SEQUENCE_UNKNOWN",
        }
    }
}

/// Whether the sequencer currently owns a driving alarm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriveState {
    /// No alarm; nothing to do until instructions are added.
    #[default]
    Stopped,
    /// A heartbeat alarm is pending.
    Running,
    /// No alarm; waiting for an interactive observer to arrive.
    Dormant,
}

/// Collaborators needed for one heartbeat.
pub struct HeartbeatContext<'a> {
    pub view: &'a dyn WorldView,
    pub timers: &'a mut dyn TimerFacility,
    pub rng: &'a mut dyn RngOracle,
    pub config: &'a CoreConfig,
}

/// How the heartbeat left the driving alarm.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BeatOutcome {
    /// Next heartbeat scheduled after this many ticks.
    Continue { next_in: u64 },
    /// Alarm cancelled; the host should wake the entity when an observer arrives.
    Dormant,
    /// Alarm cancelled; every sequence is exhausted.
    Stopped,
}

/// Result of one heartbeat.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heartbeat {
    /// Commands to run through the command hook, in tape order.
    pub commands: Vec<String>,
    pub outcome: BeatOutcome,
}

enum Step {
    /// A non-delay instruction was consumed.
    Acted,
    /// Stopped on a delay with this many ticks left.
    Waiting(i64),
    /// Ran off the end of the tape.
    Exhausted,
}

/// Independently-advancing named sequences owned by one entity.
///
/// Sequences are stored in registration order and processed in that order
/// on every heartbeat. At most one driving alarm is outstanding at a time.
#[derive(Debug, Default)]
pub struct Sequencer {
    owner: EntityId,
    sequences: ArrayVec<Sequence, { CoreConfig::MAX_SEQUENCES }>,
    driver: Option<AlarmId>,
    drive: DriveState,
    last_beat: Tick,
}

impl Sequencer {
    pub fn new(owner: EntityId) -> Self {
        Self {
            owner,
            ..Self::default()
        }
    }

    pub fn owner(&self) -> EntityId {
        self.owner
    }

    pub fn drive_state(&self) -> DriveState {
        self.drive
    }

    /// Handle of the outstanding heartbeat alarm.
    pub fn driver(&self) -> Option<AlarmId> {
        self.driver
    }

    /// Registers an empty sequence.
    pub fn new_sequence(&mut self, name: &str, flags: SequenceFlags) -> Result<(), SequenceError> {
        if self.find(name).is_some() {
            return Err(SequenceError::Duplicate(name.to_owned()));
        }
        self.sequences
            .try_push(Sequence::new(name, flags))
            .map_err(|_| SequenceError::LimitReached {
                limit: CoreConfig::MAX_SEQUENCES,
            })
    }

    /// Registers the sequence unless it already exists.
    pub fn ensure_sequence(&mut self, name: &str, flags: SequenceFlags) -> Result<(), SequenceError> {
        match self.new_sequence(name, flags) {
            Err(SequenceError::Duplicate(_)) => Ok(()),
            other => other,
        }
    }

    /// Splices instructions at the head of the unconsumed remainder.
    ///
    /// Always cancels and replaces the driving alarm so the new head runs on
    /// the next beat.
    pub fn add_first(
        &mut self,
        name: &str,
        instructions: impl IntoIterator<Item = Instruction>,
        timers: &mut dyn TimerFacility,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        let index = self.require(name)?;
        self.sequences[index].push_front(instructions.into_iter().collect());
        self.arm(timers, config.beat_delay);
        Ok(())
    }

    /// Appends instructions to the tail of the tape, arming the driver if idle.
    pub fn add_last(
        &mut self,
        name: &str,
        instructions: impl IntoIterator<Item = Instruction>,
        timers: &mut dyn TimerFacility,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        let index = self.require(name)?;
        self.sequences[index].push_back(instructions.into_iter().collect());
        if self.drive != DriveState::Running {
            self.arm(timers, config.beat_delay);
        }
        Ok(())
    }

    /// Truncates the tape and resets its cursor.
    pub fn clear(
        &mut self,
        name: &str,
        timers: &mut dyn TimerFacility,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        let index = self.require(name)?;
        self.sequences[index].clear();
        if self.drive == DriveState::Running {
            self.arm(timers, config.beat_delay);
        }
        Ok(())
    }

    /// Removes the sequence entirely.
    pub fn delete(&mut self, name: &str) -> Result<(), SequenceError> {
        let index = self.require(name)?;
        self.sequences.remove(index);
        Ok(())
    }

    /// Removes every sequence carrying any of `flags`. Returns how many went.
    pub fn delete_flagged(&mut self, flags: SequenceFlags) -> usize {
        let before = self.sequences.len();
        self.sequences.retain(|seq| !seq.flags().intersects(flags));
        before - self.sequences.len()
    }

    /// Unconsumed remainder of a sequence.
    pub fn query(&self, name: &str) -> Option<&[Instruction]> {
        self.find(name).map(|index| self.sequences[index].remaining())
    }

    pub fn query_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.sequences.iter().map(Sequence::name)
    }

    pub fn query_flags(&self, name: &str) -> Option<SequenceFlags> {
        self.find(name).map(|index| self.sequences[index].flags())
    }

    pub fn sequence(&self, name: &str) -> Option<&Sequence> {
        self.find(name).map(|index| &self.sequences[index])
    }

    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// True when some sequence still has unconsumed instructions.
    pub fn has_work(&self) -> bool {
        self.sequences.iter().any(|seq| !seq.is_exhausted())
    }

    /// Ticks until the next heartbeat, if one is scheduled.
    pub fn next_beat_in(&self, timers: &dyn TimerFacility) -> Option<u64> {
        self.driver.and_then(|id| timers.remaining(id))
    }

    /// Re-arms a halted sequencer that still has work. Returns true if armed.
    pub fn wake(&mut self, timers: &mut dyn TimerFacility, config: &CoreConfig) -> bool {
        if self.drive == DriveState::Running || !self.has_work() {
            return false;
        }
        self.arm(timers, config.beat_delay);
        true
    }

    /// Cancels the driving alarm without touching any tape.
    pub fn halt(&mut self, timers: &mut dyn TimerFacility) {
        if let Some(old) = self.driver.take() {
            timers.cancel(old);
        }
        self.drive = DriveState::Stopped;
    }

    /// Runs one heartbeat over every sequence.
    ///
    /// 1. Re-arms the next beat before doing any work.
    /// 2. Decides whether nobody has been watching for too long.
    /// 3. Consumes one instruction per live sequence, spending delays by the
    ///    elapsed time.
    /// 4. Stretches the next interval when only delays were pending, or halts
    ///    when nothing is left to do.
    pub fn heartbeat(&mut self, ctx: &mut HeartbeatContext<'_>, behaviors: &mut Behaviors) -> Heartbeat {
        let now = ctx.timers.now();
        let elapsed = i64::try_from(now.since(self.last_beat).max(1)).unwrap_or(i64::MAX);
        self.last_beat = now;

        let jitter = u32::try_from(ctx.config.beat_jitter).unwrap_or(u32::MAX);
        let provisional = ctx.config.beat_delay.max(1) + u64::from(ctx.rng.below(jitter.saturating_add(1)));
        self.arm(ctx.timers, provisional);

        let dormant = match ctx.view.last_observed(self.owner) {
            Some(seen) => now.since(seen) > ctx.config.dormancy_timeout,
            None => true,
        };

        let resolve = ResolveContext {
            owner: self.owner,
            view: ctx.view,
        };
        let mut commands = Vec::new();
        let mut acted = false;
        let mut min_wait: Option<i64> = None;

        for seq in self.sequences.iter_mut() {
            if seq.is_exhausted() || (dormant && !seq.is_nonstop()) {
                continue;
            }
            match step(seq, elapsed, &resolve, behaviors, ctx.rng, &mut commands) {
                Step::Acted => acted = true,
                Step::Waiting(left) => {
                    min_wait = Some(min_wait.map_or(left, |current| current.min(left)));
                }
                Step::Exhausted => {}
            }
        }

        let outcome = if !self.has_work() {
            self.halt(ctx.timers);
            if dormant {
                self.drive = DriveState::Dormant;
                BeatOutcome::Dormant
            } else {
                BeatOutcome::Stopped
            }
        } else if dormant && !self.sequences.iter().any(|seq| !seq.is_exhausted() && seq.is_nonstop()) {
            self.halt(ctx.timers);
            self.drive = DriveState::Dormant;
            BeatOutcome::Dormant
        } else {
            match min_wait {
                Some(wait) if !acted && wait.unsigned_abs() > provisional => {
                    self.arm(ctx.timers, wait.unsigned_abs());
                    BeatOutcome::Continue {
                        next_in: wait.unsigned_abs(),
                    }
                }
                _ => BeatOutcome::Continue {
                    next_in: provisional,
                },
            }
        };

        Heartbeat { commands, outcome }
    }

    /// Cancels any outstanding driver and schedules a fresh heartbeat.
    fn arm(&mut self, timers: &mut dyn TimerFacility, delay: u64) {
        if let Some(old) = self.driver.take() {
            timers.cancel(old);
        }
        if self.drive != DriveState::Running {
            self.last_beat = timers.now();
        }
        self.driver = Some(timers.schedule(delay.max(1), None, Alarm::Heartbeat(self.owner)));
        self.drive = DriveState::Running;
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.sequences.iter().position(|seq| seq.name() == name)
    }

    fn require(&self, name: &str) -> Result<usize, SequenceError> {
        self.find(name)
            .ok_or_else(|| SequenceError::Unknown(name.to_owned()))
    }
}

/// Consumes one instruction of `seq`.
///
/// Delays are spent against `elapsed`; a spent delay falls through to the
/// next instruction. Nested lists, spliced closure results, and generator
/// picks are written in place and their head consumed in the same step.
fn step(
    seq: &mut Sequence,
    elapsed: i64,
    resolve: &ResolveContext<'_>,
    behaviors: &mut Behaviors,
    rng: &mut dyn RngOracle,
    commands: &mut Vec<String>,
) -> Step {
    let mut budget = elapsed;
    loop {
        let Some(current) = seq.current() else {
            return Step::Exhausted;
        };
        match current {
            Instruction::Delay(ticks) => {
                let ticks = *ticks;
                if ticks > budget {
                    let left = ticks - budget;
                    seq.replace_current(vec![Instruction::Delay(left)]);
                    return Step::Waiting(left);
                }
                budget -= ticks.max(0);
                seq.advance();
            }
            Instruction::Nested(inner) => {
                let inner = inner.clone();
                seq.replace_current(inner);
            }
            Instruction::Command(text) => {
                commands.push(text.clone());
                seq.advance();
                return Step::Acted;
            }
            Instruction::Resolvable(closure) => {
                let closure = closure.clone();
                match closure(resolve) {
                    Resolved::Command(text) => {
                        commands.push(text);
                        seq.advance();
                        return Step::Acted;
                    }
                    Resolved::Postpone(ticks) if ticks > 0 => {
                        let wait = i64::try_from(ticks).unwrap_or(i64::MAX);
                        seq.replace_current(vec![Instruction::Delay(wait), Instruction::Resolvable(closure)]);
                        return Step::Waiting(wait);
                    }
                    Resolved::Postpone(_) | Resolved::Nothing => {
                        seq.advance();
                        return Step::Acted;
                    }
                    Resolved::Splice(instructions) => seq.replace_current(instructions),
                }
            }
            Instruction::Behavior(kind) => {
                let kind = *kind;
                let fired = behaviors.fire(kind, resolve, rng);
                let picked = fired.instruction.is_some();
                let rearm = fired.rearm.map(|delay| i64::try_from(delay).unwrap_or(i64::MAX));
                let mut replacement: Vec<Instruction> = fired.instruction.into_iter().collect();
                if let Some(delay) = rearm {
                    replacement.push(Instruction::Delay(delay));
                    replacement.push(Instruction::Behavior(kind));
                }
                seq.replace_current(replacement);
                if let (false, Some(delay)) = (picked, rearm) {
                    return Step::Waiting(delay);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::behavior::{BehaviorKind, Means, Wander};
    use crate::env::PcgRng;
    use crate::testing::{FakeView, ManualTimers};

    const OWNER: EntityId = EntityId(9);

    struct Rig {
        seq: Sequencer,
        behaviors: Behaviors,
        timers: ManualTimers,
        view: FakeView,
        rng: PcgRng,
        config: CoreConfig,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                seq: Sequencer::new(OWNER),
                behaviors: Behaviors::new(),
                timers: ManualTimers::default(),
                view: FakeView::default(),
                rng: PcgRng::seeded(42),
                config: CoreConfig::steady(),
            }
        }

        fn with(names: &[(&str, SequenceFlags)]) -> Self {
            let mut rig = Self::new();
            for (name, flags) in names {
                rig.seq.new_sequence(name, *flags).unwrap();
            }
            rig
        }

        fn add_last(&mut self, name: &str, instructions: Vec<Instruction>) {
            self.seq
                .add_last(name, instructions, &mut self.timers, &self.config)
                .unwrap();
        }

        fn beat(&mut self) -> Heartbeat {
            let alarm = self.timers.fire_next().expect("no alarm pending");
            assert_eq!(alarm, Alarm::Heartbeat(OWNER));
            self.view.now = self.timers.now;
            let mut ctx = HeartbeatContext {
                view: &self.view,
                timers: &mut self.timers,
                rng: &mut self.rng,
                config: &self.config,
            };
            self.seq.heartbeat(&mut ctx, &mut self.behaviors)
        }
    }

    fn lines(items: &[&str]) -> Vec<Instruction> {
        items.iter().map(|&item| Instruction::from(item)).collect()
    }

    #[test]
    fn management_errors() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
        assert_eq!(
            rig.seq.new_sequence("s", SequenceFlags::NONSTOP),
            Err(SequenceError::Duplicate("s".into()))
        );
        assert_eq!(
            rig.seq.add_first("nope", lines(&["a"]), &mut rig.timers, &rig.config),
            Err(SequenceError::Unknown("nope".into()))
        );
        assert_eq!(rig.seq.delete("nope"), Err(SequenceError::Unknown("nope".into())));

        for index in 1..CoreConfig::MAX_SEQUENCES {
            rig.seq.new_sequence(&format!("s{index}"), SequenceFlags::empty()).unwrap();
        }
        assert_eq!(
            rig.seq.new_sequence("one too many", SequenceFlags::empty()),
            Err(SequenceError::LimitReached {
                limit: CoreConfig::MAX_SEQUENCES
            })
        );
        assert_eq!(rig.timers.pending(), 0);
    }

    #[test]
    fn query_reports_names_and_flags_in_registration_order() {
        let mut rig = Rig::with(&[("b", SequenceFlags::NONSTOP), ("a", SequenceFlags::empty())]);
        rig.add_last("a", lines(&["x"]));
        assert_eq!(rig.seq.query_names().collect::<Vec<_>>(), ["b", "a"]);
        assert_eq!(rig.seq.query_flags("b"), Some(SequenceFlags::NONSTOP));
        assert_eq!(rig.seq.query("a"), Some(&lines(&["x"])[..]));

        rig.seq.delete("b").unwrap();
        assert_eq!(rig.seq.query_names().collect::<Vec<_>>(), ["a"]);
    }

    proptest! {
        #[test]
        fn one_instruction_per_beat_until_exhausted(count in 1usize..24) {
            let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
            let tape: Vec<String> = (0..count).map(|i| format!("cmd {i}")).collect();
            rig.add_last("s", tape.iter().map(|line| Instruction::command(line.as_str())).collect());

            let mut seen = Vec::new();
            for _ in 0..count {
                seen.extend(rig.beat().commands);
            }

            prop_assert_eq!(seen, tape);
            let seq = rig.seq.sequence("s").unwrap();
            prop_assert_eq!(seq.cursor(), seq.len());
            prop_assert!(rig.seq.query("s").unwrap().is_empty());
            prop_assert_eq!(rig.seq.drive_state(), DriveState::Stopped);
            prop_assert_eq!(rig.timers.pending(), 0);
        }
    }

    #[test]
    fn nested_lists_flatten_in_order() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
        rig.add_last(
            "s",
            vec![
                Instruction::Nested(vec!["a".into(), Instruction::Nested(lines(&["b"])), "c".into()]),
                Instruction::Nested(Vec::new()),
                "d".into(),
            ],
        );

        let seen: Vec<String> = (0..4).flat_map(|_| rig.beat().commands).collect();
        assert_eq!(seen, ["a", "b", "c", "d"]);
    }

    #[test]
    fn postponed_closure_retries_after_delay() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
        rig.view.fighting = true;
        rig.add_last(
            "s",
            vec![Instruction::resolvable(|ctx| {
                if ctx.in_combat() {
                    Resolved::Postpone(3)
                } else {
                    Resolved::Command("cheer".into())
                }
            })],
        );

        let first = rig.beat();
        assert!(first.commands.is_empty());
        assert_eq!(first.outcome, BeatOutcome::Continue { next_in: 3 });
        let rest = rig.seq.query("s").unwrap();
        assert_eq!(rest[0], Instruction::Delay(3));
        assert!(matches!(rest[1], Instruction::Resolvable(_)));

        rig.view.fighting = false;
        let second = rig.beat();
        assert_eq!(rig.timers.now, Tick(4));
        assert_eq!(second.commands, ["cheer"]);
        assert_eq!(second.outcome, BeatOutcome::Stopped);
    }

    #[test]
    fn spliced_closure_runs_its_head_immediately() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
        rig.add_last(
            "s",
            vec![Instruction::resolvable(|_| Resolved::Splice(lines(&["x", "y"])))],
        );
        assert_eq!(rig.beat().commands, ["x"]);
        assert_eq!(rig.beat().commands, ["y"]);
    }

    #[test]
    fn pure_delays_stretch_the_next_beat() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty()), ("t", SequenceFlags::empty())]);
        rig.add_last("s", vec![Instruction::Delay(10), "a".into()]);
        rig.add_last("t", vec![Instruction::Delay(20), "b".into()]);

        assert_eq!(rig.beat().outcome, BeatOutcome::Continue { next_in: 9 });
        let second = rig.beat();
        assert_eq!(rig.timers.now, Tick(10));
        assert_eq!(second.commands, ["a"]);
        assert_eq!(rig.seq.query("t"), Some(&[Instruction::Delay(10), "b".into()][..]));
    }

    #[test]
    fn unwatched_entity_runs_nonstop_sequences_only() {
        let mut rig = Rig::with(&[("idle", SequenceFlags::empty()), ("walk", SequenceFlags::NONSTOP)]);
        rig.view.unwatched = true;
        rig.add_last("idle", lines(&["a", "b"]));
        rig.add_last("walk", lines(&["w1", "w2"]));

        assert_eq!(rig.beat().commands, ["w1"]);
        let second = rig.beat();
        assert_eq!(second.commands, ["w2"]);
        assert_eq!(second.outcome, BeatOutcome::Dormant);
        assert_eq!(rig.seq.drive_state(), DriveState::Dormant);
        assert_eq!(rig.timers.pending(), 0);
        assert_eq!(rig.seq.query("idle"), Some(&lines(&["a", "b"])[..]));

        rig.view.unwatched = false;
        assert!(rig.seq.wake(&mut rig.timers, &rig.config));
        assert!(!rig.seq.wake(&mut rig.timers, &rig.config));
        assert_eq!(rig.timers.pending(), 1);
        assert_eq!(rig.beat().commands, ["a"]);
    }

    #[test]
    fn rescheduling_keeps_a_single_driver() {
        let mut rig = Rig::with(&[("s", SequenceFlags::empty())]);
        rig.seq
            .add_first("s", lines(&["a"]), &mut rig.timers, &rig.config)
            .unwrap();
        let first = rig.seq.driver();
        rig.seq
            .add_first("s", lines(&["b"]), &mut rig.timers, &rig.config)
            .unwrap();
        assert_eq!(rig.timers.pending(), 1);
        assert_ne!(rig.seq.driver(), first);

        let driver = rig.seq.driver();
        rig.add_last("s", lines(&["c"]));
        assert_eq!(rig.seq.driver(), driver);
        rig.seq.clear("s", &mut rig.timers, &rig.config).unwrap();
        assert_eq!(rig.timers.pending(), 1);
        assert!(rig.seq.next_beat_in(&rig.timers).is_some());
    }

    #[test]
    fn wander_rate_tracks_mean_interval() {
        let mut rig = Rig::with(&[("wander", SequenceFlags::empty())]);
        rig.view.exits = ["north", "south", "east", "west"].map(String::from).to_vec();
        rig.behaviors.insert(Box::new(Wander::new(Means::new(10, 10))));
        rig.add_last("wander", vec![Instruction::Behavior(BehaviorKind::Wander)]);

        let mut moves = 0;
        while rig.timers.now < Tick(1000) {
            moves += rig.beat().commands.len();
        }
        assert!((85..=115).contains(&moves), "{moves} moves in 1000 ticks");
        assert_eq!(rig.seq.query("wander").map(<[_]>::len), Some(2));
    }
}
