use strum::IntoEnumIterator;

use crate::config::CoreConfig;
use crate::env::{RngOracle, TimerFacility};
use crate::ids::EntityId;
use crate::sequence::{Heartbeat, HeartbeatContext, Instruction, SequenceError, SequenceFlags, Sequencer};

use super::{Aggression, AskResponder, Behavior, BehaviorKind, Behaviors};

/// Everything that makes an entity act on its own.
#[derive(Debug, Default)]
pub struct Brain {
    pub sequencer: Sequencer,
    pub behaviors: Behaviors,
    pub asks: Option<AskResponder>,
    pub aggression: Option<Aggression>,
}

impl Brain {
    /// Sequence receiving answer tapes.
    pub const ANSWERS: &'static str = "answers";
    /// Sequence receiving aggression plans and other scripted one-offs.
    pub const SCRIPT: &'static str = "script";

    pub fn new(owner: EntityId) -> Self {
        Self {
            sequencer: Sequencer::new(owner),
            ..Self::default()
        }
    }

    pub fn owner(&self) -> EntityId {
        self.sequencer.owner()
    }

    pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
        self.behaviors.insert(Box::new(behavior));
        self
    }

    /// Registers the reserved sequences and starts the idle generators.
    pub fn boot(
        &mut self,
        timers: &mut dyn TimerFacility,
        rng: &mut dyn RngOracle,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        self.sequencer.ensure_sequence(Self::SCRIPT, SequenceFlags::empty())?;
        self.sequencer.ensure_sequence(Self::ANSWERS, SequenceFlags::empty())?;
        let idle: Vec<BehaviorKind> = BehaviorKind::iter()
            .filter(|kind| !kind.is_combat())
            .collect();
        self.start(&idle, false, timers, rng, config)
    }

    /// Starts the combat generators on their own COMBAT sequences.
    pub fn engage(
        &mut self,
        timers: &mut dyn TimerFacility,
        rng: &mut dyn RngOracle,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        let combat: Vec<BehaviorKind> = BehaviorKind::iter()
            .filter(|kind| kind.is_combat())
            .collect();
        self.start(&combat, true, timers, rng, config)
    }

    /// Drops every pending combat instruction. Other sequences keep running.
    pub fn disengage(&mut self) -> usize {
        self.sequencer.delete_flagged(SequenceFlags::COMBAT)
    }

    /// Queues a one-off tape on the script sequence.
    pub fn script(
        &mut self,
        instructions: Vec<Instruction>,
        timers: &mut dyn TimerFacility,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        self.sequencer.ensure_sequence(Self::SCRIPT, SequenceFlags::empty())?;
        self.sequencer.add_last(Self::SCRIPT, instructions, timers, config)
    }

    /// Queues an answer tape.
    pub fn answer(
        &mut self,
        instructions: Vec<Instruction>,
        timers: &mut dyn TimerFacility,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        self.sequencer.ensure_sequence(Self::ANSWERS, SequenceFlags::empty())?;
        self.sequencer.add_last(Self::ANSWERS, instructions, timers, config)
    }

    pub fn heartbeat(&mut self, ctx: &mut HeartbeatContext<'_>) -> Heartbeat {
        self.sequencer.heartbeat(ctx, &mut self.behaviors)
    }

    fn start(
        &mut self,
        kinds: &[BehaviorKind],
        in_combat: bool,
        timers: &mut dyn TimerFacility,
        rng: &mut dyn RngOracle,
        config: &CoreConfig,
    ) -> Result<(), SequenceError> {
        for &kind in kinds {
            let Some(flags) = self.behaviors.get(kind).map(|behavior| behavior.flags()) else {
                continue;
            };
            let name = kind.sequence_name();
            if self.sequencer.query(name).is_some_and(|rest| !rest.is_empty()) {
                continue;
            }
            self.sequencer.ensure_sequence(name, flags)?;
            let first = self.behaviors.first_delay(kind, in_combat, rng).unwrap_or(0);
            let first = i64::try_from(first).unwrap_or(i64::MAX);
            self.sequencer.add_last(
                name,
                [Instruction::Delay(first), Instruction::Behavior(kind)],
                timers,
                config,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{Chatter, Means, Wander};
    use crate::env::PcgRng;
    use crate::testing::ManualTimers;

    fn brain() -> Brain {
        Brain::new(EntityId(7))
            .with_behavior(Wander::new(Means::new(10, 0)))
            .with_behavior(Chatter::from_lines(BehaviorKind::CombatChat, &["Die!"], Means::new(0, 3)))
    }

    #[test]
    fn boot_starts_idle_generators_only() {
        let mut brain = brain();
        let mut timers = ManualTimers::default();
        let mut rng = PcgRng::seeded(1);
        let config = CoreConfig::steady();
        brain.boot(&mut timers, &mut rng, &config).unwrap();

        let names: Vec<_> = brain.sequencer.query_names().collect();
        assert_eq!(names, ["script", "answers", "wander"]);
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn disengage_removes_only_combat_sequences() {
        let mut brain = brain();
        let mut timers = ManualTimers::default();
        let mut rng = PcgRng::seeded(1);
        let config = CoreConfig::steady();
        brain.boot(&mut timers, &mut rng, &config).unwrap();
        brain.engage(&mut timers, &mut rng, &config).unwrap();
        assert_eq!(
            brain.sequencer.query_flags("combat_chat"),
            Some(SequenceFlags::COMBAT)
        );

        assert_eq!(brain.disengage(), 1);
        assert!(brain.sequencer.query("combat_chat").is_none());
        assert_eq!(
            brain.sequencer.query("wander").map(<[_]>::len),
            Some(2)
        );
    }

    #[test]
    fn engaging_twice_does_not_stack_generators() {
        let mut brain = brain();
        let mut timers = ManualTimers::default();
        let mut rng = PcgRng::seeded(1);
        let config = CoreConfig::steady();
        brain.engage(&mut timers, &mut rng, &config).unwrap();
        brain.engage(&mut timers, &mut rng, &config).unwrap();
        assert_eq!(brain.sequencer.query("combat_chat").map(<[_]>::len), Some(2));
    }
}
