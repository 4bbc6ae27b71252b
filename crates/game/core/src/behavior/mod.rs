//! Behavior generators feeding the sequencer.
//!
//! Each generator owns an [`ExclusionPool`] of candidate actions and is
//! driven by a self re-arming [`Instruction::Behavior`] on its own sequence.
//! Question answering and aggression produce one-off tapes instead.
mod aggression;
mod ask;
mod brain;
mod generator;
mod pool;

pub use aggression::{Aggression, AggressionPlan, PreAction};
pub use ask::{AskEntry, AskResponder};
pub use brain::Brain;
pub use generator::{Chatter, Means, Wander};
pub use pool::ExclusionPool;

use strum::{Display, EnumCount, EnumIter, IntoStaticStr};

use crate::env::RngOracle;
use crate::sequence::{Instruction, ResolveContext, SequenceFlags};

/// Kinds of periodic behavior generators.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter, IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BehaviorKind {
    Wander,
    IdleAct,
    IdleChat,
    CombatAct,
    CombatChat,
}

impl BehaviorKind {
    /// Reserved sequence name driving this generator.
    pub fn sequence_name(self) -> &'static str {
        self.into()
    }

    /// Combat generators live only while the owner is engaged.
    pub const fn is_combat(self) -> bool {
        matches!(self, BehaviorKind::CombatAct | BehaviorKind::CombatChat)
    }
}

/// Shared interface of the periodic generators.
pub trait Behavior: Send + Sync {
    fn kind(&self) -> BehaviorKind;

    /// Whether a pick should be made given the owner's combat status.
    fn is_active(&self, in_combat: bool) -> bool;

    /// Mean re-arm interval for the given combat status. Zero stops re-arming.
    fn interval(&self, in_combat: bool) -> u64;

    /// Next action, or `None` when there is nothing to do.
    fn pick(&mut self, ctx: &ResolveContext<'_>, rng: &mut dyn RngOracle) -> Option<Instruction>;

    /// Flags of the sequence driving this generator.
    fn flags(&self) -> SequenceFlags {
        if self.kind().is_combat() {
            SequenceFlags::COMBAT
        } else {
            SequenceFlags::empty()
        }
    }
}

/// What firing a generator produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Fired {
    /// Instruction to run now.
    pub instruction: Option<Instruction>,
    /// Ticks until the generator fires again.
    pub rearm: Option<u64>,
}

/// Generators owned by one entity, at most one per kind.
#[derive(Default)]
pub struct Behaviors {
    generators: Vec<Box<dyn Behavior>>,
}

impl Behaviors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a generator, replacing any previous one of the same kind.
    pub fn insert(&mut self, behavior: Box<dyn Behavior>) {
        let kind = behavior.kind();
        self.generators.retain(|existing| existing.kind() != kind);
        self.generators.push(behavior);
    }

    pub fn get(&self, kind: BehaviorKind) -> Option<&dyn Behavior> {
        self.generators
            .iter()
            .find(|behavior| behavior.kind() == kind)
            .map(|behavior| behavior.as_ref())
    }

    pub fn kinds(&self) -> impl Iterator<Item = BehaviorKind> + '_ {
        self.generators.iter().map(|behavior| behavior.kind())
    }

    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Jittered re-arm delay around the generator's current mean interval.
    pub fn first_delay(&self, kind: BehaviorKind, in_combat: bool, rng: &mut dyn RngOracle) -> Option<u64> {
        self.get(kind)
            .and_then(|behavior| rearm_delay(behavior.interval(in_combat), rng))
    }

    /// Fires the generator of `kind`.
    ///
    /// The interval is chosen from the owner's combat status now, not when
    /// the instruction was queued. An uninstalled kind yields nothing.
    pub fn fire(&mut self, kind: BehaviorKind, ctx: &ResolveContext<'_>, rng: &mut dyn RngOracle) -> Fired {
        let Some(behavior) = self
            .generators
            .iter_mut()
            .find(|behavior| behavior.kind() == kind)
        else {
            return Fired::default();
        };
        let in_combat = ctx.in_combat();
        let instruction = if behavior.is_active(in_combat) {
            behavior.pick(ctx, rng)
        } else {
            None
        };
        Fired {
            instruction,
            rearm: rearm_delay(behavior.interval(in_combat), rng),
        }
    }
}

impl core::fmt::Debug for Behaviors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}

/// `mean/2 + below(mean+1)`, never below one tick. `None` when `mean` is zero.
fn rearm_delay(mean: u64, rng: &mut dyn RngOracle) -> Option<u64> {
    if mean == 0 {
        return None;
    }
    let spread = u32::try_from(mean.saturating_add(1)).unwrap_or(u32::MAX);
    Some((mean / 2 + u64::from(rng.below(spread))).max(1))
}
