use crate::env::RngOracle;
use crate::sequence::{Instruction, ResolveContext, Resolved, SequenceFlags};

use super::{Behavior, BehaviorKind, ExclusionPool};

/// Mean re-arm intervals for the idle and in-combat states.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Means {
    pub idle: u64,
    pub combat: u64,
}

impl Means {
    pub const fn new(idle: u64, combat: u64) -> Self {
        Self { idle, combat }
    }

    pub const fn for_state(&self, in_combat: bool) -> u64 {
        if in_combat { self.combat } else { self.idle }
    }
}

/// Random act or chat generator over a fixed pool.
///
/// Chat items are spoken: plain lines get a `say ` prefix when installed and
/// closure results get it when resolved.
pub struct Chatter {
    kind: BehaviorKind,
    pool: ExclusionPool<Instruction>,
    means: Means,
}

impl Chatter {
    pub fn new(kind: BehaviorKind, items: Vec<Instruction>, means: Means) -> Self {
        let speaks = matches!(kind, BehaviorKind::IdleChat | BehaviorKind::CombatChat);
        let items = if speaks {
            items.into_iter().map(spoken).collect()
        } else {
            items
        };
        Self {
            kind,
            pool: ExclusionPool::new(items),
            means,
        }
    }

    /// Convenience constructor from plain command lines.
    pub fn from_lines<S: AsRef<str>>(kind: BehaviorKind, lines: &[S], means: Means) -> Self {
        let items = lines
            .iter()
            .map(|line| Instruction::command(line.as_ref()))
            .collect();
        Self::new(kind, items, means)
    }

    pub fn pool(&self) -> &ExclusionPool<Instruction> {
        &self.pool
    }
}

fn spoken(item: Instruction) -> Instruction {
    match item {
        Instruction::Command(text) => Instruction::Command(format!("say {text}")),
        Instruction::Resolvable(inner) => Instruction::resolvable(move |ctx| match inner(ctx) {
            Resolved::Command(text) => Resolved::Command(format!("say {text}")),
            other => other,
        }),
        other => other,
    }
}

impl Behavior for Chatter {
    fn kind(&self) -> BehaviorKind {
        self.kind
    }

    fn is_active(&self, in_combat: bool) -> bool {
        self.kind.is_combat() == in_combat
    }

    fn interval(&self, in_combat: bool) -> u64 {
        self.means.for_state(in_combat)
    }

    fn pick(&mut self, _ctx: &ResolveContext<'_>, rng: &mut dyn RngOracle) -> Option<Instruction> {
        self.pool.pick(rng)
    }
}

/// Random walk through the exits of the owner's current location.
///
/// The exit pool is rebuilt whenever the set of available exits changes, so
/// every exit of a room is tried once before any repeats.
pub struct Wander {
    pool: ExclusionPool<String>,
    seen_exits: Vec<String>,
    restrain: Vec<String>,
    means: Means,
    permanent: bool,
}

impl Wander {
    pub fn new(means: Means) -> Self {
        Self {
            pool: ExclusionPool::default(),
            seen_exits: Vec::new(),
            restrain: Vec::new(),
            means,
            permanent: false,
        }
    }

    /// Exits that are never taken.
    pub fn restrain(mut self, exits: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.restrain = exits.into_iter().map(Into::into).collect();
        self
    }

    /// Keep wandering even when nobody is around to see it.
    pub fn permanent(mut self, permanent: bool) -> Self {
        self.permanent = permanent;
        self
    }

    fn refresh(&mut self, mut exits: Vec<String>) {
        exits.sort();
        if exits == self.seen_exits {
            return;
        }
        let allowed = exits
            .iter()
            .filter(|exit| !self.restrain.contains(exit))
            .cloned()
            .collect();
        self.pool.reset(allowed);
        self.seen_exits = exits;
    }
}

impl Behavior for Wander {
    fn kind(&self) -> BehaviorKind {
        BehaviorKind::Wander
    }

    fn is_active(&self, in_combat: bool) -> bool {
        !in_combat
    }

    fn interval(&self, in_combat: bool) -> u64 {
        self.means.for_state(in_combat)
    }

    fn pick(&mut self, ctx: &ResolveContext<'_>, rng: &mut dyn RngOracle) -> Option<Instruction> {
        self.refresh(ctx.view.exits(ctx.owner));
        self.pool.pick(rng).map(Instruction::Command)
    }

    fn flags(&self) -> SequenceFlags {
        if self.permanent {
            SequenceFlags::NONSTOP
        } else {
            SequenceFlags::empty()
        }
    }
}

impl core::fmt::Debug for Wander {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Wander")
            .field("exits", &self.seen_exits)
            .field("restrain", &self.restrain)
            .field("means", &self.means)
            .field("permanent", &self.permanent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::ids::EntityId;
    use crate::testing::FakeView;

    #[test]
    fn chat_lines_are_spoken() {
        let mut chatter = Chatter::from_lines(BehaviorKind::IdleChat, &["hello"], Means::new(5, 0));
        let view = FakeView::default();
        let ctx = ResolveContext {
            owner: EntityId(1),
            view: &view,
        };
        let mut rng = ScriptedRng::new([0]);
        assert_eq!(chatter.pick(&ctx, &mut rng), Some(Instruction::command("say hello")));
    }

    #[test]
    fn spoken_closures_are_prefixed_on_resolution() {
        let item = spoken(Instruction::resolvable(|ctx| {
            Resolved::Command(format!("it is {}", ctx.now()))
        }));
        let view = FakeView::default();
        let ctx = ResolveContext {
            owner: EntityId(1),
            view: &view,
        };
        let Instruction::Resolvable(closure) = item else {
            panic!("closure expected");
        };
        assert_eq!(closure(&ctx), Resolved::Command("say it is t0".into()));
    }

    #[test]
    fn wander_skips_restrained_exits_and_rebuilds_on_change() {
        let mut view = FakeView::default();
        view.exits = vec!["north".into(), "down".into(), "east".into()];
        let mut wander = Wander::new(Means::new(10, 0)).restrain(["down"]);
        let mut rng = ScriptedRng::new([0, 1, 2, 3]);
        let owner = EntityId(1);

        let mut picks = Vec::new();
        for _ in 0..2 {
            let ctx = ResolveContext { owner, view: &view };
            picks.push(wander.pick(&ctx, &mut rng));
        }
        let mut taken: Vec<_> = picks
            .iter()
            .flatten()
            .filter_map(|step| step.as_command().map(str::to_owned))
            .collect();
        taken.sort();
        assert_eq!(taken, ["east", "north"]);

        view.exits = vec!["west".into()];
        let ctx = ResolveContext { owner, view: &view };
        assert_eq!(wander.pick(&ctx, &mut rng), Some(Instruction::command("west")));
    }

    #[test]
    fn permanent_wander_is_nonstop() {
        assert_eq!(Wander::new(Means::default()).permanent(true).flags(), SequenceFlags::NONSTOP);
        assert!(!Wander::new(Means::default()).is_active(true));
    }
}
