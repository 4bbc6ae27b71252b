//! Hook that clears the dead out of the world.

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

use super::{HookContext, HookCriticality, WorldHook};

/// Announces a death, records the killer, and removes the victim.
///
/// Runs first: later hooks must never see a dead living as present.
#[derive(Debug, Clone, Copy)]
pub struct DeathHook;

impl WorldHook for DeathHook {
    fn name(&self) -> &'static str {
        "death"
    }

    fn priority(&self) -> i32 {
        -20
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Critical
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        matches!(ctx.event, WorldEvent::Died { .. })
    }

    fn apply(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError> {
        match event {
            WorldEvent::Died {
                victim,
                victim_name,
                killer,
                ..
            } => world.bury(*victim, victim_name, *killer),
            _ => Ok(()),
        }
    }
}
