//! Hook that wakes dormant NPCs when a player shows up.

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

use super::{HookContext, HookCriticality, WorldHook};

/// Re-arms the sequencers of dormant NPCs in the room a player enters.
///
/// NPCs nobody has watched for a while stop ticking and register as
/// watchers; this is the only thing that starts them again.
#[derive(Debug, Clone, Copy)]
pub struct ObserverHook;

impl WorldHook for ObserverHook {
    fn name(&self) -> &'static str {
        "observer"
    }

    fn priority(&self) -> i32 {
        -10
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        match ctx.event {
            WorldEvent::Arrived { entity, .. } => ctx.is_interactive(*entity),
            _ => false,
        }
    }

    fn apply(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError> {
        if let WorldEvent::Arrived { room, .. } = event {
            world.wake_watchers(*room);
        }
        Ok(())
    }
}
