//! Hook that routes questions to NPC responders.

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

use super::{HookContext, HookCriticality, WorldHook};

#[derive(Debug, Clone, Copy)]
pub struct AskHook;

impl WorldHook for AskHook {
    fn name(&self) -> &'static str {
        "ask"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Optional
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        matches!(ctx.event, WorldEvent::Asked { .. })
    }

    fn apply(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError> {
        match event {
            WorldEvent::Asked {
                asker,
                target,
                question,
            } => world.pose_question(*asker, *target, question),
            _ => Ok(()),
        }
    }
}
