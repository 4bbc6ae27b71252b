//! Hook that lets aggressive NPCs jump newcomers.

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

use super::{HookContext, WorldHook};

/// Offers aggressive NPCs a chance to attack on every arrival.
///
/// A player arriving is considered by every aggressive NPC in the room; an
/// aggressive NPC arriving considers every player already there.
#[derive(Debug, Clone, Copy)]
pub struct AggressionHook;

impl WorldHook for AggressionHook {
    fn name(&self) -> &'static str {
        "aggression"
    }

    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool {
        matches!(ctx.event, WorldEvent::Arrived { .. })
    }

    fn apply(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError> {
        let WorldEvent::Arrived { entity, room, .. } = *event else {
            return Ok(());
        };
        let census = world.census();
        let arriving_player = census.living(entity).is_some_and(|living| living.interactive);

        let pairs: Vec<_> = census
            .occupants(room)
            .filter(|other| other.id != entity)
            .filter_map(|other| match (arriving_player, other.interactive) {
                (true, false) => Some((other.id, entity)),
                (false, true) => Some((entity, other.id)),
                _ => None,
            })
            .collect();

        for (npc, target) in pairs {
            world.provoke(npc, target)?;
        }
        Ok(())
    }
}
