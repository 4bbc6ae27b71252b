//! Read-only context offered to hooks when deciding whether to trigger.

use crate::census::Census;
use crate::events::WorldEvent;

/// The event being dispatched and the world it happened in.
pub struct HookContext<'a> {
    pub event: &'a WorldEvent,
    pub census: &'a Census,
}

impl HookContext<'_> {
    /// Whether `entity` is driven by a player.
    pub fn is_interactive(&self, entity: mud_core::EntityId) -> bool {
        self.census
            .living(entity)
            .is_some_and(|living| living.interactive)
    }
}
