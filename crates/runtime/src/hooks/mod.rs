//! World-event hook system.
//!
//! Hooks react to [`WorldEvent`]s raised by commands, combat, and spawning.
//! Each hook inspects the event through a read-only [`HookContext`] and, when
//! it triggers, acts on the world. Actions may raise further events, which
//! are queued and dispatched after the current one, so reactions cascade
//! without recursion.
//!
//! # Architecture
//!
//! - Hooks are registered in a [`HookRegistry`] and sorted by priority
//! - Every queued event is offered to every hook in priority order
//! - Hook failures are handled according to [`HookCriticality`]

mod aggression;
mod ask;
mod context;
mod death;
mod observer;
mod registry;

pub use aggression::AggressionHook;
pub use ask::AskHook;
pub use context::HookContext;
pub use death::DeathHook;
pub use observer::ObserverHook;
pub use registry::HookRegistry;

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

/// Defines the criticality level of a hook for error handling.
///
/// - Critical hooks must succeed or the world stops advancing
/// - Important hooks log errors but allow continuation
/// - Optional hooks can fail silently
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookCriticality {
    /// Hook failure is returned from [`World::advance`].
    ///
    /// Use for hooks that keep the world consistent, e.g. removing the dead.
    Critical,

    /// Hook failure is logged as an error; the remaining hooks still run.
    Important,

    /// Hook failure is logged at debug level.
    Optional,
}

/// Reaction to a world event.
///
/// # Execution Order
///
/// Hooks are sorted by priority (lower values execute first):
/// - Negative priorities: bookkeeping that later hooks rely on (death, observers)
/// - Zero: default priority for most hooks
/// - Positive priorities: optional or cosmetic hooks
pub trait WorldHook: Send + Sync {
    /// Returns a human-readable name for this hook (used in logging).
    fn name(&self) -> &'static str;

    fn priority(&self) -> i32 {
        0
    }

    fn criticality(&self) -> HookCriticality {
        HookCriticality::Important
    }

    /// Whether the hook cares about this event.
    fn should_trigger(&self, ctx: &HookContext<'_>) -> bool;

    /// Acts on the world. Only called when [`should_trigger`] returned true.
    ///
    /// [`should_trigger`]: WorldHook::should_trigger
    fn apply(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError>;
}
