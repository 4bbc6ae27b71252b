//! Hook registry for dispatching world events.

use std::sync::Arc;

use tracing::{debug, error};

use crate::error::RuntimeError;
use crate::events::WorldEvent;
use crate::world::World;

use super::{HookContext, HookCriticality, WorldHook};

/// Priority-ordered set of world hooks.
pub struct HookRegistry {
    hooks: Arc<[Arc<dyn WorldHook>]>,
}

impl HookRegistry {
    /// Creates a registry. Hooks are sorted by priority (lower values first);
    /// equal priorities keep their given order.
    pub fn new(mut hooks: Vec<Arc<dyn WorldHook>>) -> Self {
        hooks.sort_by_key(|hook| hook.priority());
        Self {
            hooks: hooks.into(),
        }
    }

    /// Creates a registry with the default set of hooks.
    ///
    /// - DeathHook: removes the dead and records the killer (critical)
    /// - ObserverHook: wakes dormant NPCs when a player arrives
    /// - AggressionHook: lets aggressive NPCs attack newcomers
    /// - AskHook: queues answers to questions (optional)
    pub fn default_hooks() -> Self {
        use super::{AggressionHook, AskHook, DeathHook, ObserverHook};

        Self::new(vec![
            Arc::new(DeathHook) as Arc<dyn WorldHook>,
            Arc::new(ObserverHook) as Arc<dyn WorldHook>,
            Arc::new(AggressionHook) as Arc<dyn WorldHook>,
            Arc::new(AskHook) as Arc<dyn WorldHook>,
        ])
    }

    /// Same registry plus `extra` hooks.
    pub fn with(self, extra: impl IntoIterator<Item = Arc<dyn WorldHook>>) -> Self {
        let mut hooks: Vec<_> = self.hooks.iter().cloned().collect();
        hooks.extend(extra);
        Self::new(hooks)
    }

    /// Offers `event` to every hook in priority order.
    ///
    /// # Errors
    ///
    /// The first failure of a [`HookCriticality::Critical`] hook. Other
    /// failures are logged and skipped.
    pub fn dispatch(&self, event: &WorldEvent, world: &mut World) -> Result<(), RuntimeError> {
        for hook in self.hooks.iter() {
            let ctx = HookContext {
                event,
                census: world.census(),
            };
            if !hook.should_trigger(&ctx) {
                continue;
            }
            if let Err(err) = hook.apply(event, world) {
                Self::handle_hook_error(hook.as_ref(), err)?;
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Hook names and priorities in execution order (for debugging).
    pub fn hooks(&self) -> impl Iterator<Item = (&'static str, i32)> + '_ {
        self.hooks.iter().map(|hook| (hook.name(), hook.priority()))
    }

    fn handle_hook_error(hook: &dyn WorldHook, err: RuntimeError) -> Result<(), RuntimeError> {
        match hook.criticality() {
            HookCriticality::Critical => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "critical",
                    error = %err,
                    "Critical hook failed, halting"
                );
                Err(err)
            }
            HookCriticality::Important => {
                error!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "important",
                    error = %err,
                    "Hook failed, continuing"
                );
                Ok(())
            }
            HookCriticality::Optional => {
                debug!(
                    target: "runtime::hooks",
                    hook = hook.name(),
                    criticality = "optional",
                    error = %err,
                    "Optional hook failed"
                );
                Ok(())
            }
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::default_hooks()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.hooks.iter().map(|hook| hook.name()))
            .finish()
    }
}
