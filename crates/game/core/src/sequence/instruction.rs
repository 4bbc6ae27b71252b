//! Instruction tapes and their lazily-resolved payloads.

use std::fmt;
use std::sync::Arc;

use crate::behavior::BehaviorKind;
use crate::env::WorldView;
use crate::ids::{EntityId, Tick};

/// Closure evaluated when the tape reaches it.
pub type ResolveFn = dyn Fn(&ResolveContext<'_>) -> Resolved + Send + Sync;

/// What a closure produced when the tape reached it.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolved {
    /// Execute this command line through the host's command hook.
    Command(String),
    /// Try the same closure again after this many ticks.
    Postpone(u64),
    /// Replace the closure with these instructions.
    Splice(Vec<Instruction>),
    /// Consume the closure without doing anything.
    Nothing,
}

/// Context handed to closures at resolution time.
#[derive(Clone, Copy)]
pub struct ResolveContext<'a> {
    pub owner: EntityId,
    pub view: &'a dyn WorldView,
}

impl ResolveContext<'_> {
    pub fn now(&self) -> Tick {
        self.view.now()
    }

    pub fn in_combat(&self) -> bool {
        self.view.in_combat(self.owner)
    }
}

/// One step of a sequence tape.
#[derive(Clone)]
pub enum Instruction {
    /// Wait this many ticks. Decremented by elapsed time, never executed.
    Delay(i64),
    /// Command line executed as if the owner typed it.
    Command(String),
    /// Value computed when reached.
    Resolvable(Arc<ResolveFn>),
    /// Inner list flattened into the tape when reached.
    Nested(Vec<Instruction>),
    /// Fire the owner's behavior generator of this kind.
    Behavior(BehaviorKind),
}

impl Instruction {
    pub fn command(text: impl Into<String>) -> Self {
        Instruction::Command(text.into())
    }

    pub fn resolvable<F>(f: F) -> Self
    where
        F: Fn(&ResolveContext<'_>) -> Resolved + Send + Sync + 'static,
    {
        Instruction::Resolvable(Arc::new(f))
    }

    pub fn as_delay(&self) -> Option<i64> {
        match self {
            Instruction::Delay(ticks) => Some(*ticks),
            _ => None,
        }
    }

    pub fn as_command(&self) -> Option<&str> {
        match self {
            Instruction::Command(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Delay(ticks) => f.debug_tuple("Delay").field(ticks).finish(),
            Instruction::Command(text) => f.debug_tuple("Command").field(text).finish(),
            Instruction::Resolvable(_) => f.write_str("Resolvable(..)"),
            Instruction::Nested(inner) => f.debug_tuple("Nested").field(inner).finish(),
            Instruction::Behavior(kind) => f.debug_tuple("Behavior").field(kind).finish(),
        }
    }
}

impl PartialEq for Instruction {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Instruction::Delay(a), Instruction::Delay(b)) => a == b,
            (Instruction::Command(a), Instruction::Command(b)) => a == b,
            (Instruction::Resolvable(a), Instruction::Resolvable(b)) => {
                core::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            (Instruction::Nested(a), Instruction::Nested(b)) => a == b,
            (Instruction::Behavior(a), Instruction::Behavior(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for Instruction {
    fn from(text: &str) -> Self {
        Instruction::command(text)
    }
}

impl From<i64> for Instruction {
    fn from(ticks: i64) -> Self {
        Instruction::Delay(ticks)
    }
}
