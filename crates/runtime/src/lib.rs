//! Host runtime for the NPC sequencer and combat engine.
//!
//! This crate supplies everything `mud-core` consumes and drives it. Consumers
//! build a [`World`], populate it from content, connect players, and call
//! [`World::advance`] to move time forward.
//!
//! Modules are organized by responsibility:
//! - [`world`] owns the state and the alarm loop
//! - [`census`] is the read side: rooms, livings, properties
//! - [`timer`] is the priority-queue timer facility
//! - [`commands`] parses and executes command lines
//! - [`hooks`] reacts to world events (observers, aggression, death, questions)
//! - [`messaging`] records text delivered to livings
pub mod census;
pub mod commands;
pub mod config;
pub mod error;
pub mod events;
pub mod hooks;
pub mod living;
pub mod messaging;
pub mod rng;
pub mod room;
pub mod timer;
pub mod world;

mod combat;

pub use census::{Census, runtime_keys};
pub use commands::Verb;
pub use config::RuntimeConfig;
pub use error::{CommandError, Result, RuntimeError};
pub use events::WorldEvent;
pub use hooks::{
    AggressionHook, AskHook, DeathHook, HookContext, HookCriticality, HookRegistry, ObserverHook,
    WorldHook,
};
pub use living::Living;
pub use messaging::{Courier, Delivery, Outbox};
pub use rng::SeededRng;
pub use room::Room;
pub use timer::AlarmQueue;
pub use world::World;
