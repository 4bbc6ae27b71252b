//! Traits describing the external collaborators the core consumes.
//!
//! The host supplies timers, a read-only world view, property storage,
//! messaging, command execution, and randomness. The core never owns any of
//! them; everything is passed in explicitly per call.
mod messaging;
mod props;
mod rng;
mod timer;
mod view;

pub use messaging::{Audience, CommandHook, Message, Messenger};
pub use props::{PropValue, PropertyStore, keys};
pub use rng::{PcgRng, RngOracle, ScriptedRng};
pub use timer::{Alarm, TimerFacility};
pub use view::{AttackRefusal, WorldView};
