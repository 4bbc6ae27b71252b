//! Per-entity action sequencer.
//!
//! An entity owns a [`Sequencer`]: a fixed-capacity set of named instruction
//! tapes advanced together by a heartbeat alarm. Behavior generators, answers
//! to questions, and scripted actions all feed tapes; the heartbeat hands the
//! resulting command lines back to the host for execution.
mod instruction;
mod sequencer;
mod tape;

pub use instruction::{Instruction, ResolveContext, ResolveFn, Resolved};
pub use sequencer::{
    BeatOutcome, DriveState, Heartbeat, HeartbeatContext, SequenceError, Sequencer,
};
pub use tape::{Sequence, SequenceFlags};
