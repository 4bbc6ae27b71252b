//! Deterministic NPC sequencing and combat rules shared by hosts.
//!
//! `mud-core` defines the per-entity action sequencer, the behavior
//! generators that feed it, and the combat resolution engine. It consumes
//! its collaborators (timers, world view, properties, messaging, randomness)
//! through the traits in [`env`] and never performs I/O itself: every
//! operation takes the acting entity explicitly and returns what happened.
pub mod behavior;
pub mod combat;
pub mod config;
pub mod env;
pub mod error;
pub mod ids;
pub mod sequence;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use behavior::{
    Aggression, AggressionPlan, AskEntry, AskResponder, Behavior, BehaviorKind, Behaviors, Brain,
    Chatter, ExclusionPool, Fired, Means, PreAction, Wander,
};
pub use combat::{
    Attack, CombatContext, CombatHooks, CombatPhase, CombatRegistry, Combatant, DamageKinds,
    DamageType, DeathReport, Exchange, ExchangeEnv, ExchangeOutcome, HitLocation, HitReport,
    HookFault, PhaseError, RegistryError, StandardHooks, resolve_exchange,
};
pub use config::{CombatParams, CoreConfig, HitChanceParams};
pub use env::{
    Alarm, AttackRefusal, Audience, CommandHook, Message, Messenger, PcgRng, PropValue,
    PropertyStore, RngOracle, TimerFacility, WorldView,
};
pub use error::{CoreError, ErrorSeverity};
pub use ids::{AlarmId, AttackId, EntityId, HitlocId, RoomId, SkillId, Tick};
pub use sequence::{
    BeatOutcome, DriveState, Heartbeat, HeartbeatContext, Instruction, ResolveContext, Resolved,
    Sequence, SequenceError, SequenceFlags, Sequencer,
};
pub use template::{NpcOracle, NpcTemplate, PoolSpec, WanderSpec};
