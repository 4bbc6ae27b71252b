//! Combat resolution.
//!
//! Every combatant owns a [`CombatContext`]: attack and hit-location
//! registries layered under equipment overrides, an attack-use budget, and
//! the encounter it is currently part of. [`resolve_exchange`] runs one
//! attacker-against-defender exchange and returns everything it produced;
//! nothing here logs or delivers messages.
//!
//! # Core Functions
//!
//! - `resolve_exchange`: attack selection, to-hit, hit location, penetration, hooks, death
//! - `hit_chance`: to-hit class vs evasion
//! - `penetration_chance`: exact odds that a penetration roll deals damage
//! - `pick_weighted`: weighted selection with an implicit "nothing" remainder

pub mod context;
pub mod damage;
pub mod engine;
pub mod hit;
pub mod hooks;
pub mod narration;
pub mod phase;
pub mod registry;
pub mod result;

pub use context::{CombatContext, Combatant, Encounter, Vitals};
pub use damage::{Armor, DamageKinds, DamageType, apply_damage, hurt_percent, roll_penetration};
pub use engine::{ExchangeEnv, resolve_exchange};
pub use hit::{check_hit, hit_chance, penetration_chance, pick_weighted};
pub use hooks::{Blow, CombatHooks, Fault, HookFault, HookPoint, StandardHooks};
pub use narration::{Degree, capitalize, narrate_hit, narrate_miss};
pub use phase::{CombatPhase, PhaseError};
pub use registry::{
    Attack, CombatRegistry, Descriptor, HitLocation, Layered, Registration, RegistryError,
};
pub use result::{DeathReport, Exchange, ExchangeOutcome, HitReport};
