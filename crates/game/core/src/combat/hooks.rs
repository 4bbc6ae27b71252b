//! Per-combatant overridable callbacks invoked by the exchange engine.
//!
//! Callbacks return [`Fault`] instead of panicking. The engine wraps a fault
//! in a [`HookFault`], records it on the exchange, and carries on with the
//! default behavior for that callback.

use strum::Display;

use crate::env::{Message, RngOracle};
use crate::error::{CoreError, ErrorSeverity};
use crate::ids::{AttackId, EntityId};

use super::registry::{Attack, CombatRegistry};
use super::result::HitReport;

/// Failure raised by a custom callback.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Fault(pub String);

impl Fault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

/// Callback that produced a fault.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum HookPoint {
    TryHit,
    GotHit,
    DidHit,
    AttackDesc,
}

/// A callback fault caught at the engine boundary.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{point} hook of {owner} failed")]
pub struct HookFault {
    pub owner: EntityId,
    pub point: HookPoint,
    #[source]
    pub fault: Fault,
}

impl CoreError for HookFault {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        "COMBAT_HOOK_FAULT"
    }
}

/// A landed blow as seen by narration.
#[derive(Clone, Copy, Debug)]
pub struct Blow<'a> {
    pub report: &'a HitReport,
    pub attacker_name: &'a str,
    pub defender_name: &'a str,
    /// Attack description, e.g. "claws".
    pub weapon: &'a str,
}

/// Callbacks a combatant type may override. Every method has a default.
pub trait CombatHooks: Send + Sync {
    /// Veto an attack for reasons intrinsic to it. `Ok(false)` fails it.
    fn try_hit(&self, attack: &Attack, rng: &mut dyn RngOracle) -> Result<bool, Fault> {
        let _ = (attack, rng);
        Ok(true)
    }

    /// Called on the defender after damage is applied.
    fn got_hit(&self, registry: &mut CombatRegistry, hit: &HitReport) -> Result<(), Fault> {
        let _ = (registry, hit);
        Ok(())
    }

    /// Called on the attacker. `Some` replaces the default narration.
    fn did_hit(&self, blow: &Blow<'_>) -> Result<Option<Vec<Message>>, Fault> {
        let _ = blow;
        Ok(None)
    }

    fn attack_desc(&self, attack: &Attack) -> Result<String, Fault> {
        Ok(attack.desc.clone())
    }
}

/// Stock hooks: optional armor wear and unreliable attacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StandardHooks {
    /// Armor lost against the striking type per damaging blow.
    pub armor_wear: u32,
    /// Attacks that only work part of the time, with their success percent.
    pub unreliable: Vec<(AttackId, u32)>,
}

impl CombatHooks for StandardHooks {
    fn try_hit(&self, attack: &Attack, rng: &mut dyn RngOracle) -> Result<bool, Fault> {
        Ok(self
            .unreliable
            .iter()
            .find(|(id, _)| *id == attack.id)
            .is_none_or(|&(_, chance)| rng.chance(chance)))
    }

    fn got_hit(&self, registry: &mut CombatRegistry, hit: &HitReport) -> Result<(), Fault> {
        if self.armor_wear == 0 || hit.damage == 0 {
            return Ok(());
        }
        registry
            .degrade(hit.hitloc, hit.damage_type, self.armor_wear)
            .map_err(|err| Fault::new(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{Armor, DamageKinds, DamageType, HitLocation};
    use crate::env::ScriptedRng;
    use crate::ids::HitlocId;

    fn bite() -> Attack {
        Attack {
            id: AttackId(2),
            to_hit: 0,
            penetration: 4,
            kinds: DamageKinds::IMPALE,
            use_pct: 50,
            skill: None,
            desc: "bite".into(),
        }
    }

    #[test]
    fn unreliable_attack_is_vetoed_by_roll() {
        let hooks = StandardHooks {
            unreliable: vec![(AttackId(2), 30)],
            ..StandardHooks::default()
        };
        let mut rng = ScriptedRng::new([50, 10]);
        assert_eq!(hooks.try_hit(&bite(), &mut rng), Ok(false));
        assert_eq!(hooks.try_hit(&bite(), &mut rng), Ok(true));
    }

    #[test]
    fn damaging_blows_wear_armor() {
        let hooks = StandardHooks {
            armor_wear: 2,
            ..StandardHooks::default()
        };
        let mut registry = CombatRegistry::new();
        registry
            .add_hitloc(HitLocation {
                id: HitlocId(1),
                armor: Armor::uniform(5),
                hit_pct: 100,
                desc: "hide".into(),
            })
            .unwrap();
        let mut hit = HitReport {
            attacker: EntityId(1),
            defender: EntityId(2),
            attack: AttackId(2),
            hitloc: HitlocId(1),
            location: "hide".into(),
            damage_type: DamageType::Impale,
            damage: 3,
            hurt_pct: 10,
            hp_left: 27,
        };
        hooks.got_hit(&mut registry, &hit).unwrap();
        hit.damage = 0;
        hooks.got_hit(&mut registry, &hit).unwrap();
        assert_eq!(registry.effective_armor(HitlocId(1)), Some(Armor([3, 5, 5])));

        hit.hitloc = HitlocId(9);
        hit.damage = 1;
        assert!(hooks.got_hit(&mut registry, &hit).is_err());
    }
}
