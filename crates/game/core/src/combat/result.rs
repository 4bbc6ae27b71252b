//! Outcome types of one combat exchange.

use crate::env::Message;
use crate::ids::{AttackId, EntityId, HitlocId};

use super::damage::DamageType;
use super::hooks::HookFault;

/// Details of a blow that landed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HitReport {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub attack: AttackId,
    pub hitloc: HitlocId,
    /// Description of the location struck.
    pub location: String,
    pub damage_type: DamageType,
    /// Hit points removed.
    pub damage: u32,
    /// Share of the defender's hit points before the blow, 0..=100.
    pub hurt_pct: u32,
    pub hp_left: u32,
}

/// How an exchange ended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// A combatant was dead or gone; nothing happened.
    #[default]
    Abandoned,
    /// The attack roll fell in the unused share of the turn.
    NoAttack,
    /// The attack's own hook refused to strike.
    Vetoed(AttackId),
    Missed(AttackId),
    Hit(HitReport),
}

impl ExchangeOutcome {
    pub fn hit(&self) -> Option<&HitReport> {
        match self {
            ExchangeOutcome::Hit(report) => Some(report),
            _ => None,
        }
    }
}

/// Produced exactly once when a combatant dies.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeathReport {
    pub victim: EntityId,
    pub victim_name: String,
    pub killer: Option<EntityId>,
}

/// Everything one exchange produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exchange {
    pub attacker: EntityId,
    pub defender: EntityId,
    pub outcome: ExchangeOutcome,
    /// Narration for the host to deliver.
    pub messages: Vec<Message>,
    pub death: Option<DeathReport>,
    /// Hook failures that were replaced by default behavior.
    pub faults: Vec<HookFault>,
}

impl Exchange {
    pub(crate) fn new(attacker: EntityId, defender: EntityId) -> Self {
        Self {
            attacker,
            defender,
            ..Self::default()
        }
    }
}
