//! Attack and hit-location registries with an equipment override layer.
//!
//! Every combatant owns one [`CombatRegistry`] built at spawn time. Unarmed
//! values live in the base layer; carried weapons and worn armor are
//! installed as overrides and shadow the base entry with the same id until
//! removed.

use std::collections::BTreeMap;

use crate::error::{CoreError, ErrorSeverity};
use crate::ids::{AttackId, HitlocId, SkillId};

use super::damage::{Armor, DamageKinds, DamageType};

/// Errors reported by registry operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("malformed attack {id:?}: {reason}")]
    MalformedAttack { id: AttackId, reason: &'static str },

    #[error("malformed hit location {id:?}: {reason}")]
    MalformedHitloc { id: HitlocId, reason: &'static str },

    #[error("attack {0:?} listed twice")]
    DuplicateAttack(AttackId),

    #[error("hit location {0:?} listed twice")]
    DuplicateHitloc(HitlocId),

    #[error("no attack {0:?} registered")]
    UnknownAttack(AttackId),

    #[error("no hit location {0:?} registered")]
    UnknownHitloc(HitlocId),
}

impl CoreError for RegistryError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedAttack { .. } => "REGISTRY_MALFORMED_ATTACK",
            Self::MalformedHitloc { .. } => "REGISTRY_MALFORMED_HITLOC",
            Self::DuplicateAttack(_) => "REGISTRY_DUPLICATE_ATTACK",
            Self::DuplicateHitloc(_) => "REGISTRY_DUPLICATE_HITLOC",
            Self::UnknownAttack(_) => "REGISTRY_UNKNOWN_ATTACK",
            Self::UnknownHitloc(_) => "REGISTRY_UNKNOWN_HITLOC",
        }
    }
}

/// Offensive capability of a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attack {
    pub id: AttackId,
    /// Added to the base hit chance.
    pub to_hit: i32,
    /// Penetration class rolled against armor.
    pub penetration: u32,
    pub kinds: DamageKinds,
    /// Share of exchanges this attack is used in, 0..=100.
    pub use_pct: u32,
    pub skill: Option<SkillId>,
    /// Narration name, e.g. "claws".
    pub desc: String,
}

/// Defensive region of a combatant.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HitLocation {
    pub id: HitlocId,
    pub armor: Armor,
    /// Chance to be struck, 0..=100.
    pub hit_pct: u32,
    pub desc: String,
}

/// Entries stored in a [`Layered`] registry.
pub trait Descriptor: Clone {
    type Id: Copy + Ord + core::fmt::Debug;

    fn id(&self) -> Self::Id;

    fn validate(&self) -> Result<(), RegistryError>;

    fn unknown(id: Self::Id) -> RegistryError;
}

impl Descriptor for Attack {
    type Id = AttackId;

    fn id(&self) -> AttackId {
        self.id
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let reason = if self.use_pct > 100 {
            "use percentage above 100"
        } else if self.kinds.is_empty() {
            "no damage type"
        } else if self.desc.trim().is_empty() {
            "empty description"
        } else {
            return Ok(());
        };
        Err(RegistryError::MalformedAttack {
            id: self.id,
            reason,
        })
    }

    fn unknown(id: AttackId) -> RegistryError {
        RegistryError::UnknownAttack(id)
    }
}

impl Descriptor for HitLocation {
    type Id = HitlocId;

    fn id(&self) -> HitlocId {
        self.id
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let reason = if self.hit_pct > 100 {
            "hit percentage above 100"
        } else if self.desc.trim().is_empty() {
            "empty description"
        } else {
            return Ok(());
        };
        Err(RegistryError::MalformedHitloc {
            id: self.id,
            reason,
        })
    }

    fn unknown(id: HitlocId) -> RegistryError {
        RegistryError::UnknownHitloc(id)
    }
}

/// Whether a registration is visible to combat right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Registration {
    Active,
    /// Refused: an override with the same id takes precedence.
    Shadowed,
}

/// Base entries with an override layer on top.
#[derive(Clone, Debug)]
pub struct Layered<D: Descriptor> {
    base: BTreeMap<D::Id, D>,
    overrides: BTreeMap<D::Id, D>,
}

impl<D: Descriptor> Default for Layered<D> {
    fn default() -> Self {
        Self {
            base: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl<D: Descriptor> Layered<D> {
    /// Registers or overwrites a base entry.
    ///
    /// While an override holds the id the base entry is left untouched and
    /// the call reports [`Registration::Shadowed`].
    pub fn register(&mut self, descriptor: D) -> Result<Registration, RegistryError> {
        descriptor.validate()?;
        let id = descriptor.id();
        if self.overrides.contains_key(&id) {
            return Ok(Registration::Shadowed);
        }
        self.base.insert(id, descriptor);
        Ok(Registration::Active)
    }

    /// Removes the base entry. Overrides are left in place.
    pub fn unregister(&mut self, id: D::Id) -> Result<D, RegistryError> {
        self.base.remove(&id).ok_or_else(|| D::unknown(id))
    }

    pub fn install_override(&mut self, descriptor: D) -> Result<Option<D>, RegistryError> {
        descriptor.validate()?;
        Ok(self.overrides.insert(descriptor.id(), descriptor))
    }

    pub fn remove_override(&mut self, id: D::Id) -> Option<D> {
        self.overrides.remove(&id)
    }

    /// Effective entry: the override if present, otherwise the base.
    pub fn get(&self, id: D::Id) -> Option<&D> {
        self.overrides.get(&id).or_else(|| self.base.get(&id))
    }

    pub fn base(&self, id: D::Id) -> Option<&D> {
        self.base.get(&id)
    }

    /// Effective entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &D> + Clone + '_ {
        let shadowed = self
            .base
            .iter()
            .filter(|(id, _)| !self.overrides.contains_key(id))
            .map(|(_, descriptor)| descriptor);
        let mut merged: Vec<&D> = shadowed.chain(self.overrides.values()).collect();
        merged.sort_by_key(|descriptor| descriptor.id());
        merged.into_iter()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.overrides.is_empty()
    }
}

/// Attacks and hit locations of one combatant, plus accumulated armor wear.
#[derive(Clone, Debug, Default)]
pub struct CombatRegistry {
    attacks: Layered<Attack>,
    hitlocs: Layered<HitLocation>,
    wear: BTreeMap<HitlocId, Armor>,
}

impl CombatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_attack(&mut self, attack: Attack) -> Result<Registration, RegistryError> {
        self.attacks.register(attack)
    }

    pub fn remove_attack(&mut self, id: AttackId) -> Result<Attack, RegistryError> {
        self.attacks.unregister(id)
    }

    pub fn query_attack(&self, id: AttackId) -> Option<&Attack> {
        self.attacks.get(id)
    }

    pub fn attacks(&self) -> impl Iterator<Item = &Attack> + Clone + '_ {
        self.attacks.iter()
    }

    /// Installs a weapon attack over the unarmed one with the same id.
    pub fn wield(&mut self, attack: Attack) -> Result<Option<Attack>, RegistryError> {
        self.attacks.install_override(attack)
    }

    pub fn unwield(&mut self, id: AttackId) -> Option<Attack> {
        self.attacks.remove_override(id)
    }

    pub fn add_hitloc(&mut self, hitloc: HitLocation) -> Result<Registration, RegistryError> {
        self.hitlocs.register(hitloc)
    }

    /// Removes the hit location together with its accumulated wear.
    pub fn remove_hitloc(&mut self, id: HitlocId) -> Result<HitLocation, RegistryError> {
        let removed = self.hitlocs.unregister(id)?;
        self.wear.remove(&id);
        Ok(removed)
    }

    pub fn query_hitloc(&self, id: HitlocId) -> Option<&HitLocation> {
        self.hitlocs.get(id)
    }

    pub fn hitlocs(&self) -> impl Iterator<Item = &HitLocation> + Clone + '_ {
        self.hitlocs.iter()
    }

    /// Installs worn armor over the natural location with the same id.
    pub fn wear_armor(&mut self, hitloc: HitLocation) -> Result<Option<HitLocation>, RegistryError> {
        self.hitlocs.install_override(hitloc)
    }

    /// Takes armor off; any wear it accumulated goes with it.
    pub fn remove_armor(&mut self, id: HitlocId) -> Option<HitLocation> {
        let removed = self.hitlocs.remove_override(id);
        if removed.is_some() {
            self.wear.remove(&id);
        }
        removed
    }

    /// Degrades a location's armor against one damage type.
    pub fn degrade(&mut self, id: HitlocId, ty: DamageType, amount: u32) -> Result<(), RegistryError> {
        if self.hitlocs.get(id).is_none() {
            return Err(RegistryError::UnknownHitloc(id));
        }
        self.wear.entry(id).or_default().add(ty, amount);
        Ok(())
    }

    pub fn wear(&self, id: HitlocId) -> Armor {
        self.wear.get(&id).copied().unwrap_or_default()
    }

    /// Armor of the location after wear.
    pub fn effective_armor(&self, id: HitlocId) -> Option<Armor> {
        self.hitlocs
            .get(id)
            .map(|hitloc| hitloc.armor.worn_by(&self.wear(id)))
    }
}
