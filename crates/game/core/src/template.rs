//! Data-driven NPC definitions.
//!
//! An [`NpcTemplate`] can be deserialized from RON and spawned into the two
//! halves of an NPC: its [`Brain`] and its [`Combatant`]. Every spawn builds
//! fresh registries and pools, so no mutable state is shared between NPCs of
//! the same template.

use std::sync::Arc;

use crate::behavior::{Aggression, AskResponder, BehaviorKind, Brain, Chatter, Means, Wander};
use crate::combat::{Attack, CombatContext, CombatRegistry, Combatant, HitLocation, RegistryError, StandardHooks};
use crate::ids::{EntityId, SkillId};

/// Pool of act or chat lines with their mean intervals.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolSpec {
    pub lines: Vec<String>,
    pub means: Means,
}

/// Random wandering settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WanderSpec {
    pub means: Means,
    /// Exits never taken.
    pub restrain: Vec<String>,
    /// Keep wandering with nobody around.
    pub permanent: bool,
}

/// NPC definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NpcTemplate {
    pub name: String,
    pub max_hp: u32,
    pub evasion: i32,
    /// Share of a turn spent attacking.
    pub attack_use: u32,
    /// Flee below this hit point percentage.
    pub wimpy: u32,
    pub skills: Vec<(SkillId, u32)>,
    /// Unarmed attacks.
    pub attacks: Vec<Attack>,
    /// Natural hit locations.
    pub hitlocs: Vec<HitLocation>,
    pub hooks: StandardHooks,
    pub acts: Option<PoolSpec>,
    pub chats: Option<PoolSpec>,
    pub combat_acts: Option<PoolSpec>,
    pub combat_chats: Option<PoolSpec>,
    pub wander: Option<WanderSpec>,
    pub aggression: Option<Aggression>,
    pub asks: Option<AskResponder>,
}

impl Default for NpcTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            max_hp: 1,
            evasion: 0,
            attack_use: 100,
            wimpy: 0,
            skills: Vec::new(),
            attacks: Vec::new(),
            hitlocs: Vec::new(),
            hooks: StandardHooks::default(),
            acts: None,
            chats: None,
            combat_acts: None,
            combat_chats: None,
            wander: None,
            aggression: None,
            asks: None,
        }
    }
}

impl NpcTemplate {
    pub fn new(name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            name: name.into(),
            max_hp,
            ..Self::default()
        }
    }

    /// Builds a fresh registry from the template's descriptors.
    ///
    /// Attack and hit-location ids must be unique within the template.
    pub fn registry(&self) -> Result<CombatRegistry, RegistryError> {
        let mut registry = CombatRegistry::new();
        for attack in &self.attacks {
            if registry.query_attack(attack.id).is_some() {
                return Err(RegistryError::DuplicateAttack(attack.id));
            }
            registry.add_attack(attack.clone())?;
        }
        for hitloc in &self.hitlocs {
            if registry.query_hitloc(hitloc.id).is_some() {
                return Err(RegistryError::DuplicateHitloc(hitloc.id));
            }
            registry.add_hitloc(hitloc.clone())?;
        }
        Ok(registry)
    }

    /// Creates the brain and combatant of a new NPC.
    ///
    /// The brain is not booted; the host boots it once the NPC is placed.
    pub fn spawn(&self, id: EntityId) -> Result<(Brain, Combatant), RegistryError> {
        let mut combatant = Combatant::new(id, self.name.as_str(), self.max_hp)
            .with_context(CombatContext::new(self.registry()?, self.attack_use))
            .with_hooks(Arc::new(self.hooks.clone()));
        combatant.evasion = self.evasion;
        combatant.wimpy = self.wimpy;
        combatant.skills = self.skills.iter().copied().collect();

        let mut brain = Brain::new(id);
        let pools = [
            (BehaviorKind::IdleAct, &self.acts),
            (BehaviorKind::IdleChat, &self.chats),
            (BehaviorKind::CombatAct, &self.combat_acts),
            (BehaviorKind::CombatChat, &self.combat_chats),
        ];
        for (kind, spec) in pools {
            if let Some(spec) = spec {
                brain
                    .behaviors
                    .insert(Box::new(Chatter::from_lines(kind, spec.lines.as_slice(), spec.means)));
            }
        }
        if let Some(spec) = &self.wander {
            let wander = Wander::new(spec.means)
                .restrain(spec.restrain.iter().cloned())
                .permanent(spec.permanent);
            brain.behaviors.insert(Box::new(wander));
        }
        brain.aggression = self.aggression.clone();
        brain.asks = self.asks.clone();

        Ok((brain, combatant))
    }
}

/// Source of NPC templates by key, e.g. `"goblin"`.
pub trait NpcOracle: Send + Sync {
    fn template(&self, key: &str) -> Option<NpcTemplate>;

    fn keys(&self) -> Vec<String> {
        Vec::new()
    }
}
