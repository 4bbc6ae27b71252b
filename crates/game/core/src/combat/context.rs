//! Combatants and the per-fight context they carry.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::CombatParams;
use crate::ids::{EntityId, SkillId, Tick};

use super::hooks::{CombatHooks, StandardHooks};
use super::phase::{CombatPhase, PhaseError};
use super::registry::{Attack, CombatRegistry};
use super::result::DeathReport;

/// Hit points of a combatant.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    pub hp: u32,
    pub max_hp: u32,
}

impl Vitals {
    pub const fn full(max_hp: u32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    pub fn percent(&self) -> u32 {
        let pct = u64::from(self.hp) * 100 / u64::from(self.max_hp.max(1));
        pct.min(100) as u32
    }
}

/// Opponents of an ongoing fight.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Encounter {
    pub since: Tick,
    enemies: Vec<EntityId>,
}

impl Encounter {
    pub fn enemies(&self) -> &[EntityId] {
        &self.enemies
    }
}

/// Registries and fight state of one combatant.
///
/// The registry lives as long as the combatant; the encounter exists only
/// between engagement and disengagement.
#[derive(Clone, Debug)]
pub struct CombatContext {
    pub registry: CombatRegistry,
    /// Share of a turn spent attacking, 0..=100. Scales every attack's use.
    pub attack_use: u32,
    encounter: Option<Encounter>,
}

impl Default for CombatContext {
    fn default() -> Self {
        Self {
            registry: CombatRegistry::new(),
            attack_use: 100,
            encounter: None,
        }
    }
}

impl CombatContext {
    pub fn new(registry: CombatRegistry, attack_use: u32) -> Self {
        Self {
            registry,
            attack_use: attack_use.min(100),
            encounter: None,
        }
    }

    pub fn encounter(&self) -> Option<&Encounter> {
        self.encounter.as_ref()
    }

    /// Use weights of the effective attacks after the attack-use budget.
    pub fn attack_weights(&self) -> impl Iterator<Item = (&Attack, u32)> + Clone + '_ {
        let budget = self.attack_use.min(100);
        self.registry
            .attacks()
            .map(move |attack| (attack, attack.use_pct * budget / 100))
    }
}

/// A living as seen by the combat engine.
#[derive(Clone)]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub vitals: Vitals,
    pub evasion: i32,
    /// Flee below this hit point percentage.
    pub wimpy: u32,
    pub skills: BTreeMap<SkillId, u32>,
    pub context: CombatContext,
    hooks: Arc<dyn CombatHooks>,
    phase: CombatPhase,
}

impl Combatant {
    pub fn new(id: EntityId, name: impl Into<String>, max_hp: u32) -> Self {
        Self {
            id,
            name: name.into(),
            vitals: Vitals::full(max_hp),
            evasion: 0,
            wimpy: 0,
            skills: BTreeMap::new(),
            context: CombatContext::default(),
            hooks: Arc::new(StandardHooks::default()),
            phase: CombatPhase::Idle,
        }
    }

    pub fn with_hooks(mut self, hooks: Arc<dyn CombatHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn with_context(mut self, context: CombatContext) -> Self {
        self.context = context;
        self
    }

    pub fn hooks(&self) -> Arc<dyn CombatHooks> {
        Arc::clone(&self.hooks)
    }

    pub fn phase(&self) -> CombatPhase {
        self.phase
    }

    pub(crate) fn phase_mut(&mut self) -> &mut CombatPhase {
        &mut self.phase
    }

    pub fn is_dead(&self) -> bool {
        self.phase.is_dead()
    }

    pub fn is_fighting(&self) -> bool {
        self.phase.is_fighting()
    }

    pub fn enemies(&self) -> &[EntityId] {
        self.context
            .encounter
            .as_ref()
            .map_or(&[][..], |encounter| encounter.enemies())
    }

    /// Adds `enemy` to the fight, starting one if needed. Returns true when
    /// the combatant was not fighting before.
    pub fn engage(&mut self, enemy: EntityId, now: Tick) -> Result<bool, PhaseError> {
        let fresh = self.phase.engage()?;
        let encounter = self.context.encounter.get_or_insert_with(|| Encounter {
            since: now,
            enemies: Vec::new(),
        });
        if !encounter.enemies.contains(&enemy) {
            encounter.enemies.push(enemy);
        }
        Ok(fresh)
    }

    /// Drops `enemy`. Returns true while other enemies remain.
    pub fn forget(&mut self, enemy: EntityId) -> bool {
        match self.context.encounter.as_mut() {
            Some(encounter) => {
                encounter.enemies.retain(|&id| id != enemy);
                !encounter.enemies.is_empty()
            }
            None => false,
        }
    }

    /// Ends the fight and discards the encounter.
    pub fn disengage(&mut self) -> Result<bool, PhaseError> {
        let left = self.phase.disengage()?;
        self.context.encounter = None;
        Ok(left)
    }

    /// Death transition. Only the first call yields a report.
    pub fn die(&mut self, killer: Option<EntityId>) -> Option<DeathReport> {
        if !self.phase.die() {
            return None;
        }
        self.vitals.hp = 0;
        self.context.encounter = None;
        Some(DeathReport {
            victim: self.id,
            victim_name: self.name.clone(),
            killer,
        })
    }

    /// Health has fallen below the wimpy threshold.
    pub fn should_flee(&self) -> bool {
        !self.is_dead() && self.vitals.percent() < self.wimpy
    }

    /// To-hit bonus from the skill an attack trains.
    pub fn skill_bonus(&self, attack: &Attack, params: &CombatParams) -> i32 {
        let level = attack
            .skill
            .and_then(|skill| self.skills.get(&skill))
            .copied()
            .unwrap_or(0);
        i32::try_from(level / params.skill_divisor.max(1)).unwrap_or(i32::MAX)
    }
}

impl core::fmt::Debug for Combatant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Combatant")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("vitals", &self.vitals)
            .field("phase", &self.phase)
            .field("enemies", &self.enemies())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::DamageKinds;
    use crate::ids::AttackId;

    #[test]
    fn death_reports_once() {
        let mut orc = Combatant::new(EntityId(3), "orc", 20);
        orc.engage(EntityId(1), Tick(5)).unwrap();

        let first = orc.die(Some(EntityId(1)));
        let second = orc.die(Some(EntityId(1)));
        assert_eq!(
            first,
            Some(DeathReport {
                victim: EntityId(3),
                victim_name: "orc".into(),
                killer: Some(EntityId(1)),
            })
        );
        assert_eq!(second, None);
        assert!(orc.enemies().is_empty());
        assert_eq!(orc.engage(EntityId(1), Tick(6)), Err(PhaseError::Dead));
    }

    #[test]
    fn encounter_tracks_enemies() {
        let mut orc = Combatant::new(EntityId(3), "orc", 20);
        assert_eq!(orc.engage(EntityId(1), Tick(0)), Ok(true));
        assert_eq!(orc.engage(EntityId(2), Tick(1)), Ok(false));
        assert_eq!(orc.engage(EntityId(2), Tick(1)), Ok(false));
        assert_eq!(orc.enemies(), [EntityId(1), EntityId(2)]);
        assert!(orc.forget(EntityId(1)));
        assert!(!orc.forget(EntityId(2)));
        assert_eq!(orc.disengage(), Ok(true));
        assert!(orc.context.encounter().is_none());
    }

    #[test]
    fn wimpy_and_skill_bonus() {
        let mut orc = Combatant::new(EntityId(3), "orc", 40);
        orc.wimpy = 25;
        orc.vitals.hp = 10;
        assert!(!orc.should_flee());
        orc.vitals.hp = 9;
        assert!(orc.should_flee());

        orc.skills.insert(SkillId(7), 18);
        let club = Attack {
            id: AttackId(1),
            to_hit: 0,
            penetration: 1,
            kinds: DamageKinds::BLUDGEON,
            use_pct: 100,
            skill: Some(SkillId(7)),
            desc: "club".into(),
        };
        assert_eq!(orc.skill_bonus(&club, &CombatParams::default()), 4);
    }
}
