//! Damage types, armor vectors, and penetration.

use bitflags::bitflags;
use strum::{Display, EnumCount, EnumIter, IntoEnumIterator};

use crate::env::RngOracle;

/// Physical damage type an attack strikes with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumCount, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DamageType {
    /// Piercing: spears, arrows, teeth.
    Impale,
    /// Cutting edges.
    Slash,
    /// Blunt force.
    Bludgeon,
}

impl DamageType {
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn kind(self) -> DamageKinds {
        match self {
            DamageType::Impale => DamageKinds::IMPALE,
            DamageType::Slash => DamageKinds::SLASH,
            DamageType::Bludgeon => DamageKinds::BLUDGEON,
        }
    }
}

bitflags! {
    /// Set of damage types an attack may strike with.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct DamageKinds: u8 {
        const IMPALE = 1 << 0;
        const SLASH = 1 << 1;
        const BLUDGEON = 1 << 2;
    }
}

impl DamageKinds {
    /// Damage types in the set, in declaration order.
    pub fn types(self) -> impl Iterator<Item = DamageType> {
        DamageType::iter().filter(move |ty| self.contains(ty.kind()))
    }
}

impl From<DamageType> for DamageKinds {
    fn from(ty: DamageType) -> Self {
        ty.kind()
    }
}

/// Armor class per damage type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Armor(pub [u32; DamageType::COUNT]);

impl Armor {
    pub const fn uniform(value: u32) -> Self {
        Self([value; DamageType::COUNT])
    }

    pub const fn against(&self, ty: DamageType) -> u32 {
        self.0[ty.index()]
    }

    pub fn add(&mut self, ty: DamageType, amount: u32) {
        let slot = &mut self.0[ty.index()];
        *slot = slot.saturating_add(amount);
    }

    /// Armor left after `wear` has been subtracted, floored at zero.
    pub fn worn_by(&self, wear: &Armor) -> Armor {
        let mut out = *self;
        for (value, worn) in out.0.iter_mut().zip(wear.0) {
            *value = value.saturating_sub(worn);
        }
        out
    }

    /// Type from `kinds` this armor is weakest against. Ties go to the
    /// earlier declared type.
    pub fn weakest(&self, kinds: DamageKinds) -> Option<DamageType> {
        kinds.types().min_by_key(|&ty| self.against(ty))
    }
}

/// Rolls damage of an attack with penetration `pen` against armor `ac`.
///
/// # Formula
///
/// ```text
/// damage = max(0, roll[0, pen] - roll[0, ac])
/// ```
pub fn roll_penetration(pen: u32, ac: u32, rng: &mut dyn RngOracle) -> u32 {
    let strike = rng.below(pen.saturating_add(1));
    let block = rng.below(ac.saturating_add(1));
    strike.saturating_sub(block)
}

/// Share of the defender's current hit points a blow took, capped at 100.
pub fn hurt_percent(damage: u32, hp_before: u32) -> u32 {
    let pct = u64::from(damage) * 100 / u64::from(hp_before.max(1));
    pct.min(100) as u32
}

/// Apply damage to current HP, clamped to 0.
pub fn apply_damage(current_hp: u32, damage: u32) -> u32 {
    current_hp.saturating_sub(damage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;

    #[test]
    fn attack_uses_weakest_type() {
        let armor = Armor([8, 3, 5]);
        assert_eq!(armor.weakest(DamageKinds::all()), Some(DamageType::Slash));
        assert_eq!(
            armor.weakest(DamageKinds::IMPALE | DamageKinds::BLUDGEON),
            Some(DamageType::Bludgeon)
        );
        assert_eq!(armor.weakest(DamageKinds::empty()), None);
    }

    #[test]
    fn wear_floors_at_zero() {
        let worn = Armor([4, 4, 4]).worn_by(&Armor([1, 6, 0]));
        assert_eq!(worn, Armor([3, 0, 4]));
    }

    #[test]
    fn penetration_never_negative() {
        let mut rng = ScriptedRng::new([2, 9]);
        assert_eq!(roll_penetration(5, 10, &mut rng), 0);
        let mut rng = ScriptedRng::new([9, 2]);
        assert_eq!(roll_penetration(10, 5, &mut rng), 7);
    }

    #[test]
    fn hurt_percent_is_capped() {
        assert_eq!(hurt_percent(5, 20), 25);
        assert_eq!(hurt_percent(50, 20), 100);
        assert_eq!(hurt_percent(3, 0), 100);
        assert_eq!(hurt_percent(0, 20), 0);
    }
}
