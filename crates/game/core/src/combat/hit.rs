//! Hit chance, weighted selection, and penetration odds.

use crate::config::CombatParams;
use crate::env::RngOracle;

/// Calculate hit chance from the attack's to-hit class and the defender's evasion.
///
/// # Formula
///
/// ```text
/// hit_chance = base + (to_hit - evasion)
/// clamped to [min, max]
/// ```
///
/// # Returns
///
/// Hit chance as percentage
pub fn hit_chance(to_hit: i32, evasion: i32, params: &CombatParams) -> u32 {
    let clamp = params.hit_chance;
    let chance = clamp.base.saturating_add(to_hit).saturating_sub(evasion);
    chance.clamp(clamp.min as i32, clamp.max as i32) as u32
}

/// Check if an attack hits given a roll in `[0, 100)`.
pub fn check_hit(to_hit: i32, evasion: i32, roll: u32, params: &CombatParams) -> bool {
    roll < hit_chance(to_hit, evasion, params)
}

/// Exact probability that a penetration roll deals any damage.
///
/// # Formula
///
/// ```text
/// P(roll[0, pen] > roll[0, ac])
///   = Σ_{s=1..pen} min(s, ac + 1) / ((pen + 1)(ac + 1))
/// ```
pub fn penetration_chance(pen: u32, ac: u32) -> f64 {
    let strikes = u64::from(pen) + 1;
    let blocks = u64::from(ac) + 1;
    let winning: u64 = (1..strikes).map(|strike| strike.min(blocks)).sum();
    winning as f64 / (strikes * blocks) as f64
}

/// Picks an index with probability proportional to its weight.
///
/// The roll is drawn from `[0, max(floor, Σweights))`; rolls past the total
/// weight select nothing. Zero weights are never picked.
pub fn pick_weighted<I>(weights: I, floor: u32, rng: &mut dyn RngOracle) -> Option<usize>
where
    I: IntoIterator<Item = u32>,
    I::IntoIter: Clone,
{
    let weights = weights.into_iter();
    let total = weights
        .clone()
        .fold(0u32, |sum, weight| sum.saturating_add(weight));
    let span = total.max(floor);
    if span == 0 {
        return None;
    }
    let roll = rng.below(span);
    let mut cumulative = 0u32;
    for (index, weight) in weights.enumerate() {
        cumulative = cumulative.saturating_add(weight);
        if roll < cumulative {
            return Some(index);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    #[test]
    fn hit_chance_is_clamped() {
        let params = CombatParams::default();
        assert_eq!(hit_chance(40, 0, &params), 90);
        assert_eq!(hit_chance(90, 0, &params), 95);
        assert_eq!(hit_chance(-90, 10, &params), 5);
        assert!(check_hit(0, 0, 49, &params));
        assert!(!check_hit(0, 0, 50, &params));
    }

    #[test]
    fn penetration_chance_matches_enumeration() {
        for (pen, ac) in [(0, 0), (5, 0), (5, 5), (20, 10), (3, 12)] {
            let mut wins = 0u64;
            for strike in 0..=pen {
                for block in 0..=ac {
                    if strike > block {
                        wins += 1;
                    }
                }
            }
            let expected = wins as f64 / f64::from((pen + 1) * (ac + 1));
            assert!((penetration_chance(pen, ac) - expected).abs() < 1e-12, "pen {pen} ac {ac}");
        }
    }

    #[test]
    fn weighted_pick_honours_floor() {
        let mut rng = ScriptedRng::new([30, 75]);
        assert_eq!(pick_weighted([20, 40], 100, &mut rng), Some(1));
        assert_eq!(pick_weighted([20, 40], 100, &mut rng), None);
        assert_eq!(pick_weighted([0, 0], 0, &mut rng), None);
    }

    #[test]
    fn zero_weight_is_never_picked() {
        let mut rng = PcgRng::seeded(11);
        for _ in 0..1000 {
            assert_ne!(pick_weighted([0, 100], 100, &mut rng), Some(0));
        }
        for _ in 0..1000 {
            assert_eq!(pick_weighted([100], 100, &mut rng), Some(0));
        }
    }
}
