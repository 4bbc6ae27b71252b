//! One attacker-against-defender exchange.

use crate::config::CombatParams;
use crate::env::{Message, RngOracle, WorldView};

use super::context::Combatant;
use super::damage::{apply_damage, hurt_percent, roll_penetration};
use super::hit::{hit_chance, pick_weighted};
use super::hooks::{Blow, HookFault, HookPoint};
use super::narration::{narrate_hit, narrate_miss};
use super::phase::PhaseError;
use super::registry::Attack;
use super::result::{Exchange, ExchangeOutcome, HitReport};

/// Collaborators needed to resolve an exchange.
pub struct ExchangeEnv<'a> {
    pub view: &'a dyn WorldView,
    pub rng: &'a mut dyn RngOracle,
    pub params: &'a CombatParams,
}

/// Resolves one exchange of `attacker` against `defender`.
///
/// 1. Pick an attack weighted by use; the share of the turn not covered by
///    any attack is no attack at all.
/// 2. Let the attack veto itself, then roll to hit.
/// 3. Pick a hit location weighted by hit percentage and roll penetration
///    against its worn armor.
/// 4. Run the defender's `got_hit` and the attacker's `did_hit` hooks.
/// 5. Kill the defender when its hit points reach zero.
///
/// Presence of both parties is checked before every callback; if either is
/// dead or gone the rest of the exchange is dropped. Hook faults fall back
/// to default behavior and are reported in [`Exchange::faults`].
///
/// # Errors
///
/// [`PhaseError`] when the attacker is not engaged.
pub fn resolve_exchange(
    attacker: &mut Combatant,
    defender: &mut Combatant,
    env: &mut ExchangeEnv<'_>,
) -> Result<Exchange, PhaseError> {
    let mut exchange = Exchange::new(attacker.id, defender.id);
    if !present(attacker, defender, env.view) {
        return Ok(exchange);
    }

    attacker.phase_mut().begin_exchange()?;
    exchange.outcome = strike(attacker, defender, env, &mut exchange);
    attacker.phase_mut().end_exchange();
    Ok(exchange)
}

fn present(attacker: &Combatant, defender: &Combatant, view: &dyn WorldView) -> bool {
    !attacker.is_dead() && !defender.is_dead() && view.is_near(attacker.id, defender.id)
}

fn strike(
    attacker: &Combatant,
    defender: &mut Combatant,
    env: &mut ExchangeEnv<'_>,
    exchange: &mut Exchange,
) -> ExchangeOutcome {
    let weights = attacker.context.attack_weights();
    let Some(index) = pick_weighted(weights.clone().map(|(_, weight)| weight), 100, env.rng) else {
        return ExchangeOutcome::NoAttack;
    };
    let Some((attack, _)) = weights.clone().nth(index) else {
        return ExchangeOutcome::NoAttack;
    };

    let hooks = attacker.hooks();
    let permitted = match hooks.try_hit(attack, env.rng) {
        Ok(permitted) => permitted,
        Err(fault) => {
            exchange.faults.push(HookFault {
                owner: attacker.id,
                point: HookPoint::TryHit,
                fault,
            });
            true
        }
    };
    if !permitted {
        exchange.messages = narrate_miss(attacker.id, &attacker.name, defender.id, &defender.name);
        return ExchangeOutcome::Vetoed(attack.id);
    }

    let to_hit = attack.to_hit.saturating_add(attacker.skill_bonus(attack, env.params));
    let chance = hit_chance(to_hit, defender.evasion, env.params);
    if env.rng.below(100) >= chance {
        exchange.messages = narrate_miss(attacker.id, &attacker.name, defender.id, &defender.name);
        return ExchangeOutcome::Missed(attack.id);
    }

    let Some(report) = wound(attacker, attack, defender, env) else {
        exchange.messages = narrate_miss(attacker.id, &attacker.name, defender.id, &defender.name);
        return ExchangeOutcome::Missed(attack.id);
    };

    if !present(attacker, defender, env.view) {
        return ExchangeOutcome::Abandoned;
    }
    let defender_hooks = defender.hooks();
    if let Err(fault) = defender_hooks.got_hit(&mut defender.context.registry, &report) {
        exchange.faults.push(HookFault {
            owner: defender.id,
            point: HookPoint::GotHit,
            fault,
        });
    }

    if !present(attacker, defender, env.view) {
        return ExchangeOutcome::Abandoned;
    }
    let messages = narrate(attacker, attack, defender, &report, exchange);
    exchange.messages = messages;

    if defender.vitals.hp == 0 {
        exchange.death = defender.die(Some(attacker.id));
    }
    ExchangeOutcome::Hit(report)
}

/// Applies a landed attack to a weighted hit location.
fn wound(
    attacker: &Combatant,
    attack: &Attack,
    defender: &mut Combatant,
    env: &mut ExchangeEnv<'_>,
) -> Option<HitReport> {
    let registry = &defender.context.registry;
    let locations: Vec<_> = registry.hitlocs().collect();
    let index = pick_weighted(locations.iter().map(|loc| loc.hit_pct), 0, env.rng)?;
    let location = locations[index];
    let armor = registry.effective_armor(location.id)?;
    let damage_type = armor.weakest(attack.kinds)?;

    let damage = roll_penetration(attack.penetration, armor.against(damage_type), env.rng);
    let hp_before = defender.vitals.hp;
    let report = HitReport {
        attacker: attacker.id,
        defender: defender.id,
        attack: attack.id,
        hitloc: location.id,
        location: location.desc.clone(),
        damage_type,
        damage,
        hurt_pct: hurt_percent(damage, hp_before),
        hp_left: apply_damage(hp_before, damage),
    };
    defender.vitals.hp = report.hp_left;
    Some(report)
}

fn narrate(
    attacker: &Combatant,
    attack: &Attack,
    defender: &Combatant,
    report: &HitReport,
    exchange: &mut Exchange,
) -> Vec<Message> {
    let hooks = attacker.hooks();
    let weapon = hooks.attack_desc(attack).unwrap_or_else(|fault| {
        exchange.faults.push(HookFault {
            owner: attacker.id,
            point: HookPoint::AttackDesc,
            fault,
        });
        attack.desc.clone()
    });
    let blow = Blow {
        report,
        attacker_name: &attacker.name,
        defender_name: &defender.name,
        weapon: &weapon,
    };
    match hooks.did_hit(&blow) {
        Ok(Some(custom)) => custom,
        Ok(None) => narrate_hit(&blow),
        Err(fault) => {
            exchange.faults.push(HookFault {
                owner: attacker.id,
                point: HookPoint::DidHit,
                fault,
            });
            narrate_hit(&blow)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::combat::{
        Armor, CombatHooks, CombatRegistry, DamageKinds, Fault, HitLocation, StandardHooks,
        penetration_chance,
    };
    use crate::env::{PcgRng, ScriptedRng};
    use crate::ids::{AttackId, EntityId, HitlocId, Tick};
    use crate::testing::FakeView;

    fn attack(to_hit: i32, penetration: u32, use_pct: u32) -> Attack {
        Attack {
            id: AttackId(1),
            to_hit,
            penetration,
            kinds: DamageKinds::all(),
            use_pct,
            skill: None,
            desc: "sword".into(),
        }
    }

    fn fighter(id: u32, name: &str, hp: u32, attacks: &[Attack], armor: u32) -> Combatant {
        let mut registry = CombatRegistry::new();
        for attack in attacks {
            registry.add_attack(attack.clone()).unwrap();
        }
        registry
            .add_hitloc(HitLocation {
                id: HitlocId(1),
                armor: Armor::uniform(armor),
                hit_pct: 100,
                desc: "body".into(),
            })
            .unwrap();
        let mut combatant = Combatant::new(EntityId(id), name, hp);
        combatant.context.registry = registry;
        combatant
    }

    fn duel(attacks: &[Attack], armor: u32, hp: u32) -> (Combatant, Combatant) {
        let mut x = fighter(1, "Xena", 100, attacks, 0);
        let mut y = fighter(2, "the yak", hp, &[], armor);
        x.engage(y.id, Tick(0)).unwrap();
        y.engage(x.id, Tick(0)).unwrap();
        (x, y)
    }

    fn exchange(x: &mut Combatant, y: &mut Combatant, view: &FakeView, rng: &mut dyn RngOracle) -> Exchange {
        let params = CombatParams::default();
        let mut env = ExchangeEnv {
            view,
            rng,
            params: &params,
        };
        resolve_exchange(x, y, &mut env).unwrap()
    }

    #[test]
    fn hit_rate_converges_to_formula() {
        let (mut x, mut y) = duel(&[attack(40, 20, 100)], 10, 10_000);
        let view = FakeView::default();
        let mut rng = PcgRng::seeded(0xB0B);
        let rounds = 10_000;

        let (mut landed, mut wounding) = (0u32, 0u32);
        for _ in 0..rounds {
            y.vitals.hp = y.vitals.max_hp;
            if let Some(report) = exchange(&mut x, &mut y, &view, &mut rng).outcome.hit() {
                landed += 1;
                if report.damage > 0 {
                    wounding += 1;
                }
            }
        }

        let predicted_hit = f64::from(hit_chance(40, 0, &CombatParams::default())) / 100.0;
        let predicted_wound = predicted_hit * penetration_chance(20, 10);
        let hit_rate = f64::from(landed) / f64::from(rounds);
        let wound_rate = f64::from(wounding) / f64::from(rounds);
        assert!((hit_rate - predicted_hit).abs() < 0.02, "hit rate {hit_rate} vs {predicted_hit}");
        assert!((wound_rate - predicted_wound).abs() < 0.02, "wound rate {wound_rate} vs {predicted_wound}");
    }

    #[test]
    fn attack_weights_decide_selection() {
        let (mut x, mut y) = duel(&[attack(0, 1, 0)], 0, 1000);
        let view = FakeView::default();
        let mut rng = PcgRng::seeded(5);
        for _ in 0..500 {
            assert_eq!(exchange(&mut x, &mut y, &view, &mut rng).outcome, ExchangeOutcome::NoAttack);
        }

        let (mut x, mut y) = duel(&[attack(0, 1, 100)], 0, 1000);
        for _ in 0..500 {
            let outcome = exchange(&mut x, &mut y, &view, &mut rng).outcome;
            assert_ne!(outcome, ExchangeOutcome::NoAttack);
        }
    }

    #[test]
    fn attack_use_scales_the_turn() {
        let (mut x, mut y) = duel(&[attack(0, 1, 100)], 0, 1000);
        x.context.attack_use = 50;
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([60]);
        assert_eq!(exchange(&mut x, &mut y, &view, &mut rng).outcome, ExchangeOutcome::NoAttack);
    }

    #[test]
    fn killing_blow_reports_death_once() {
        let (mut x, mut y) = duel(&[attack(90, 50, 100)], 0, 3);
        let view = FakeView::default();
        // attack, to-hit, hitloc, strike, block
        let mut rng = ScriptedRng::new([0, 0, 0, 40, 0]);

        let first = exchange(&mut x, &mut y, &view, &mut rng);
        let report = first.outcome.hit().unwrap();
        assert_eq!((report.damage, report.hurt_pct, report.hp_left), (40, 100, 0));
        assert_eq!(first.death.as_ref().map(|death| death.victim), Some(EntityId(2)));
        assert!(y.is_dead());

        let second = exchange(&mut x, &mut y, &view, &mut rng);
        assert_eq!(second.outcome, ExchangeOutcome::Abandoned);
        assert!(second.death.is_none());
        assert!(second.messages.is_empty());
    }

    #[test]
    fn departed_defender_abandons_exchange() {
        let (mut x, mut y) = duel(&[attack(90, 50, 100)], 0, 30);
        let view = FakeView {
            apart: true,
            ..FakeView::default()
        };
        let mut rng = PcgRng::seeded(1);
        let result = exchange(&mut x, &mut y, &view, &mut rng);
        assert_eq!(result.outcome, ExchangeOutcome::Abandoned);
        assert_eq!(y.vitals.hp, 30);
    }

    #[test]
    fn idle_attacker_is_rejected() {
        let (mut x, mut y) = duel(&[attack(0, 1, 100)], 0, 30);
        x.disengage().unwrap();
        let view = FakeView::default();
        let mut rng = PcgRng::seeded(1);
        let params = CombatParams::default();
        let mut env = ExchangeEnv {
            view: &view,
            rng: &mut rng,
            params: &params,
        };
        assert!(matches!(
            resolve_exchange(&mut x, &mut y, &mut env),
            Err(PhaseError::Invalid { .. })
        ));
    }

    #[test]
    fn unreliable_attack_is_vetoed() {
        let (x, mut y) = duel(&[attack(90, 5, 100)], 0, 30);
        let mut x = x.with_hooks(Arc::new(StandardHooks {
            armor_wear: 0,
            unreliable: vec![(AttackId(1), 0)],
        }));
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([0]);
        let result = exchange(&mut x, &mut y, &view, &mut rng);
        assert_eq!(result.outcome, ExchangeOutcome::Vetoed(AttackId(1)));
        assert_eq!(result.messages[0].text, "You miss the yak.");
    }

    struct Broken;

    impl CombatHooks for Broken {
        fn did_hit(&self, _blow: &Blow<'_>) -> Result<Option<Vec<Message>>, Fault> {
            Err(Fault::new("narrator crashed"))
        }

        fn attack_desc(&self, _attack: &Attack) -> Result<String, Fault> {
            Err(Fault::new("no description"))
        }
    }

    struct Silent;

    impl CombatHooks for Silent {
        fn did_hit(&self, blow: &Blow<'_>) -> Result<Option<Vec<Message>>, Fault> {
            Ok(Some(vec![Message::to(blow.report.attacker, "Chomp.")]))
        }
    }

    #[test]
    fn faulting_hooks_fall_back_to_default_narration() {
        let (x, mut y) = duel(&[attack(90, 50, 100)], 0, 1000);
        let mut x = x.with_hooks(Arc::new(Broken));
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([0, 0, 0, 10, 0]);

        let result = exchange(&mut x, &mut y, &view, &mut rng);
        assert!(result.outcome.hit().is_some());
        let points: Vec<_> = result.faults.iter().map(|fault| fault.point).collect();
        assert_eq!(points, [HookPoint::AttackDesc, HookPoint::DidHit]);
        assert_eq!(result.messages.len(), 3);
        assert_eq!(result.messages[0].text, "You tickle the yak in the body with your sword.");
    }

    #[test]
    fn custom_narration_replaces_default() {
        let (x, mut y) = duel(&[attack(90, 50, 100)], 0, 1000);
        let mut x = x.with_hooks(Arc::new(Silent));
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([0, 0, 0, 10, 0]);

        let result = exchange(&mut x, &mut y, &view, &mut rng);
        assert_eq!(result.messages, vec![Message::to(EntityId(1), "Chomp.")]);
        assert!(result.faults.is_empty());
    }
}
