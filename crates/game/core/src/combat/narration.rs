//! Default combat narration.

use crate::env::Message;
use crate::ids::EntityId;

use super::hooks::Blow;

/// How badly a blow hurt, keyed by hurt percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Degree {
    Unharmed,
    Tickled,
    Grazed,
    Hurt,
    HurtBadly,
    Smashed,
    Massacred,
}

impl Degree {
    pub const fn from_hurt(pct: u32) -> Self {
        match pct {
            0 => Degree::Unharmed,
            1..=5 => Degree::Tickled,
            6..=10 => Degree::Grazed,
            11..=20 => Degree::Hurt,
            21..=40 => Degree::HurtBadly,
            41..=70 => Degree::Smashed,
            _ => Degree::Massacred,
        }
    }

    /// Verb in second and third person.
    const fn verbs(self) -> (&'static str, &'static str) {
        match self {
            Degree::Unharmed => ("fail to harm", "fails to harm"),
            Degree::Tickled => ("tickle", "tickles"),
            Degree::Grazed => ("graze", "grazes"),
            Degree::Hurt => ("hurt", "hurts"),
            Degree::HurtBadly => ("badly hurt", "badly hurts"),
            Degree::Smashed => ("smash", "smashes"),
            Degree::Massacred => ("massacre", "massacres"),
        }
    }
}

/// Attacker, defender, and onlookers versions of a landed blow.
pub fn narrate_hit(blow: &Blow<'_>) -> Vec<Message> {
    let report = blow.report;
    let (you, they) = Degree::from_hurt(report.hurt_pct).verbs();
    let attacker = capitalize(blow.attacker_name);
    vec![
        Message::to(
            report.attacker,
            format!(
                "You {you} {} in the {} with your {}.",
                blow.defender_name, report.location, blow.weapon
            ),
        ),
        Message::to(
            report.defender,
            format!("{attacker} {they} you in the {} with its {}.", report.location, blow.weapon),
        ),
        Message::room(
            report.attacker,
            vec![report.attacker, report.defender],
            format!(
                "{attacker} {they} {} in the {}.",
                blow.defender_name, report.location
            ),
        ),
    ]
}

/// Narration of an attack that did not land.
pub fn narrate_miss(
    attacker: EntityId,
    attacker_name: &str,
    defender: EntityId,
    defender_name: &str,
) -> Vec<Message> {
    let name = capitalize(attacker_name);
    vec![
        Message::to(attacker, format!("You miss {defender_name}.")),
        Message::to(defender, format!("{name} misses you.")),
        Message::room(
            attacker,
            vec![attacker, defender],
            format!("{name} misses {defender_name}."),
        ),
    ]
}

/// Upper-cases the first letter of a name for sentence starts.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
