use crate::env::{AttackRefusal, RngOracle, WorldView};
use crate::ids::EntityId;
use crate::sequence::Instruction;

/// Command issued before the attack, gated by its own chance roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreAction {
    pub chance: u32,
    pub command: String,
}

/// How an entity reacts to a potential target appearing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Aggression {
    /// Percent chance to attack a newly met target.
    pub chance: u32,
    /// Percent chance to ignore fear for the fight once triggered.
    pub brave_chance: u32,
    pub pre_actions: Vec<PreAction>,
    /// Verb issuing the attack itself.
    pub attack_verb: String,
}

impl Default for Aggression {
    fn default() -> Self {
        Self {
            chance: 0,
            brave_chance: 0,
            pre_actions: Vec::new(),
            attack_verb: "kill".to_owned(),
        }
    }
}

/// Attack decided on by [`Aggression::consider`].
#[derive(Clone, Debug, PartialEq)]
pub struct AggressionPlan {
    pub target: EntityId,
    /// Fear and flee checks are suppressed for this fight.
    pub brave: bool,
    /// Pre-attack commands followed by the attack command.
    pub instructions: Vec<Instruction>,
}

impl Aggression {
    pub fn new(chance: u32) -> Self {
        Self {
            chance,
            ..Self::default()
        }
    }

    /// Rolls whether `owner` attacks `target`.
    ///
    /// `Ok(None)` when the roll fails. The attack is checked with the host
    /// before any command is produced, so a refused attack yields the refusal
    /// and no instructions at all.
    pub fn consider(
        &self,
        owner: EntityId,
        target: EntityId,
        view: &dyn WorldView,
        rng: &mut dyn RngOracle,
    ) -> Result<Option<AggressionPlan>, AttackRefusal> {
        if !rng.chance(self.chance) {
            return Ok(None);
        }
        view.may_attack(owner, target)?;

        let brave = self.brave_chance > 0 && rng.chance(self.brave_chance);
        let mut instructions: Vec<Instruction> = self
            .pre_actions
            .iter()
            .filter(|action| rng.chance(action.chance))
            .map(|action| Instruction::command(action.command.as_str()))
            .collect();
        instructions.push(Instruction::command(format!("{} {target}", self.attack_verb)));

        Ok(Some(AggressionPlan {
            target,
            brave,
            instructions,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::testing::FakeView;

    fn aggressive() -> Aggression {
        Aggression {
            chance: 50,
            brave_chance: 30,
            pre_actions: vec![
                PreAction {
                    chance: 100,
                    command: "emote growls.".into(),
                },
                PreAction {
                    chance: 0,
                    command: "emote bares its teeth.".into(),
                },
            ],
            attack_verb: "kill".into(),
        }
    }

    #[test]
    fn failed_roll_means_no_plan() {
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([75]);
        assert_eq!(aggressive().consider(EntityId(1), EntityId(2), &view, &mut rng), Ok(None));
    }

    #[test]
    fn triggered_plan_runs_gated_pre_actions_then_attacks() {
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([10, 20, 0, 0]);
        let plan = aggressive()
            .consider(EntityId(1), EntityId(2), &view, &mut rng)
            .unwrap()
            .unwrap();

        assert!(plan.brave);
        assert_eq!(
            plan.instructions,
            vec![Instruction::command("emote growls."), Instruction::command("kill #2")]
        );
    }

    #[test]
    fn refused_attack_aborts_before_any_command() {
        let mut view = FakeView::default();
        view.refusal = Some(AttackRefusal::Peaceful);
        let mut rng = ScriptedRng::new([0]);
        assert_eq!(
            aggressive().consider(EntityId(1), EntityId(2), &view, &mut rng),
            Err(AttackRefusal::Peaceful)
        );
    }
}
