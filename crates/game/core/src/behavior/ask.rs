use crate::config::CoreConfig;
use crate::env::{RngOracle, WorldView};
use crate::ids::EntityId;
use crate::sequence::{Instruction, Resolved};

/// A set of trigger phrases and the reply they produce.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AskEntry {
    pub triggers: Vec<String>,
    pub answer: String,
}

impl AskEntry {
    pub fn new<S: AsRef<str>>(triggers: &[S], answer: impl Into<String>) -> Self {
        Self {
            triggers: triggers
                .iter()
                .map(|trigger| trigger.as_ref().to_lowercase())
                .collect(),
            answer: answer.into(),
        }
    }

    fn matches(&self, question: &str) -> bool {
        self.triggers
            .iter()
            .any(|trigger| contains_phrase(question, &trigger.to_lowercase()))
    }
}

/// Answers questions put to its owner.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AskResponder {
    pub entries: Vec<AskEntry>,
    /// Reply used when no entry matches.
    pub default_answer: Option<String>,
    /// Answer even if the asker has gone out of earshot.
    pub answer_anyway: bool,
    /// Only answer askers the owner can see.
    pub require_visibility: bool,
    /// Command run instead of an answer when the asker cannot be seen.
    pub unseen: Option<String>,
}

impl AskResponder {
    pub fn new(entries: Vec<AskEntry>) -> Self {
        Self {
            entries,
            ..Self::default()
        }
    }

    pub fn with_default(mut self, answer: impl Into<String>) -> Self {
        self.default_answer = Some(answer.into());
        self
    }

    /// Reply text for a question, after normalisation.
    pub fn reply_for(&self, question: &str) -> Option<&str> {
        let question = normalise(question);
        self.entries
            .iter()
            .find(|entry| entry.matches(&question))
            .map(|entry| entry.answer.as_str())
            .or(self.default_answer.as_deref())
    }

    /// Builds the tape answering `question` from `asker`.
    ///
    /// The reply is spoken after a random delay within the configured window
    /// and dropped at that point if the asker can no longer be heard. Returns
    /// `None` when there is nothing to say.
    pub fn respond(
        &self,
        owner: EntityId,
        asker: EntityId,
        question: &str,
        view: &dyn WorldView,
        rng: &mut dyn RngOracle,
        config: &CoreConfig,
    ) -> Option<Vec<Instruction>> {
        if self.require_visibility && !view.can_see(owner, asker) {
            return self
                .unseen
                .as_ref()
                .map(|command| vec![Instruction::command(command.as_str())]);
        }

        let reply = format!("say {}", self.reply_for(question)?);
        let min = u32::try_from(config.answer_delay_min).unwrap_or(u32::MAX);
        let max = u32::try_from(config.answer_delay_max).unwrap_or(u32::MAX);
        let delay = i64::from(rng.range(min, max));

        let anyway = self.answer_anyway;
        let deliver = Instruction::resolvable(move |ctx| {
            if anyway || ctx.view.can_hear(ctx.owner, asker) {
                Resolved::Command(reply.clone())
            } else {
                Resolved::Nothing
            }
        });
        Some(vec![Instruction::Delay(delay), deliver])
    }
}

/// Lower-cases and strips trailing sentence punctuation.
fn normalise(question: &str) -> String {
    question
        .trim()
        .trim_end_matches(['.', '?', '!'])
        .trim_end()
        .to_lowercase()
}

/// True when `phrase` occurs in `text` delimited by word boundaries.
fn contains_phrase(text: &str, phrase: &str) -> bool {
    if phrase.is_empty() {
        return false;
    }
    let is_word = |c: char| c.is_alphanumeric() || c == '\'';
    text.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before = text[..start].chars().next_back();
        let after = text[end..].chars().next();
        !before.is_some_and(is_word) && !after.is_some_and(is_word)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ScriptedRng;
    use crate::sequence::ResolveContext;
    use crate::testing::FakeView;

    const OWNER: EntityId = EntityId(1);
    const ASKER: EntityId = EntityId(2);

    fn responder() -> AskResponder {
        AskResponder::new(vec![AskEntry::new(&["name", "who are you"], "I am Grimble.")])
            .with_default("I don't know")
    }

    fn resolve(tape: &[Instruction], view: &FakeView) -> Resolved {
        let Some(Instruction::Resolvable(closure)) = tape.last() else {
            panic!("answer closure expected, got {tape:?}");
        };
        closure(&ResolveContext { owner: OWNER, view })
    }

    #[test]
    fn configured_and_default_replies() {
        let asks = responder();
        assert_eq!(asks.reply_for("What is your name?"), Some("I am Grimble."));
        assert_eq!(asks.reply_for("  WHO ARE YOU?!"), Some("I am Grimble."));
        assert_eq!(asks.reply_for("What time is it?"), Some("I don't know"));
        assert_eq!(asks.reply_for("Is that a nameplate?"), Some("I don't know"));
    }

    #[test]
    fn no_default_means_silence() {
        let asks = AskResponder::new(vec![AskEntry::new(&["gold"], "No gold here.")]);
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([0]);
        let config = CoreConfig::new();
        assert!(asks.respond(OWNER, ASKER, "weather?", &view, &mut rng, &config).is_none());
    }

    #[test]
    fn answers_after_a_delay_in_the_window() {
        let asks = responder();
        let view = FakeView::default();
        let mut rng = ScriptedRng::new([1]);
        let config = CoreConfig::new();

        let tape = asks
            .respond(OWNER, ASKER, "What is your name?", &view, &mut rng, &config)
            .unwrap();
        assert_eq!(tape[0], Instruction::Delay(2));
        assert_eq!(resolve(&tape, &view), Resolved::Command("say I am Grimble.".into()));

        let tape = asks
            .respond(OWNER, ASKER, "What time is it?", &view, &mut rng, &config)
            .unwrap();
        assert_eq!(resolve(&tape, &view), Resolved::Command("say I don't know".into()));
    }

    #[test]
    fn answer_dropped_once_asker_is_out_of_earshot() {
        let mut asks = responder();
        let mut view = FakeView::default();
        let mut rng = ScriptedRng::new([0]);
        let config = CoreConfig::new();

        let tape = asks
            .respond(OWNER, ASKER, "name?", &view, &mut rng, &config)
            .unwrap();
        view.deaf = true;
        assert_eq!(resolve(&tape, &view), Resolved::Nothing);

        asks.answer_anyway = true;
        let tape = asks
            .respond(OWNER, ASKER, "name?", &view, &mut rng, &config)
            .unwrap();
        assert_eq!(resolve(&tape, &view), Resolved::Command("say I am Grimble.".into()));
    }

    #[test]
    fn unseen_asker_triggers_unseen_hook() {
        let mut asks = responder();
        asks.require_visibility = true;
        asks.unseen = Some("emote peers around suspiciously.".into());
        let mut view = FakeView::default();
        view.blind = true;
        let mut rng = ScriptedRng::new([0]);
        let config = CoreConfig::new();

        let tape = asks
            .respond(OWNER, ASKER, "name?", &view, &mut rng, &config)
            .unwrap();
        assert_eq!(tape, vec![Instruction::command("emote peers around suspiciously.")]);
    }
}
