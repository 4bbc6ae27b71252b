//! Identity and location of a living.
use mud_core::{EntityId, RoomId};

#[derive(Clone, Debug)]
pub struct Living {
    pub id: EntityId,
    pub name: String,
    pub room: RoomId,
    /// Driven by a connected player rather than a brain.
    pub interactive: bool,
    /// Killed but not yet removed.
    pub dead: bool,
    /// Template key this living was spawned from.
    pub template: Option<String>,
}

impl Living {
    pub fn npc(id: EntityId, name: impl Into<String>, room: RoomId, template: &str) -> Self {
        Self {
            id,
            name: name.into(),
            room,
            interactive: false,
            dead: false,
            template: Some(template.to_owned()),
        }
    }

    pub fn player(id: EntityId, name: impl Into<String>, room: RoomId) -> Self {
        Self {
            id,
            name: name.into(),
            room,
            interactive: true,
            dead: false,
            template: None,
        }
    }

    /// Whether `word` names this living: `#id`, its template key, or any word
    /// of its name, case-insensitively.
    pub fn answers_to(&self, word: &str) -> bool {
        let word = word.trim();
        if let Some(number) = word.strip_prefix('#') {
            return number.parse::<u32>().is_ok_and(|n| n == self.id.0);
        }
        let word = word.to_lowercase();
        self.template.as_deref() == Some(word.as_str())
            || self
                .name
                .split_whitespace()
                .any(|part| part.eq_ignore_ascii_case(&word))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_to_id_key_and_name_words() {
        let goblin = Living::npc(EntityId(3), "the goblin", RoomId(1), "goblin");
        assert!(goblin.answers_to("#3"));
        assert!(goblin.answers_to("Goblin"));
        assert!(!goblin.answers_to("#4"));
        assert!(!goblin.answers_to("gob"));

        let hero = Living::player(EntityId(1), "Aria", RoomId(1));
        assert!(hero.answers_to("aria"));
    }
}
