//! Command lines executed on behalf of livings.
//!
//! A line is a verb followed by its argument. Any exit name of the actor's
//! room works as a verb on its own, so `north` and `go north` are the same.
use std::str::FromStr;

use strum::{EnumString, IntoStaticStr};

use mud_core::EntityId;

use crate::error::{CommandError, Result};
use crate::world::World;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Verb {
    Go,
    Say,
    Emote,
    #[strum(to_string = "kill", serialize = "attack")]
    Kill,
    Stop,
    Flee,
    Ask,
}

impl Verb {
    fn name(self) -> &'static str {
        self.into()
    }
}

pub(crate) fn run(world: &mut World, actor: EntityId, line: &str) -> Result<()> {
    let line = line.trim();
    let (head, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(head, rest)| (head, rest.trim()));
    if head.is_empty() {
        return Err(CommandError::Empty.into());
    }
    let room = world
        .census()
        .room_of(actor)
        .ok_or(CommandError::ActorGone(actor))?;

    let is_exit = world
        .census()
        .room(room)
        .is_some_and(|room| room.exit(head).is_some());
    if is_exit && rest.is_empty() {
        return world.go(actor, head);
    }

    let verb = Verb::from_str(&head.to_lowercase())
        .map_err(|_| CommandError::UnknownVerb(head.to_owned()))?;
    match verb {
        Verb::Go => world.go(actor, argument(verb, rest, "a direction")?),
        Verb::Say => world.say(actor, argument(verb, rest, "something to say")?),
        Verb::Emote => world.emote(actor, argument(verb, rest, "an action")?),
        Verb::Kill => {
            let target = find(world, actor, argument(verb, rest, "a target")?)?;
            world.attack(actor, target)
        }
        Verb::Stop => world.stop(actor),
        Verb::Flee => world.flee(actor),
        Verb::Ask => {
            let (who, question) = argument(verb, rest, "someone to ask")?
                .split_once(" about ")
                .ok_or(CommandError::MissingArgument {
                    verb: verb.name(),
                    what: "a question",
                })?;
            let target = find(world, actor, who)?;
            world.ask(actor, target, question.trim())
        }
    }
}

fn argument<'a>(verb: Verb, rest: &'a str, what: &'static str) -> std::result::Result<&'a str, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            verb: verb.name(),
            what,
        });
    }
    Ok(rest)
}

fn find(world: &World, actor: EntityId, word: &str) -> std::result::Result<EntityId, CommandError> {
    world
        .census()
        .find_near(actor, word)
        .ok_or_else(|| CommandError::NoSuchTarget(word.to_owned()))
}
