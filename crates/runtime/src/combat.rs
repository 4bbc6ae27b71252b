//! Combat rounds driven by repeating alarms.
//!
//! Every engaged living owns one repeating `CombatRound` alarm. A round
//! resolves one exchange against the first enemy still present; a living
//! with no enemy left in reach disengages. A mutual fight is simply two
//! livings each running their own rounds.
use tracing::{debug, warn};

use mud_core::env::keys;
use mud_core::{
    Alarm, EntityId, Exchange, ExchangeEnv, Messenger, PropValue, PropertyStore, RngOracle,
    TimerFacility, WorldView, resolve_exchange,
};

use crate::error::{CommandError, Result};
use crate::events::WorldEvent;
use crate::world::World;

impl World {
    /// Starts a fight. Both sides engage each other.
    pub fn attack(&mut self, attacker: EntityId, target: EntityId) -> Result<()> {
        self.census.may_attack(attacker, target).map_err(CommandError::from)?;

        self.engage_one(attacker, target)?;
        self.engage_one(target, attacker)?;

        let attacker_name = self.display_name(attacker);
        let target_name = self.display_name(target);
        let mut courier = self.courier();
        courier.tell(attacker, &format!("You attack {target_name}!"));
        courier.tell(target, &format!("{attacker_name} attacks you!"));
        courier.tell_room(
            attacker,
            &[attacker, target],
            &format!("{attacker_name} attacks {target_name}!"),
        );
        self.emit(WorldEvent::Engaged {
            attacker,
            defender: target,
        });
        Ok(())
    }

    /// Adds `enemy` to `id`'s fight, starting rounds and combat generators
    /// when the fight is new.
    fn engage_one(&mut self, id: EntityId, enemy: EntityId) -> Result<()> {
        let now = self.census.now();
        let fighter = self
            .fighters
            .get_mut(&id)
            .ok_or(CommandError::ActorGone(id))?;
        if !fighter.engage(enemy, now)? {
            return Ok(());
        }

        self.census
            .set_property(id, keys::FIGHTING, PropValue::Flag(true));
        let period = self.config.combat_round.max(1);
        let round = self
            .alarms
            .schedule(period, Some(period), Alarm::CombatRound(id));
        if let Some(stale) = self.rounds.insert(id, round) {
            self.alarms.cancel(stale);
        }
        if let Some(brain) = self.minds.get_mut(&id) {
            brain.engage(&mut self.alarms, &mut self.rng, &self.config.core)?;
        }
        debug!(target: "runtime::combat", id = %id, enemy = %enemy, "engaged");
        Ok(())
    }

    /// Ends `id`'s fight. Non-combat sequences keep running.
    pub fn disengage(&mut self, id: EntityId) {
        if let Some(fighter) = self.fighters.get_mut(&id) {
            // A dead combatant has nothing left to leave.
            let _ = fighter.disengage();
        }
        if let Some(round) = self.rounds.remove(&id) {
            self.alarms.cancel(round);
        }
        let dropped = self
            .minds
            .get_mut(&id)
            .map_or(0, |brain| brain.disengage());
        self.census.remove_property(id, keys::FIGHTING);
        self.census.remove_property(id, keys::FEAR_OVERRIDE);
        debug!(target: "runtime::combat", id = %id, dropped, "disengaged");
    }

    /// `stop` command.
    pub fn stop(&mut self, id: EntityId) -> Result<()> {
        if !self.census.has_flag(id, keys::FIGHTING) {
            return Err(CommandError::NotFighting.into());
        }
        self.disengage(id);
        self.courier().tell(id, "You stop fighting.");
        Ok(())
    }

    /// Runs through a random exit, leaving the fight behind.
    pub fn flee(&mut self, id: EntityId) -> Result<()> {
        if !self.census.has_flag(id, keys::FIGHTING) {
            return Err(CommandError::NotFighting.into());
        }
        let exits = self.census.exits(id);
        let count = u32::try_from(exits.len()).unwrap_or(u32::MAX);
        if count == 0 {
            return Err(CommandError::NowhereToFlee.into());
        }
        let index = usize::try_from(self.rng.below(count)).unwrap_or(0);
        let Some(exit) = exits.get(index) else {
            return Err(CommandError::NowhereToFlee.into());
        };

        let name = self.display_name(id);
        self.courier()
            .tell_room(id, &[id], &format!("{name} panics and flees {exit}!"));
        self.courier().tell(id, "You flee in panic!");
        self.disengage(id);
        self.go(id, exit)
    }

    /// First enemy of `id` that is still alive and within reach.
    fn current_target(&self, id: EntityId) -> Option<EntityId> {
        let fighter = self.fighters.get(&id)?;
        fighter.enemies().iter().copied().find(|&enemy| {
            self.census.is_near(id, enemy)
                && self.census.living(enemy).is_some_and(|living| !living.dead)
        })
    }

    /// One combat round of `id`.
    pub(crate) fn combat_round(&mut self, id: EntityId) {
        let Some(target) = self.current_target(id) else {
            self.disengage(id);
            return;
        };
        let Some(mut attacker) = self.fighters.remove(&id) else {
            return;
        };
        let resolved = self.fighters.get_mut(&target).map(|defender| {
            let mut env = ExchangeEnv {
                view: &self.census,
                rng: &mut self.rng,
                params: &self.config.combat,
            };
            resolve_exchange(&mut attacker, defender, &mut env)
        });
        self.fighters.insert(id, attacker);

        match resolved {
            Some(Ok(exchange)) => self.settle(exchange),
            Some(Err(err)) => {
                warn!(target: "runtime::combat", id = %id, error = %err, "exchange rejected");
            }
            None => self.disengage(id),
        }
    }

    /// Delivers what an exchange produced and reacts to it.
    fn settle(&mut self, exchange: Exchange) {
        for fault in &exchange.faults {
            warn!(
                target: "runtime::combat",
                owner = %fault.owner,
                point = %fault.point,
                error = %fault.fault,
                "combat hook failed, default used"
            );
        }
        let mut courier = self.courier();
        for message in &exchange.messages {
            courier.deliver(message);
        }

        if let Some(death) = exchange.death {
            let Some(room) = self.census.room_of(death.victim) else {
                return;
            };
            if let Some(victim) = self.census.living_mut(death.victim) {
                victim.dead = true;
            }
            debug!(target: "runtime::combat", victim = %death.victim, killer = ?death.killer, "killed");
            self.emit(WorldEvent::Died {
                victim: death.victim,
                victim_name: death.victim_name,
                killer: death.killer,
                room,
            });
            return;
        }

        if exchange.outcome.hit().is_some() {
            self.check_wimpy(exchange.defender);
        }
    }

    /// Flees when hit points fell below the wimpy threshold, unless fear is
    /// overridden for this fight.
    fn check_wimpy(&mut self, id: EntityId) {
        let wants_out = self
            .fighters
            .get(&id)
            .is_some_and(|fighter| fighter.should_flee());
        if !wants_out || self.census.has_flag(id, keys::FEAR_OVERRIDE) {
            return;
        }
        if let Err(err) = self.flee(id) {
            self.courier().tell(id, "You try to flee, but cannot.");
            debug!(target: "runtime::combat", id = %id, error = %err, "flee failed");
        }
    }
}
