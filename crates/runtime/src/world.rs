//! The host world: rooms, livings, brains, combatants, and the clock.
//!
//! [`World`] owns every collaborator the core consumes and drives it. Time
//! only moves through [`World::advance`], which fires due alarms in
//! (tick, insertion) order. Each alarm runs either a sequencer heartbeat or a
//! combat round; world events raised along the way are dispatched to the
//! hooks before the next alarm fires.
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::Arc;

use tracing::{debug, trace};

use mud_content::WorldSpec;
use mud_core::combat::{Armor, capitalize};
use mud_core::env::keys;
use mud_core::{
    Alarm, AlarmId, Attack, AttackId, BeatOutcome, Brain, CommandHook, Combatant, DamageKinds,
    EntityId, HeartbeatContext, HitLocation, HitlocId, Messenger, NpcOracle, NpcTemplate,
    PropValue, PropertyStore, RoomId, Tick, TimerFacility,
};

use crate::census::Census;
use crate::commands;
use crate::config::RuntimeConfig;
use crate::error::{CommandError, Result, RuntimeError};
use crate::events::WorldEvent;
use crate::hooks::HookRegistry;
use crate::living::Living;
use crate::messaging::{Courier, Outbox};
use crate::rng::SeededRng;
use crate::room::Room;
use crate::timer::AlarmQueue;

/// Hit points of a freshly connected player.
const PLAYER_HP: u32 = 100;

pub struct World {
    pub(crate) config: RuntimeConfig,
    pub(crate) census: Census,
    pub(crate) alarms: AlarmQueue,
    pub(crate) rng: SeededRng,
    pub(crate) outbox: Outbox,
    hooks: Arc<HookRegistry>,
    pub(crate) minds: BTreeMap<EntityId, Brain>,
    pub(crate) fighters: BTreeMap<EntityId, Combatant>,
    /// Repeating combat-round alarm of every engaged living.
    pub(crate) rounds: BTreeMap<EntityId, AlarmId>,
    /// Dormant livings waiting for an observer.
    watchers: BTreeSet<EntityId>,
    pending: VecDeque<WorldEvent>,
    start: Option<RoomId>,
    next_entity: u32,
    next_room: u32,
}

impl World {
    pub fn new(config: RuntimeConfig) -> Self {
        Self::with_hooks(config, HookRegistry::default_hooks())
    }

    pub fn with_hooks(config: RuntimeConfig, hooks: HookRegistry) -> Self {
        let rng = SeededRng::new(config.seed);
        Self {
            config,
            census: Census::new(),
            alarms: AlarmQueue::new(),
            rng,
            outbox: Outbox::new(),
            hooks: Arc::new(hooks),
            minds: BTreeMap::new(),
            fighters: BTreeMap::new(),
            rounds: BTreeMap::new(),
            watchers: BTreeSet::new(),
            pending: VecDeque::new(),
            start: None,
            next_entity: 1,
            next_room: 1,
        }
    }

    /// Builds rooms, exits, and NPCs from a content layout.
    pub fn populate(&mut self, layout: &WorldSpec, npcs: &dyn NpcOracle) -> Result<()> {
        let mut ids = BTreeMap::new();
        for spec in &layout.rooms {
            ids.insert(spec.key.as_str(), self.add_room(&spec.key, spec.peaceful));
        }
        let lookup = |key: &str| {
            ids.get(key)
                .copied()
                .ok_or_else(|| RuntimeError::UnknownRoomKey(key.to_owned()))
        };

        for spec in &layout.rooms {
            let from = lookup(&spec.key)?;
            for (direction, destination) in &spec.exits {
                self.link(from, direction, lookup(destination)?)?;
            }
        }
        self.start = Some(lookup(&layout.start)?);

        for spec in &layout.rooms {
            let room = lookup(&spec.key)?;
            for key in &spec.npcs {
                let template = npcs
                    .template(key)
                    .ok_or_else(|| RuntimeError::UnknownTemplate(key.clone()))?;
                self.spawn(key, &template, room)?;
            }
        }
        Ok(())
    }

    // ===== accessors =====

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn census(&self) -> &Census {
        &self.census
    }

    pub fn now(&self) -> Tick {
        self.census.now()
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    pub fn outbox_mut(&mut self) -> &mut Outbox {
        &mut self.outbox
    }

    pub fn alarms(&self) -> &AlarmQueue {
        &self.alarms
    }

    pub fn brain(&self, id: EntityId) -> Option<&Brain> {
        self.minds.get(&id)
    }

    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.fighters.get(&id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        self.fighters.get_mut(&id)
    }

    /// Room players start in, if the layout named one.
    pub fn start_room(&self) -> Option<RoomId> {
        self.start
    }

    pub fn is_watching(&self, id: EntityId) -> bool {
        self.watchers.contains(&id)
    }

    pub fn set_property(&mut self, entity: EntityId, key: &str, value: PropValue) {
        self.census.set_property(entity, key, value);
    }

    // ===== building =====

    pub fn add_room(&mut self, key: &str, peaceful: bool) -> RoomId {
        let id = RoomId(self.next_room);
        self.next_room += 1;
        self.census.add_room(Room::new(id, key).peaceful(peaceful));
        self.start.get_or_insert(id);
        id
    }

    /// Adds a one-way exit.
    pub fn link(&mut self, from: RoomId, exit: &str, to: RoomId) -> Result<()> {
        if self.census.room(to).is_none() {
            return Err(RuntimeError::UnknownRoom(to));
        }
        let room = self
            .census
            .room_mut(from)
            .ok_or(RuntimeError::UnknownRoom(from))?;
        room.exits.insert(exit.to_owned(), to);
        Ok(())
    }

    /// Places a new NPC and boots its brain.
    pub fn spawn(&mut self, key: &str, template: &NpcTemplate, room: RoomId) -> Result<EntityId> {
        if self.census.room(room).is_none() {
            return Err(RuntimeError::UnknownRoom(room));
        }
        let id = self.allocate();
        let (brain, fighter) = template.spawn(id).map_err(|source| RuntimeError::Template {
            key: key.to_owned(),
            source,
        })?;
        self.census
            .insert_living(Living::npc(id, template.name.as_str(), room, key));
        self.enter(id, brain, fighter, room)?;
        debug!(target: "runtime::world", npc = key, id = %id, room = %room, "spawned");
        self.pump()?;
        Ok(id)
    }

    /// Spawns `key` from an oracle.
    pub fn spawn_from(&mut self, npcs: &dyn NpcOracle, key: &str, room: RoomId) -> Result<EntityId> {
        let template = npcs
            .template(key)
            .ok_or_else(|| RuntimeError::UnknownTemplate(key.to_owned()))?;
        self.spawn(key, &template, room)
    }

    /// Connects an interactive living.
    pub fn add_player(&mut self, name: &str, room: RoomId) -> Result<EntityId> {
        if self.census.room(room).is_none() {
            return Err(RuntimeError::UnknownRoom(room));
        }
        let id = self.allocate();
        let (brain, mut fighter) = player_template(name)
            .spawn(id)
            .map_err(|source| RuntimeError::Template {
                key: name.to_owned(),
                source,
            })?;
        fighter.wimpy = self.config.default_wimpy;
        self.census.insert_living(Living::player(id, name, room));
        self.enter(id, brain, fighter, room)?;
        self.pump()?;
        Ok(id)
    }

    fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    fn enter(&mut self, id: EntityId, mut brain: Brain, fighter: Combatant, room: RoomId) -> Result<()> {
        brain.boot(&mut self.alarms, &mut self.rng, &self.config.core)?;
        self.minds.insert(id, brain);
        self.fighters.insert(id, fighter);
        self.emit(WorldEvent::Arrived {
            entity: id,
            room,
            from: None,
        });
        Ok(())
    }

    // ===== time =====

    /// Runs the world for `ticks` ticks.
    ///
    /// # Errors
    ///
    /// Only a failing critical hook stops the world; command and callback
    /// failures are logged and skipped.
    pub fn advance(&mut self, ticks: u64) -> Result<()> {
        for _ in 0..ticks {
            let now = self.census.now() + 1;
            self.census.set_now(now);
            self.alarms.advance_to(now);
            self.fire_due()?;
        }
        Ok(())
    }

    fn fire_due(&mut self) -> Result<()> {
        while let Some((_, alarm)) = self.alarms.pop_due() {
            match alarm {
                Alarm::Heartbeat(id) => self.heartbeat(id),
                Alarm::CombatRound(id) => self.combat_round(id),
            }
            self.pump()?;
        }
        Ok(())
    }

    /// One sequencer heartbeat; resulting commands run in tape order.
    fn heartbeat(&mut self, id: EntityId) {
        let Some(brain) = self.minds.get_mut(&id) else {
            return;
        };
        let mut ctx = HeartbeatContext {
            view: &self.census,
            timers: &mut self.alarms,
            rng: &mut self.rng,
            config: &self.config.core,
        };
        let beat = brain.heartbeat(&mut ctx);

        match beat.outcome {
            BeatOutcome::Continue { next_in } => {
                trace!(target: "runtime::sequencer", id = %id, next_in, "heartbeat");
            }
            BeatOutcome::Dormant => {
                debug!(target: "runtime::sequencer", id = %id, "no observer, going dormant");
                self.watchers.insert(id);
            }
            BeatOutcome::Stopped => {
                trace!(target: "runtime::sequencer", id = %id, "all sequences exhausted");
            }
        }
        for command in beat.commands {
            self.perform(id, &command);
        }
    }

    /// Runs a command, logging instead of propagating failure.
    pub fn perform(&mut self, actor: EntityId, line: &str) {
        match self.execute(actor, line) {
            Ok(()) => trace!(target: "runtime::commands", actor = %actor, command = line, "ok"),
            Err(err) => debug!(
                target: "runtime::commands",
                actor = %actor,
                command = line,
                error = %err,
                "command failed"
            ),
        }
    }

    /// Runs a command typed by a player and settles its consequences.
    pub fn command(&mut self, actor: EntityId, line: &str) -> Result<()> {
        let result = self.execute(actor, line);
        self.pump()?;
        result
    }

    // ===== events =====

    pub(crate) fn emit(&mut self, event: WorldEvent) {
        self.pending.push_back(event);
    }

    /// Dispatches queued events, including those raised while dispatching.
    pub(crate) fn pump(&mut self) -> Result<()> {
        while let Some(event) = self.pending.pop_front() {
            let hooks = Arc::clone(&self.hooks);
            hooks.dispatch(&event, self)?;
        }
        Ok(())
    }

    // ===== reactions used by hooks =====

    /// Re-arms every dormant living in `room`.
    pub fn wake_watchers(&mut self, room: RoomId) {
        let woken: Vec<EntityId> = self
            .watchers
            .iter()
            .copied()
            .filter(|&id| self.census.room_of(id) == Some(room))
            .collect();
        for id in woken {
            self.watchers.remove(&id);
            let Some(brain) = self.minds.get_mut(&id) else {
                continue;
            };
            if brain.sequencer.wake(&mut self.alarms, &self.config.core) {
                debug!(target: "runtime::sequencer", id = %id, "woken by observer");
            }
        }
    }

    /// Lets `npc` decide whether to attack `target`.
    pub fn provoke(&mut self, npc: EntityId, target: EntityId) -> Result<()> {
        let Some(brain) = self.minds.get_mut(&npc) else {
            return Ok(());
        };
        let Some(aggression) = brain.aggression.as_ref() else {
            return Ok(());
        };
        if self.census.has_flag(npc, keys::FIGHTING) {
            return Ok(());
        }
        match aggression.consider(npc, target, &self.census, &mut self.rng) {
            Ok(Some(plan)) => {
                debug!(target: "runtime::combat", npc = %npc, target = %target, brave = plan.brave, "aggression");
                if plan.brave {
                    self.census.set_property(
                        npc,
                        keys::FEAR_OVERRIDE,
                        PropValue::Flag(true),
                    );
                }
                brain.script(plan.instructions, &mut self.alarms, &self.config.core)?;
            }
            Ok(None) => {}
            Err(refusal) => {
                debug!(target: "runtime::combat", npc = %npc, target = %target, %refusal, "attack refused");
            }
        }
        Ok(())
    }

    /// Queues `target`'s answer to a question from `asker`.
    pub fn pose_question(&mut self, asker: EntityId, target: EntityId, question: &str) -> Result<()> {
        let Some(brain) = self.minds.get_mut(&target) else {
            return Err(RuntimeError::UnknownLiving(target));
        };
        let Some(asks) = brain.asks.as_ref() else {
            return Ok(());
        };
        let tape = asks.respond(target, asker, question, &self.census, &mut self.rng, &self.config.core);
        if let Some(tape) = tape {
            brain.answer(tape, &mut self.alarms, &self.config.core)?;
        }
        Ok(())
    }

    /// Removes a dead living from the world. Safe to call twice.
    pub fn bury(&mut self, victim: EntityId, victim_name: &str, killer: Option<EntityId>) -> Result<()> {
        let Some(living) = self.census.remove_living(victim) else {
            return Ok(());
        };
        let mut courier = self.courier();
        courier.tell_room_of(living.room, &[], &format!("{} is dead.", capitalize(victim_name)));

        if let Some(round) = self.rounds.remove(&victim) {
            self.alarms.cancel(round);
        }
        if let Some(mut brain) = self.minds.remove(&victim) {
            brain.sequencer.halt(&mut self.alarms);
        }
        self.fighters.remove(&victim);
        self.watchers.remove(&victim);

        self.census.forget_properties(victim);
        if let Some(name) = killer.and_then(|id| self.census.living(id)).map(|l| l.name.clone()) {
            self.census.set_property(
                victim,
                keys::KILLED_BY,
                PropValue::Text(name),
            );
        }

        let bereaved: Vec<EntityId> = self
            .fighters
            .iter_mut()
            .filter(|(_, fighter)| fighter.enemies().contains(&victim))
            .filter_map(|(&id, fighter)| (!fighter.forget(victim)).then_some(id))
            .collect();
        for id in bereaved {
            self.disengage(id);
        }
        debug!(target: "runtime::combat", victim = %victim, killer = ?killer, "buried");
        Ok(())
    }

    // ===== movement and speech =====

    /// Moves `actor` through the named exit of its room.
    pub fn go(&mut self, actor: EntityId, exit: &str) -> Result<()> {
        let from = self
            .census
            .room_of(actor)
            .ok_or(CommandError::ActorGone(actor))?;
        let to = self
            .census
            .room(from)
            .and_then(|room| room.exit(exit))
            .ok_or_else(|| CommandError::NoSuchExit(exit.to_owned()))?;
        let name = self.display_name(actor);

        self.courier()
            .tell_room(actor, &[actor], &format!("{name} leaves {exit}."));
        self.census.move_living(actor, to);
        self.courier()
            .tell_room(actor, &[actor], &format!("{name} arrives."));

        self.emit(WorldEvent::Departed {
            entity: actor,
            room: from,
            to,
        });
        self.emit(WorldEvent::Arrived {
            entity: actor,
            room: to,
            from: Some(from),
        });
        Ok(())
    }

    pub fn say(&mut self, actor: EntityId, text: &str) -> Result<()> {
        let room = self
            .census
            .room_of(actor)
            .ok_or(CommandError::ActorGone(actor))?;
        let name = self.display_name(actor);
        let mut courier = self.courier();
        courier.tell(actor, &format!("You say: {text}"));
        courier.tell_room(actor, &[actor], &format!("{name} says: {text}"));
        self.emit(WorldEvent::Said {
            speaker: actor,
            room,
            text: text.to_owned(),
        });
        Ok(())
    }

    pub fn emote(&mut self, actor: EntityId, text: &str) -> Result<()> {
        if self.census.living(actor).is_none() {
            return Err(CommandError::ActorGone(actor).into());
        }
        let name = self.display_name(actor);
        self.courier().tell_room(actor, &[], &format!("{name} {text}"));
        Ok(())
    }

    pub fn ask(&mut self, asker: EntityId, target: EntityId, question: &str) -> Result<()> {
        let name = self.display_name(asker);
        let target_name = self
            .census
            .living(target)
            .map(|living| living.name.clone())
            .ok_or(CommandError::ActorGone(target))?;
        let mut courier = self.courier();
        courier.tell(asker, &format!("You ask {target_name}: {question}"));
        courier.tell_room(asker, &[asker], &format!("{name} asks {target_name}: {question}"));
        self.emit(WorldEvent::Asked {
            asker,
            target,
            question: question.to_owned(),
        });
        Ok(())
    }

    pub(crate) fn courier(&mut self) -> Courier<'_> {
        Courier {
            census: &self.census,
            outbox: &mut self.outbox,
        }
    }

    pub(crate) fn display_name(&self, id: EntityId) -> String {
        self.census
            .living(id)
            .map(|living| capitalize(&living.name))
            .unwrap_or_else(|| "Someone".to_owned())
    }
}

impl CommandHook for World {
    type Error = RuntimeError;

    fn execute(&mut self, actor: EntityId, command: &str) -> Result<()> {
        commands::run(self, actor, command)
    }
}

/// Bare-handed combat profile of a player.
fn player_template(name: &str) -> NpcTemplate {
    let mut template = NpcTemplate::new(name, PLAYER_HP);
    template.attacks.push(Attack {
        id: AttackId(1),
        to_hit: 0,
        penetration: 6,
        kinds: DamageKinds::BLUDGEON,
        use_pct: 100,
        skill: None,
        desc: "fists".to_owned(),
    });
    template.hitlocs.push(HitLocation {
        id: HitlocId(1),
        armor: Armor::uniform(0),
        hit_pct: 100,
        desc: "body".to_owned(),
    });
    template
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("now", &self.census.now())
            .field("livings", &self.minds.len())
            .field("alarms", &self.alarms.len())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}
