//! Loader tests against the bundled data and temporary files.

use std::io::Write;

use mud_content::{ContentFactory, NpcLoader, TablesLoader, WorldLoader};
use mud_core::{AttackId, BehaviorKind, CoreConfig, DamageKinds, EntityId, NpcOracle};

#[test]
fn bundled_content_loads_and_spawns() {
    let factory = ContentFactory::bundled();
    let tables = factory.load_tables().unwrap();
    assert_eq!(tables.sequencer, CoreConfig::new());
    assert_eq!(tables.combat.hit_chance.max, 95);

    let catalog = factory.load_npcs().unwrap();
    assert_eq!(catalog.keys(), ["barkeep", "goblin", "guard"]);

    let world = factory.load_world(&catalog).unwrap();
    assert_eq!(world.start, "square");

    let goblin = catalog.template("goblin").unwrap();
    let (brain, fighter) = goblin.spawn(EntityId(1)).unwrap();
    assert!(brain.aggression.is_some());
    assert!(brain.behaviors.kinds().any(|kind| kind == BehaviorKind::Wander));
    let claws = fighter.context.registry.query_attack(AttackId(1)).unwrap();
    assert_eq!(claws.kinds, DamageKinds::SLASH);
    assert_eq!(fighter.context.attack_use, 90);

    let guard = catalog.template("guard").unwrap();
    assert_eq!(guard.attacks[0].kinds, DamageKinds::SLASH | DamageKinds::IMPALE);
    let asks = guard.asks.unwrap();
    assert_eq!(asks.reply_for("Who are you?"), Some("Sergeant Holt, of the watch."));
    assert_eq!(asks.reply_for("What time is it?"), Some("I don't know"));
}

#[test]
fn tables_fall_back_to_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[sequencer]\ndormancy_timeout = 5").unwrap();

    let tables = TablesLoader::load(file.path()).unwrap();
    assert_eq!(tables.sequencer.dormancy_timeout, 5);
    assert_eq!(tables.sequencer.beat_delay, CoreConfig::DEFAULT_BEAT_DELAY);
    assert_eq!(tables.combat.skill_divisor, 4);
}

#[test]
fn inverted_answer_window_is_rejected() {
    let err = TablesLoader::parse("[sequencer]\nanswer_delay_min = 9\nanswer_delay_max = 2\n").unwrap_err();
    assert!(err.to_string().contains("answer_delay_min"));
}

#[test]
fn malformed_attack_is_rejected() {
    let ron = r#"[("blob", (name: "blob", max_hp: 5, attacks: [
        (id: AttackId(1), to_hit: 0, penetration: 1, kinds: "BLUDGEON", use_pct: 250, skill: None, desc: "ooze"),
    ]))]"#;
    let err = NpcLoader::parse(ron).unwrap_err();
    assert!(err.to_string().contains("Invalid NPC 'blob'"), "{err}");
}

#[test]
fn repeated_attack_ids_are_rejected() {
    let ron = r#"[("rat", (name: "rat", max_hp: 2, attacks: [
        (id: AttackId(1), to_hit: 0, penetration: 1, kinds: "SLASH", use_pct: 50, skill: None, desc: "claws"),
        (id: AttackId(1), to_hit: 0, penetration: 2, kinds: "IMPALE", use_pct: 50, skill: None, desc: "bite"),
    ]))]"#;
    let err = NpcLoader::parse(ron).unwrap_err();
    assert!(err.to_string().contains("Invalid NPC 'rat'"), "{err}");
    assert!(err.to_string().contains("listed twice"), "{err}");
}

#[test]
fn duplicate_npc_keys_are_rejected() {
    let ron = r#"[("rat", (name: "rat", max_hp: 2)), ("rat", (name: "rat", max_hp: 3))]"#;
    assert!(NpcLoader::parse(ron).is_err());
}

#[test]
fn dangling_exit_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("world.ron");
    std::fs::write(
        &path,
        r#"(start: "a", rooms: [(key: "a", exits: [("up", "attic")])])"#,
    )
    .unwrap();
    let err = WorldLoader::load(&path).unwrap_err();
    assert!(err.to_string().contains("attic"));
}

#[test]
fn missing_file_reports_path() {
    let err = ContentFactory::new("/nonexistent/mud").load_npcs().unwrap_err();
    assert!(err.to_string().contains("npcs.ron"));
}
