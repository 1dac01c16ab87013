use std::fs;

use entstrip::memory::{MemoryEntity, MemoryLump};
use entstrip::{ApplyOptions, RuleSet};

fn main() {
    let root = std::env::temp_dir().join("entstrip-demo");
    let level_dir = root.join("maps").join("c1m1");
    fs::create_dir_all(level_dir.join("basement")).expect("failed to create rule directories");

    fs::write(
        root.join("global.jsonc"),
        r#"{"remove": {"classname": "item_ammo_*"}}"#,
    )
    .expect("failed to write global rules");
    fs::write(
        root.join("global_default.jsonc"),
        r#"{"add": {"classname": "info_player_start", "origin": "0 0 64"}}"#,
    )
    .expect("failed to write global default rules");
    fs::write(
        level_dir.join("default_ents.jsonc"),
        r#"{"modify": {"match": {"classname": "light"}, "replace": {"brightness": "50"}}}"#,
    )
    .expect("failed to write lump rules");
    fs::write(
        level_dir.join("basement").join("lights.jsonc"),
        r#"{"remove": {"classname": "light"}}"#,
    )
    .expect("failed to write lump rules");

    let mut rules = RuleSet::new(&root);
    if let Err(err) = rules.load("c1m1") {
        eprintln!("failed to load rules: {err}");
        return;
    }

    // The level's main world
    let mut main = vec![MemoryLump::new("default_ents")
        .with_entity(MemoryEntity::new().with("classname", "light"))
        .with_entity(MemoryEntity::new().with("classname", "item_ammo_smg"))];
    let report = rules.apply_world("c1m1", "c1m1", &mut main, ApplyOptions::default());
    println!("c1m1: {report}");

    // A sub-world streamed in later
    let mut basement = vec![MemoryLump::new("lights")
        .with_entity(MemoryEntity::new().with("classname", "light"))];
    let report = rules.apply_world("c1m1", "basement", &mut basement, ApplyOptions::default());
    println!("basement: {report}");

    rules.purge();
    println!("rules after purge: {}", rules.has_rules());
    let _ = fs::remove_dir_all(&root);
}
