use entstrip::memory::{MemoryEntity, MemoryLump};
use entstrip::{ApplyOptions, Connection, RuleFile};

fn main() {
    // Define rules
    let rules = RuleFile::from_jsonc(
        r#"{
            // no zombies on this map
            "remove": {"classname": "npc_zombie*"},

            "add": {
                "classname": "logic_auto",
                "connections": [
                    {"output": "OnMapSpawn", "target": "gate", "input": "Open", "delay": 2},
                ],
            },

            "modify": {
                "match": {"targetname": "gate"},
                "delete": {"connections": [{"input": "Lock"}]},
                "insert": {"speed": "80"},
            },
        }"#,
    )
    .expect("failed to compile rules");

    println!("compiled {} rules", rules.len());

    // Apply them to a small lump
    let mut lump = MemoryLump::new("default_ents")
        .with_entity(MemoryEntity::new().with("classname", "npc_zombie_fast"))
        .with_entity(
            MemoryEntity::new()
                .with("classname", "func_door")
                .with("targetname", "gate")
                .with_connection(Connection::new("OnClose", "gate", "Lock")),
        );

    let report = rules.apply(&mut lump, ApplyOptions::default());
    println!("{report}");

    for entity in lump.entities() {
        let attributes: Vec<String> = entity
            .attributes()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        println!(
            "{} ({} connections)",
            attributes.join(" "),
            entity.connections().len()
        );
    }
}
