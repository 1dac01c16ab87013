use entstrip::memory::{MemoryEntity, MemoryLump};
use entstrip::{ApplyOptions, RuleFile};

fn main() {
    // Toggles usually come from the host's own configuration file.
    let options: ApplyOptions = serde_json::from_str(r#"{"verbose": true, "replace_enabled": false}"#)
        .expect("invalid options");
    println!("{options:?}");

    let rules = RuleFile::from_jsonc(
        r#"{"modify": {
            "match": {"classname": "func_button"},
            "replace": {"wait": "-1"},
            "insert": {"spawnflags": "1025"}
        }}"#,
    )
    .expect("failed to compile rules");

    let template = MemoryLump::new("default_ents")
        .with_entity(MemoryEntity::new().with("classname", "func_button").with("wait", "3"));

    for options in [ApplyOptions::default(), options] {
        let mut lump = template.clone();
        let report = rules.apply(&mut lump, options);
        let button = &lump.entities()[0];
        println!(
            "replace_enabled={}: wait={:?} spawnflags={:?} ({report})",
            options.replace_enabled,
            button.get("wait"),
            button.get("spawnflags"),
        );
    }
}
