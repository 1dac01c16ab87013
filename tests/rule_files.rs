use entstrip::memory::{MemoryEntity, MemoryLump};
use entstrip::{ApplyError, ApplyOptions, Connection, EntstripError, RuleFile, CompileError};

fn lump(entities: Vec<MemoryEntity>) -> MemoryLump {
    entities
        .into_iter()
        .fold(MemoryLump::new("default_ents"), MemoryLump::with_entity)
}

fn apply(rules: &str, lump: &mut MemoryLump) -> entstrip::ApplyReport {
    RuleFile::from_jsonc(rules)
        .unwrap()
        .apply(lump, ApplyOptions::default())
}

#[test]
fn duplicate_sections_all_apply() {
    let mut lump = lump(vec![
        MemoryEntity::new().with("classname", "a"),
        MemoryEntity::new().with("classname", "b"),
        MemoryEntity::new().with("classname", "c"),
    ]);
    let report = apply(
        r#"{"remove": {"classname": "a"}, "remove": {"classname": "b"}}"#,
        &mut lump,
    );
    assert_eq!(report.removed(), 2);
    assert_eq!(lump.len(), 1);
    assert_eq!(lump.entities()[0].get("classname"), Some("c"));
}

#[test]
fn comments_do_not_eat_strings() {
    let mut lump = lump(vec![MemoryEntity::new()
        .with("classname", "info_target")
        .with("url", "http://not-a-comment")]);
    let report = apply(
        r#"{
            // remove the target
            "remove": {
                "url": "http://not-a-comment", /* block
                comment */ "classname": "info_target", // trailing
            },
        }"#,
        &mut lump,
    );
    assert_eq!(report.removed(), 1);
    assert!(lump.is_empty());
}

#[test]
fn wildcard_prefix_on_classname() {
    let mut lump = lump(vec![
        MemoryEntity::new().with("classname", "tank_boss"),
        MemoryEntity::new().with("classname", "TANK_small"),
        MemoryEntity::new().with("classname", "mytank_x"),
    ]);
    apply(r#"{"remove": {"classname": "tank_*"}}"#, &mut lump);
    assert_eq!(lump.len(), 1);
    assert_eq!(lump.entities()[0].get("classname"), Some("mytank_x"));
}

#[test]
fn wildcard_is_literal_on_other_keys() {
    let mut lump = lump(vec![
        MemoryEntity::new().with("model", "models/a.mdl"),
        MemoryEntity::new().with("model", "models/*"),
    ]);
    apply(r#"{"remove": {"model": "models/*"}}"#, &mut lump);
    assert_eq!(lump.len(), 1);
    assert_eq!(lump.entities()[0].get("model"), Some("models/a.mdl"));
}

#[test]
fn regex_matches_case_insensitively() {
    let mut lump = lump(vec![
        MemoryEntity::new().with("classname", "NPC_Zombie_Elite"),
        MemoryEntity::new().with("classname", "npc_zombie"),
    ]);
    apply(r#"{"remove": {"classname": "/^npc_.*_elite$/"}}"#, &mut lump);
    assert_eq!(lump.len(), 1);
    assert_eq!(lump.entities()[0].get("classname"), Some("npc_zombie"));
}

#[test]
fn connection_patterns_are_and_of_ors() {
    let killer = MemoryEntity::new()
        .with("classname", "logic_relay")
        .with_connection(Connection::new("OnTrigger", "boss", "Kill"));
    let both = MemoryEntity::new()
        .with("classname", "logic_relay")
        .with_connection(Connection::new("OnTrigger", "boss", "Kill"))
        .with_connection(Connection::new("OnTrigger", "door", "Disable"));
    let mut lump = lump(vec![killer, both]);

    let report = apply(
        r#"{"remove": {"connections": [{"input": "Kill"}, {"input": "Disable"}]}}"#,
        &mut lump,
    );
    assert_eq!(report.removed(), 1);
    assert_eq!(lump.entities()[0].connections().len(), 1);
}

#[test]
fn delete_runs_before_insert() {
    let mut lump = lump(vec![MemoryEntity::new()
        .with("classname", "npc_tank")
        .with("health", "100")]);
    let report = apply(
        r#"{"modify": {
            "match": {"classname": "npc_tank"},
            "delete": {"health": "100"},
            "insert": {"health": "50"}
        }}"#,
        &mut lump,
    );
    assert_eq!(report.modified(), 1);
    assert_eq!(lump.entities()[0].get("health"), Some("50"));
}

#[test]
fn replace_connection_only_appends() {
    let mut lump = lump(vec![MemoryEntity::new()
        .with("targetname", "door")
        .with_connection(Connection::new("OnOpen", "light", "TurnOn"))]);
    apply(
        r#"{"modify": {
            "match": {"targetname": "door"},
            "replace": {"io": {"output": "OnOpen", "target": "light", "input": "TurnOn", "limit": 1}}
        }}"#,
        &mut lump,
    );
    let connections = lump.entities()[0].connections();
    assert_eq!(connections.len(), 2);
    assert_eq!(connections[0].limit, -1);
    assert_eq!(connections[1].limit, 1);
}

#[test]
fn replace_toggle_disables_replace_blocks() {
    let rules = RuleFile::from_jsonc(
        r#"{"modify": {
            "match": {"targetname": "door"},
            "replace": {"speed": "10"},
            "insert": {"spawnflags": "2"}
        }}"#,
    )
    .unwrap();
    let mut lump = lump(vec![MemoryEntity::new()
        .with("targetname", "door")
        .with("speed", "1")]);

    rules.apply(&mut lump, ApplyOptions::default().with_replace(false));
    let door = &lump.entities()[0];
    assert_eq!(door.get("speed"), Some("1"));
    assert_eq!(door.get("spawnflags"), Some("2"));
}

#[test]
fn add_builds_connections_with_defaults() {
    let mut lump = lump(vec![]);
    let report = apply(
        r#"{"add": [
            {"classname": "logic_auto", "connections": [
                {"output": "OnMapSpawn", "target": "relay", "input": "Trigger"},
                {"outputname": "OnMapSpawn", "targetname": "door", "inputname": "Open",
                 "overrideparam": "x", "delay": 2.5, "timestofire": 1}
            ]},
            {"classname": "info_target", "targetname": "marker"}
        ]}"#,
        &mut lump,
    );
    assert_eq!(report.added(), 2);

    let auto = lump.find("classname", "logic_auto").unwrap();
    assert_eq!(
        auto.connections(),
        [
            Connection::new("OnMapSpawn", "relay", "Trigger"),
            Connection::new("OnMapSpawn", "door", "Open")
                .with_param("x")
                .with_delay(2.5)
                .with_limit(1),
        ]
    );
    assert!(lump.find("targetname", "marker").is_some());
}

#[test]
fn incomplete_connection_skips_one_add() {
    let mut lump = lump(vec![]);
    let report = apply(
        r#"{"add": [
            {"classname": "a", "connections": [{"output": "OnTrigger", "input": "Kill"}]},
            {"classname": "b"}
        ]}"#,
        &mut lump,
    );
    assert_eq!(report.added(), 1);
    assert_eq!(
        report.errors(),
        [ApplyError::IncompleteConnection { field: "target" }]
    );
    assert_eq!(lump.entities()[0].get("classname"), Some("b"));
}

#[test]
fn modify_sees_entities_added_by_the_same_file() {
    let mut lump = lump(vec![MemoryEntity::new().with("classname", "info_target")]);
    apply(
        r#"{
            "modify": {"match": {"classname": "info_target"}, "insert": {"tagged": "1"}},
            "add": {"classname": "info_target", "targetname": "new"},
            "remove": {"classname": "info_target"}
        }"#,
        &mut lump,
    );
    assert_eq!(lump.len(), 1);
    let added = &lump.entities()[0];
    assert_eq!(added.get("targetname"), Some("new"));
    assert_eq!(added.get("tagged"), Some("1"));
}

#[test]
fn scalar_predicates() {
    let mut lump = lump(vec![
        MemoryEntity::new().with("spawnflags", "4").with("scale", "0.5").with("enabled", "1"),
        MemoryEntity::new().with("spawnflags", "04").with("scale", "0.5004").with("enabled", "true"),
        MemoryEntity::new().with("spawnflags", "4").with("scale", "0.502").with("enabled", "1"),
    ]);
    let report = apply(
        r#"{"remove": {"spawnflags": 4, "scale": 0.5, "enabled": true}}"#,
        &mut lump,
    );
    assert_eq!(report.removed(), 2);
    assert_eq!(lump.entities()[0].get("scale"), Some("0.502"));
}

#[test]
fn bad_regex_reports_its_source() {
    let err = RuleFile::from_jsonc(r#"{"remove": {"classname": "/(npc/"}}"#).unwrap_err();
    match err {
        EntstripError::Compile(CompileError::RegexCompile { source_text, .. }) => {
            assert_eq!(source_text, "/(npc/");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_json_preview_is_bounded() {
    let long_value = "x".repeat(200);
    let text = format!(r#"{{"remove": {{"classname": "{long_value}", "health": 1e999999}}}}"#);
    let err = RuleFile::from_jsonc(&text).unwrap_err();
    match err {
        EntstripError::Compile(CompileError::InvalidJson { preview, .. }) => {
            assert_eq!(preview.chars().count(), 64 + 3);
            assert!(preview.ends_with("..."));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn verbose_does_not_change_results() {
    let rules = RuleFile::from_jsonc(
        r#"{
            "remove": {"classname": "a"},
            "modify": {"match": {"classname": "b"}, "replace": {"x": "1"}}
        }"#,
    )
    .unwrap();
    let original = lump(vec![
        MemoryEntity::new().with("classname", "a"),
        MemoryEntity::new().with("classname", "b"),
    ]);

    let mut quiet = original.clone();
    let mut loud = original;
    let quiet_report = rules.apply(&mut quiet, ApplyOptions::default());
    let loud_report = rules.apply(&mut loud, ApplyOptions::default().with_verbose(true));

    assert_eq!(quiet, loud);
    assert_eq!(quiet_report.removed(), loud_report.removed());
    assert_eq!(quiet_report.modified(), loud_report.modified());
}

#[test]
fn connections_and_io_in_one_block_are_both_required() {
    let mut lump = lump(vec![
        MemoryEntity::new()
            .with("targetname", "only_kill")
            .with_connection(Connection::new("OnTrigger", "boss", "Kill")),
        MemoryEntity::new()
            .with("targetname", "both")
            .with_connection(Connection::new("OnTrigger", "boss", "Kill"))
            .with_connection(Connection::new("OnTrigger", "door", "Disable")),
    ]);
    let report = apply(
        r#"{"remove": {"connections": [{"input": "Disable"}], "io": [{"input": "Kill"}]}}"#,
        &mut lump,
    );
    assert_eq!(report.removed(), 1);
    assert_eq!(lump.len(), 1);
    assert_eq!(lump.entities()[0].get("targetname"), Some("only_kill"));
}

#[test]
fn connections_and_io_in_one_insert_are_both_added() {
    let mut lump = lump(vec![MemoryEntity::new().with("targetname", "relay")]);
    apply(
        r#"{"modify": {
            "match": {"targetname": "relay"},
            "insert": {
                "connections": [{"output": "OnTrigger", "target": "a", "input": "Kill"}],
                "io": [{"output": "OnTrigger", "target": "b", "input": "Open"}]
            }
        }}"#,
        &mut lump,
    );
    let targets: Vec<_> = lump.entities()[0]
        .connections()
        .iter()
        .map(|c| c.target.as_str())
        .collect();
    assert_eq!(targets, ["a", "b"]);
}

#[test]
fn second_replacement_connection_fails_the_file() {
    let err = RuleFile::from_jsonc(
        r#"{"modify": {
            "match": {"targetname": "relay"},
            "replace": {
                "connections": {"output": "OnTrigger", "target": "a", "input": "Kill"},
                "io": {"output": "OnTrigger", "target": "b", "input": "Open"}
            }
        }}"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EntstripError::Compile(CompileError::DuplicateReplacement { .. })
    ));
}

#[test]
fn bad_regex_in_an_assignment_fails_the_file() {
    let err = RuleFile::from_jsonc(
        r#"{"modify": {"match": {"classname": "a"}, "insert": {"model": "/(npc/"}}}"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        EntstripError::Compile(CompileError::RegexCompile { .. })
    ));
}
