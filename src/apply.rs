use std::time::Instant;

use serde::Serialize;

use crate::evaluate::{connection_matches, is_match};
use crate::{
    AddRule, AllocationKind, ApplyError, ApplyOptions, ApplyReport, Connection,
    ConnectionTemplate, Deletions, EntityView, FilterRule, Insertions, Lump, ModifyRule,
    MutationSpec, Replacements, Rule,
};

/// Apply one rule file's rules to a lump: removals first, then additions,
/// then modifications. Modifications see entities added by the same call.
pub(crate) fn apply_rules<L: Lump + ?Sized>(
    lump: &mut L,
    rules: &[Rule],
    options: ApplyOptions,
) -> ApplyReport {
    let started = Instant::now();
    let lump_name = lump.name().to_owned();
    let mut report = ApplyReport::default();

    for rule in rules {
        if let Rule::Filter(filter) = rule {
            apply_filter(lump, filter, &lump_name, options, &mut report);
        }
    }

    for rule in rules {
        if let Rule::Add(add) = rule {
            match apply_add(lump, add) {
                Ok(()) => {
                    report.record_added();
                    if options.verbose {
                        tracing::info!(lump = %lump_name, rule = %summary(add), "added entity");
                    }
                }
                Err(error) => {
                    tracing::warn!(lump = %lump_name, %error, "skipped add rule");
                    report.record_error(error);
                }
            }
        }
    }

    for rule in rules {
        if let Rule::Modify(modify) = rule {
            apply_modify(lump, modify, &lump_name, options, &mut report);
        }
    }

    report.set_duration(started.elapsed());
    report
}

fn apply_filter<L: Lump + ?Sized>(
    lump: &mut L,
    rule: &FilterRule,
    lump_name: &str,
    options: ApplyOptions,
    report: &mut ApplyReport,
) {
    for index in (0..lump.len()).rev() {
        let Some(entity) = lump.entity(index) else {
            continue;
        };
        if !is_match(entity, &rule.matches) {
            continue;
        }
        if options.verbose {
            tracing::info!(
                lump = %lump_name,
                entity = %describe(entity),
                rule = %summary(&rule.matches),
                "removed entity"
            );
        }
        lump.remove_entity(index);
        report.record_removed();
    }
}

fn apply_modify<L: Lump + ?Sized>(
    lump: &mut L,
    rule: &ModifyRule,
    lump_name: &str,
    options: ApplyOptions,
    report: &mut ApplyReport,
) {
    for index in 0..lump.len() {
        let Some(entity) = lump.entity_mut(index) else {
            continue;
        };
        if !is_match(&*entity, &rule.matches) {
            continue;
        }
        let before = options.verbose.then(|| describe(&*entity));
        apply_mutation(entity, &rule.mutation, options, lump_name, report);
        report.record_modified();
        if let Some(before) = before {
            tracing::info!(
                lump = %lump_name,
                before = %before,
                after = %describe(&*entity),
                rule = %summary(&rule.mutation),
                "modified entity"
            );
        }
    }
}

/// Patch one matched entity: delete, then replace (when enabled), then insert.
fn apply_mutation<E: EntityView + ?Sized>(
    entity: &mut E,
    mutation: &MutationSpec,
    options: ApplyOptions,
    lump_name: &str,
    report: &mut ApplyReport,
) {
    if let Some(deletions) = &mutation.delete {
        apply_delete(entity, deletions);
    }
    if let Some(replacements) = &mutation.replace {
        if options.replace_enabled {
            if let Err(error) = apply_replace(entity, replacements) {
                tracing::warn!(lump = %lump_name, %error, "skipped replacement");
                report.record_error(error);
            }
        }
    }
    if let Some(insertions) = &mutation.insert {
        if let Err(error) = apply_insert(entity, insertions) {
            tracing::warn!(lump = %lump_name, %error, "skipped insertion");
            report.record_error(error);
        }
    }
}

/// Create a new entity holding every attribute and connection of the rule.
/// Nothing is allocated if a connection is incomplete.
pub(crate) fn apply_add<L: Lump + ?Sized>(lump: &mut L, rule: &AddRule) -> Result<(), ApplyError> {
    let connections = build_all(&rule.insertions.connections)?;
    let entity = lump.create_entity(AllocationKind::External);
    set_all(entity, &rule.insertions.attributes, connections);
    Ok(())
}

pub(crate) fn apply_delete<E: EntityView + ?Sized>(entity: &mut E, deletions: &Deletions) {
    for (key, expected) in &deletions.attributes {
        let matched = entity
            .attribute(key)
            .is_some_and(|actual| expected.matches(&actual, true));
        if matched {
            entity.remove_attribute(key);
        }
    }

    if deletions.connections.is_empty() {
        return;
    }
    if entity.is_queued_for_spawn() {
        tracing::debug!("entity is queued for spawn, keeping its connections");
        return;
    }
    for index in (0..entity.connection_count()).rev() {
        let matched = entity.connection(index).is_some_and(|connection| {
            deletions
                .connections
                .iter()
                .any(|pattern| connection_matches(pattern, &connection))
        });
        if matched && !entity.remove_connection(index) {
            tracing::debug!(index, "host refused connection removal");
        }
    }
}

/// Overwrite attributes and append the replacement connection, if any.
/// Existing connections are never removed.
pub(crate) fn apply_replace<E: EntityView + ?Sized>(
    entity: &mut E,
    replacements: &Replacements,
) -> Result<(), ApplyError> {
    let connection = replacements
        .connection
        .as_ref()
        .map(ConnectionTemplate::build)
        .transpose()?;
    set_all(entity, &replacements.attributes, connection);
    Ok(())
}

pub(crate) fn apply_insert<E: EntityView + ?Sized>(
    entity: &mut E,
    insertions: &Insertions,
) -> Result<(), ApplyError> {
    let connections = build_all(&insertions.connections)?;
    set_all(entity, &insertions.attributes, connections);
    Ok(())
}

fn build_all(templates: &[ConnectionTemplate]) -> Result<Vec<Connection>, ApplyError> {
    templates.iter().map(ConnectionTemplate::build).collect()
}

fn set_all<E: EntityView + ?Sized>(
    entity: &mut E,
    attributes: &[(String, String)],
    connections: impl IntoIterator<Item = Connection>,
) {
    for (key, value) in attributes {
        entity.set_attribute(key, value);
    }
    for connection in connections {
        entity.add_connection(connection);
    }
}

/// Short human-readable identity of an entity for logs.
fn describe<E: EntityView + ?Sized>(entity: &E) -> String {
    let classname = entity.attribute("classname");
    let targetname = entity.attribute("targetname");
    let mut out = classname.as_deref().unwrap_or("<no classname>").to_owned();
    if let Some(name) = targetname {
        out.push_str(" '");
        out.push_str(&name);
        out.push('\'');
    }
    out.push_str(&format!(" ({} connections)", entity.connection_count()));
    out
}

fn summary(value: &impl Serialize) -> String {
    serde_json::to_string(value).unwrap_or_else(|error| format!("<{error}>"))
}
