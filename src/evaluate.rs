use crate::types::value::EPSILON;
use crate::{is_wildcard_key, Connection, ConnectionPattern, EntityView, MatchSpec, RuleValue};

/// Whether `entity` satisfies every predicate in `spec`.
///
/// A missing attribute fails the match. Each connection pattern must be
/// satisfied by at least one of the entity's connections.
pub(crate) fn is_match<E: EntityView + ?Sized>(entity: &E, spec: &MatchSpec) -> bool {
    let attributes_match = spec.attributes.iter().all(|(key, expected)| {
        entity
            .attribute(key)
            .is_some_and(|actual| expected.matches(&actual, is_wildcard_key(key)))
    });
    if !attributes_match {
        return false;
    }

    if spec.connections.is_empty() {
        return true;
    }
    let connections: Vec<Connection> = (0..entity.connection_count())
        .filter_map(|i| entity.connection(i))
        .collect();
    spec.connections
        .iter()
        .all(|pattern| connections.iter().any(|c| connection_matches(pattern, c)))
}

/// Compare one connection against a pattern. Output and parameter accept a
/// trailing `*`; target and input must match exactly.
pub(crate) fn connection_matches(pattern: &ConnectionPattern, connection: &Connection) -> bool {
    field_matches(pattern.output.as_ref(), &connection.output, true)
        && field_matches(pattern.target.as_ref(), &connection.target, false)
        && field_matches(pattern.input.as_ref(), &connection.input, false)
        && field_matches(pattern.param.as_ref(), &connection.param, true)
        && pattern
            .delay
            .is_none_or(|delay| (f64::from(delay) - f64::from(connection.delay)).abs() <= EPSILON)
        && pattern.limit.is_none_or(|limit| limit == connection.limit)
}

fn field_matches(expected: Option<&RuleValue>, actual: &str, allow_wildcard: bool) -> bool {
    expected.is_none_or(|value| value.matches(actual, allow_wildcard))
}
