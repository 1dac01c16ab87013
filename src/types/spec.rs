use serde::{Serialize, Serializer};

use super::connection::{ConnectionPattern, ConnectionTemplate};
use super::value::RuleValue;

/// Attribute keys that always accept a trailing `*` wildcard when matching.
pub const WILDCARD_KEYS: [&str; 2] = ["targetname", "classname"];

/// Whether `key` always allows trailing-`*` prefix matching.
#[must_use]
pub fn is_wildcard_key(key: &str) -> bool {
    WILDCARD_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Predicates an entity must satisfy: every attribute must be present and
/// match, and every connection pattern must be satisfied by some connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchSpec {
    #[serde(serialize_with = "attribute_map", skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, RuleValue)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionPattern>,
}

impl MatchSpec {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute predicate.
    #[must_use]
    pub fn attribute(mut self, key: &str, value: impl Into<RuleValue>) -> Self {
        self.attributes.push((key.to_owned(), value.into()));
        self
    }

    /// Add a connection predicate.
    #[must_use]
    pub fn connection(mut self, pattern: ConnectionPattern) -> Self {
        self.connections.push(pattern);
        self
    }

    /// True when the spec has neither attribute nor connection predicates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.connections.is_empty()
    }
}

/// Attributes removed when their current value matches, and connections
/// removed when they satisfy any of the patterns.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Deletions {
    #[serde(serialize_with = "attribute_map", skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, RuleValue)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionPattern>,
}

/// Attributes set unconditionally, plus at most one connection to append.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Replacements {
    #[serde(serialize_with = "attribute_map", skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionTemplate>,
}

/// Attributes set unconditionally, plus connections to append.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insertions {
    #[serde(serialize_with = "attribute_map", skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub connections: Vec<ConnectionTemplate>,
}

impl Insertions {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.connections.is_empty()
    }
}

/// The patch half of a `modify` rule. Applied delete, then replace, then insert.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MutationSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delete: Option<Deletions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<Replacements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insert: Option<Insertions>,
}

fn attribute_map<S, V>(attributes: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    V: Serialize,
{
    serializer.collect_map(attributes.iter().map(|(k, v)| (k, v)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_keys_are_case_insensitive() {
        assert!(is_wildcard_key("targetname"));
        assert!(is_wildcard_key("ClassName"));
        assert!(!is_wildcard_key("model"));
    }

    #[test]
    fn match_spec_builder() {
        let spec = MatchSpec::new()
            .attribute("classname", "info_target")
            .connection(ConnectionPattern::default());
        assert_eq!(spec.attributes.len(), 1);
        assert_eq!(spec.connections.len(), 1);
        assert!(!spec.is_empty());
        assert!(MatchSpec::new().is_empty());
    }

    #[test]
    fn match_spec_serializes_as_map() {
        let spec = MatchSpec::new()
            .attribute("classname", "info_target")
            .attribute("health", 100_i64);
        assert_eq!(
            serde_json::to_string(&spec).unwrap(),
            r#"{"attributes":{"classname":"info_target","health":100}}"#
        );
    }

    #[test]
    fn mutation_spec_skips_absent_parts() {
        let mutation = MutationSpec {
            insert: Some(Insertions {
                attributes: vec![("health".into(), "50".into())],
                connections: vec![],
            }),
            ..MutationSpec::default()
        };
        assert_eq!(
            serde_json::to_string(&mutation).unwrap(),
            r#"{"insert":{"attributes":{"health":"50"}}}"#
        );
    }
}
