use std::borrow::Cow;
use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Serialize, Serializer};

use super::error::CompileError;

/// Absolute tolerance for floating-point comparisons.
pub const EPSILON: f64 = 0.001;

/// A compiled predicate or assignment value from a rule file.
///
/// Produced once at compile time; never re-parsed while matching.
#[derive(Debug, Clone)]
pub enum RuleValue {
    /// Compared case-insensitively, or as a prefix when wildcards are allowed
    /// and the literal ends with `*`.
    Literal(String),
    /// Source text of the form `/…/`, compiled case-insensitively.
    Pattern(Regex),
    /// Compared within [`EPSILON`].
    Number(f64),
    /// Compared exactly.
    Integer(i64),
    Boolean(bool),
}

impl RuleValue {
    /// Compile a rule-file string. Text of at least three characters that
    /// starts and ends with `/` becomes a case-insensitive [`RuleValue::Pattern`];
    /// anything else is a [`RuleValue::Literal`].
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::RegexCompile`] if the pattern is not a valid regex.
    pub fn from_text(text: &str) -> Result<Self, CompileError> {
        if text.len() >= 3 && text.starts_with('/') && text.ends_with('/') {
            let inner = &text[1..text.len() - 1];
            let regex = RegexBuilder::new(inner)
                .case_insensitive(true)
                .build()
                .map_err(|source| CompileError::RegexCompile {
                    source_text: text.to_owned(),
                    source,
                })?;
            tracing::debug!(pattern = inner, "registered regex");
            Ok(RuleValue::Pattern(regex))
        } else {
            Ok(RuleValue::Literal(text.to_owned()))
        }
    }

    /// Test an entity's current attribute text against this value.
    #[must_use]
    pub fn matches(&self, actual: &str, allow_wildcard: bool) -> bool {
        match self {
            RuleValue::Literal(expected) => match_text(actual, expected, allow_wildcard),
            RuleValue::Pattern(regex) => regex.is_match(actual),
            RuleValue::Number(expected) => actual
                .trim()
                .parse::<f64>()
                .is_ok_and(|v| (v - expected).abs() <= EPSILON),
            RuleValue::Integer(expected) => {
                actual.trim().parse::<i64>().is_ok_and(|v| v == *expected)
            }
            RuleValue::Boolean(expected) => match actual.trim() {
                t if t.eq_ignore_ascii_case("true") || t == "1" => *expected,
                f if f.eq_ignore_ascii_case("false") || f == "0" => !*expected,
                _ => false,
            },
        }
    }

    /// Canonical text form, as stored on an entity.
    #[must_use]
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            RuleValue::Literal(s) => Cow::Borrowed(s),
            RuleValue::Pattern(regex) => Cow::Owned(format!("/{}/", regex.as_str())),
            RuleValue::Number(v) => Cow::Owned(v.to_string()),
            RuleValue::Integer(v) => Cow::Owned(v.to_string()),
            RuleValue::Boolean(v) => Cow::Borrowed(if *v { "true" } else { "false" }),
        }
    }
}

/// Case-insensitive equality, or case-insensitive prefix match when
/// `allow_wildcard` is set and `expected` ends with `*`.
#[must_use]
pub fn match_text(actual: &str, expected: &str, allow_wildcard: bool) -> bool {
    if allow_wildcard {
        if let Some(prefix) = expected.strip_suffix('*') {
            return starts_with_ignore_case(actual, prefix);
        }
    }
    eq_ignore_case(actual, expected)
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    if a.is_ascii() && b.is_ascii() {
        a.eq_ignore_ascii_case(b)
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    if value.is_ascii() && prefix.is_ascii() {
        value.len() >= prefix.len() && value[..prefix.len()].eq_ignore_ascii_case(prefix)
    } else {
        value.to_lowercase().starts_with(&prefix.to_lowercase())
    }
}

impl PartialEq for RuleValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (RuleValue::Literal(a), RuleValue::Literal(b)) => a == b,
            (RuleValue::Pattern(a), RuleValue::Pattern(b)) => a.as_str() == b.as_str(),
            (RuleValue::Number(a), RuleValue::Number(b)) => a == b,
            (RuleValue::Integer(a), RuleValue::Integer(b)) => a == b,
            (RuleValue::Boolean(a), RuleValue::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for RuleValue {
    fn from(v: &str) -> Self {
        RuleValue::Literal(v.to_owned())
    }
}

impl From<i64> for RuleValue {
    fn from(v: i64) -> Self {
        RuleValue::Integer(v)
    }
}

impl From<f64> for RuleValue {
    fn from(v: f64) -> Self {
        RuleValue::Number(v)
    }
}

impl From<bool> for RuleValue {
    fn from(v: bool) -> Self {
        RuleValue::Boolean(v)
    }
}

impl Serialize for RuleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            RuleValue::Number(v) => serializer.serialize_f64(*v),
            RuleValue::Integer(v) => serializer.serialize_i64(*v),
            RuleValue::Boolean(v) => serializer.serialize_bool(*v),
            RuleValue::Literal(_) | RuleValue::Pattern(_) => serializer.serialize_str(&self.as_text()),
        }
    }
}

impl fmt::Display for RuleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleValue::Literal(v) => write!(f, "\"{v}\""),
            other => write!(f, "{}", other.as_text()),
        }
    }
}
