use serde::Serialize;

use super::error::ApplyError;
use super::value::RuleValue;

/// Delay used when a rule-created connection does not specify one.
pub const DEFAULT_DELAY: f32 = 0.0;
/// Fire-count limit used when a rule-created connection does not specify one.
/// `-1` means unlimited.
pub const DEFAULT_LIMIT: i32 = -1;

/// How a connection's target selector is resolved by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[repr(i32)]
pub enum TargetType {
    Invalid = -1,
    Classname = 0,
    ClassnameDerivesFrom = 1,
    EntityName = 2,
    ContainsComponent = 3,
    SpecialActivator = 4,
    SpecialCaller = 5,
    EntityHandle = 6,
    #[default]
    EntityNameOrClassName = 7,
}

/// An output-to-input wiring record on an entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Connection {
    pub output: String,
    pub target_type: TargetType,
    pub target: String,
    pub input: String,
    pub param: String,
    pub delay: f32,
    pub limit: i32,
}

impl Connection {
    /// A connection with default delay, unlimited fires and an empty parameter.
    #[must_use]
    pub fn new(output: &str, target: &str, input: &str) -> Self {
        Self {
            output: output.to_owned(),
            target_type: TargetType::EntityNameOrClassName,
            target: target.to_owned(),
            input: input.to_owned(),
            param: String::new(),
            delay: DEFAULT_DELAY,
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_param(mut self, param: &str) -> Self {
        self.param = param.to_owned();
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay;
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: i32) -> Self {
        self.limit = limit;
        self
    }
}

/// A predicate over a single connection. Absent fields impose no constraint,
/// so an empty pattern matches any connection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectionPattern {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<RuleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<RuleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<RuleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<RuleValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl ConnectionPattern {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_none()
            && self.target.is_none()
            && self.input.is_none()
            && self.param.is_none()
            && self.delay.is_none()
            && self.limit.is_none()
    }
}

/// The fields of a connection to be created by an add, insert or replace.
///
/// Completeness is checked when the connection is built, at apply time.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConnectionTemplate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i32>,
}

impl ConnectionTemplate {
    /// Build the connection, resolving targets by entity name or classname.
    ///
    /// # Errors
    ///
    /// Returns [`ApplyError::IncompleteConnection`] if `output`, `input` or
    /// `target` is missing or blank.
    pub fn build(&self) -> Result<Connection, ApplyError> {
        let output = required(self.output.as_deref(), "output")?;
        let input = required(self.input.as_deref(), "input")?;
        let target = required(self.target.as_deref(), "target")?;
        Ok(Connection {
            output: output.to_owned(),
            target_type: TargetType::EntityNameOrClassName,
            target: target.to_owned(),
            input: input.to_owned(),
            param: self.param.clone().unwrap_or_default(),
            delay: self.delay.unwrap_or(DEFAULT_DELAY),
            limit: self.limit.unwrap_or(DEFAULT_LIMIT),
        })
    }
}

fn required<'a>(value: Option<&'a str>, field: &'static str) -> Result<&'a str, ApplyError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApplyError::IncompleteConnection { field }),
    }
}
