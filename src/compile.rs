use serde_json::{Map, Value};

use crate::parse::Sections;
use crate::types::error::preview;
use crate::{
    AddRule, CompileError, ConnectionPattern, ConnectionTemplate, Deletions, FilterRule,
    Insertions, MatchSpec, ModifyRule, MutationSpec, Replacements, Rule, RuleValue,
};

type Object = Map<String, Value>;

/// Turn the raw sections of a rule document into rules, in application
/// order: every removal, then every addition, then every modification.
pub(crate) fn compile_sections(sections: &Sections) -> Result<Vec<Rule>, CompileError> {
    let mut rules = Vec::new();

    for fragment in sections.fragments("remove") {
        for object in objects("remove", fragment)? {
            let matches = match_spec(&object)?;
            if matches.is_empty() {
                tracing::debug!("dropping remove rule without predicates");
                continue;
            }
            rules.push(Rule::Filter(FilterRule { matches }));
        }
    }

    for fragment in sections.fragments("add") {
        for object in objects("add", fragment)? {
            let insertions = insertions(&object)?;
            if insertions.is_empty() {
                tracing::debug!("dropping empty add rule");
                continue;
            }
            rules.push(Rule::Add(AddRule { insertions }));
        }
    }

    for fragment in sections.fragments("modify") {
        for object in objects("modify", fragment)? {
            if let Some(rule) = modify_rule(&object)? {
                rules.push(Rule::Modify(rule));
            }
        }
    }

    Ok(rules)
}

/// A section value is either one object or an array of objects.
fn objects(section: &str, fragment: &str) -> Result<Vec<Object>, CompileError> {
    let value: Value = serde_json::from_str(fragment).map_err(|source| CompileError::InvalidJson {
        preview: preview(fragment),
        source,
    })?;
    match value {
        Value::Object(object) => Ok(vec![object]),
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(object) => Ok(object),
                other => Err(CompileError::InvalidSection {
                    section: section.to_owned(),
                    found: type_name(&other),
                }),
            })
            .collect(),
        other => Err(CompileError::InvalidSection {
            section: section.to_owned(),
            found: type_name(&other),
        }),
    }
}

fn modify_rule(object: &Object) -> Result<Option<ModifyRule>, CompileError> {
    let Some(matches) = member(object, "match") else {
        return Err(CompileError::MissingMatchBlock);
    };
    let matches = match_spec(as_object("match", matches)?)?;
    if matches.is_empty() {
        tracing::debug!("dropping modify rule with an empty match block");
        return Ok(None);
    }

    let delete = member(object, "delete")
        .map(|value| deletions(as_object("delete", value)?))
        .transpose()?;
    let replace = member(object, "replace")
        .map(|value| replacements(as_object("replace", value)?))
        .transpose()?;
    let insert = member(object, "insert")
        .map(|value| insertions(as_object("insert", value)?))
        .transpose()?;

    Ok(Some(ModifyRule {
        matches,
        mutation: MutationSpec {
            delete,
            replace,
            insert,
        },
    }))
}

fn match_spec(object: &Object) -> Result<MatchSpec, CompileError> {
    let mut spec = MatchSpec::new();
    for (key, value) in object {
        if is_connections_key(key) {
            spec.connections
                .extend(connection_list(key, value, pattern)?);
        } else {
            spec.attributes.push((key.clone(), predicate(key, value)?));
        }
    }
    Ok(spec)
}

fn deletions(object: &Object) -> Result<Deletions, CompileError> {
    let spec = match_spec(object)?;
    Ok(Deletions {
        attributes: spec.attributes,
        connections: spec.connections,
    })
}

fn replacements(object: &Object) -> Result<Replacements, CompileError> {
    let mut replace = Replacements::default();
    for (key, value) in object {
        if is_connections_key(key) {
            if replace.connection.is_some() {
                return Err(CompileError::DuplicateReplacement { key: key.clone() });
            }
            replace.connection = Some(template(key, value)?);
        } else {
            replace.attributes.push((key.clone(), assigned_text(value)?));
        }
    }
    Ok(replace)
}

fn insertions(object: &Object) -> Result<Insertions, CompileError> {
    let mut insert = Insertions::default();
    for (key, value) in object {
        if is_connections_key(key) {
            insert
                .connections
                .extend(connection_list(key, value, template)?);
        } else {
            insert.attributes.push((key.clone(), assigned_text(value)?));
        }
    }
    Ok(insert)
}

fn connection_list<T>(
    key: &str,
    value: &Value,
    each: fn(&str, &Value) -> Result<T, CompileError>,
) -> Result<Vec<T>, CompileError> {
    match value {
        Value::Array(items) => items.iter().map(|item| each(key, item)).collect(),
        other => Err(invalid_value(key, "an array of connections", other)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionField {
    Output,
    Target,
    Input,
    Param,
    Delay,
    Limit,
}

/// Resolve a connection key, accepting the legacy long names.
fn connection_field(key: &str) -> Option<ConnectionField> {
    match key.to_ascii_lowercase().as_str() {
        "output" | "outputname" => Some(ConnectionField::Output),
        "target" | "targetname" => Some(ConnectionField::Target),
        "input" | "inputname" => Some(ConnectionField::Input),
        "param" | "overrideparam" => Some(ConnectionField::Param),
        "delay" => Some(ConnectionField::Delay),
        "limit" | "timestofire" => Some(ConnectionField::Limit),
        _ => None,
    }
}

fn pattern(key: &str, value: &Value) -> Result<ConnectionPattern, CompileError> {
    let mut pattern = ConnectionPattern::default();
    for (field_key, field_value) in as_object(key, value)? {
        let Some(field) = connection_field(field_key) else {
            tracing::debug!(key = field_key.as_str(), "ignoring unknown connection field");
            continue;
        };
        match field {
            ConnectionField::Output => {
                pattern.output = Some(RuleValue::from_text(as_str(field_key, field_value)?)?);
            }
            ConnectionField::Target => {
                pattern.target = Some(RuleValue::from_text(as_str(field_key, field_value)?)?);
            }
            ConnectionField::Input => {
                pattern.input = Some(RuleValue::from_text(as_str(field_key, field_value)?)?);
            }
            ConnectionField::Param => {
                pattern.param = Some(RuleValue::from_text(as_str(field_key, field_value)?)?);
            }
            ConnectionField::Delay => pattern.delay = Some(as_delay(field_key, field_value)?),
            ConnectionField::Limit => pattern.limit = Some(as_limit(field_key, field_value)?),
        }
    }
    Ok(pattern)
}

fn template(key: &str, value: &Value) -> Result<ConnectionTemplate, CompileError> {
    let mut template = ConnectionTemplate::default();
    for (field_key, field_value) in as_object(key, value)? {
        let Some(field) = connection_field(field_key) else {
            tracing::debug!(key = field_key.as_str(), "ignoring unknown connection field");
            continue;
        };
        match field {
            ConnectionField::Output => template.output = Some(assigned_text(field_value)?),
            ConnectionField::Target => template.target = Some(assigned_text(field_value)?),
            ConnectionField::Input => template.input = Some(assigned_text(field_value)?),
            ConnectionField::Param => template.param = Some(assigned_text(field_value)?),
            ConnectionField::Delay => template.delay = Some(as_delay(field_key, field_value)?),
            ConnectionField::Limit => template.limit = Some(as_limit(field_key, field_value)?),
        }
    }
    Ok(template)
}

/// A match or delete value. Strings may be `/regex/` patterns.
fn predicate(key: &str, value: &Value) -> Result<RuleValue, CompileError> {
    match value {
        Value::String(text) => RuleValue::from_text(text),
        Value::Number(number) => match (number.as_i64(), number.as_f64()) {
            (Some(integer), _) => Ok(RuleValue::Integer(integer)),
            (None, Some(float)) => Ok(RuleValue::Number(float)),
            (None, None) => Err(invalid_value(key, "a string, number or boolean", value)),
        },
        Value::Bool(flag) => Ok(RuleValue::Boolean(*flag)),
        other => Err(invalid_value(key, "a string, number or boolean", other)),
    }
}

/// An assigned value is always stored as literal text. `/regex/` strings
/// must still compile, so a broken pattern fails the file wherever it sits.
fn assigned_text(value: &Value) -> Result<String, CompileError> {
    match value {
        Value::String(text) => {
            RuleValue::from_text(text)?;
            Ok(text.clone())
        }
        other => Ok(other.to_string()),
    }
}

fn as_str<'v>(key: &str, value: &'v Value) -> Result<&'v str, CompileError> {
    value
        .as_str()
        .ok_or_else(|| invalid_value(key, "a string", value))
}

#[allow(clippy::cast_possible_truncation)]
fn as_delay(key: &str, value: &Value) -> Result<f32, CompileError> {
    value
        .as_f64()
        .map(|delay| delay as f32)
        .ok_or_else(|| invalid_value(key, "a number", value))
}

fn as_limit(key: &str, value: &Value) -> Result<i32, CompileError> {
    value
        .as_i64()
        .and_then(|limit| i32::try_from(limit).ok())
        .ok_or_else(|| invalid_value(key, "a 32-bit integer", value))
}

fn as_object<'v>(key: &str, value: &'v Value) -> Result<&'v Object, CompileError> {
    value
        .as_object()
        .ok_or_else(|| invalid_value(key, "an object", value))
}

/// Case-insensitive member lookup. The first matching key wins.
fn member<'v>(object: &'v Object, key: &str) -> Option<&'v Value> {
    object
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(key))
        .map(|(_, v)| v)
}

fn is_connections_key(key: &str) -> bool {
    key.eq_ignore_ascii_case("connections") || key.eq_ignore_ascii_case("io")
}

fn invalid_value(key: &str, expected: &'static str, found: &Value) -> CompileError {
    CompileError::InvalidValueType {
        key: key.to_owned(),
        expected,
        found: type_name(found),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
