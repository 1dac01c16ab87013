use std::fmt;

use serde::Serialize;

use super::spec::{Insertions, MatchSpec, MutationSpec};

/// Creates one new entity per application; never matches anything.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AddRule {
    pub insertions: Insertions,
}

/// Removes every entity satisfying `matches`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterRule {
    pub matches: MatchSpec,
}

/// Patches every entity satisfying `matches`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ModifyRule {
    pub matches: MatchSpec,
    #[serde(flatten)]
    pub mutation: MutationSpec,
}

/// One compiled instruction from a rule file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Add(AddRule),
    Filter(FilterRule),
    Modify(ModifyRule),
}

/// The kind of a [`Rule`], as named in rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Add,
    Filter,
    Modify,
}

impl Rule {
    #[must_use]
    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::Add(_) => RuleKind::Add,
            Rule::Filter(_) => RuleKind::Filter,
            Rule::Modify(_) => RuleKind::Modify,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Add => write!(f, "add"),
            RuleKind::Filter => write!(f, "remove"),
            RuleKind::Modify => write!(f, "modify"),
        }
    }
}
