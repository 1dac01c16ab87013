mod connection;
mod entity;
pub(crate) mod error;
mod options;
mod report;
mod rule;
mod rule_file;
mod ruleset;
mod spec;
pub(crate) mod value;

pub use connection::{
    Connection, ConnectionPattern, ConnectionTemplate, TargetType, DEFAULT_DELAY, DEFAULT_LIMIT,
};
pub use entity::{AllocationKind, EntityView, Lump, DEFAULT_LUMP};
pub use error::{ApplyError, CompileError};
pub use options::ApplyOptions;
pub use report::ApplyReport;
pub use rule::{AddRule, FilterRule, ModifyRule, Rule, RuleKind};
pub use rule_file::RuleFile;
pub use ruleset::{RuleSet, GLOBAL_DEFAULT_FILE, GLOBAL_FILE, MAPS_DIR, RULE_EXTENSION};
pub use spec::{
    is_wildcard_key, Deletions, Insertions, MatchSpec, MutationSpec, Replacements, WILDCARD_KEYS,
};
pub use value::{match_text, RuleValue, EPSILON};
