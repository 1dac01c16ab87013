mod apply;
mod compile;
mod error;
mod evaluate;
pub mod memory;
pub mod parse;
mod types;

pub use error::EntstripError;
pub use types::{
    is_wildcard_key, match_text, AddRule, AllocationKind, ApplyError, ApplyOptions, ApplyReport,
    CompileError, Connection, ConnectionPattern, ConnectionTemplate, Deletions, EntityView,
    FilterRule, Insertions, Lump, MatchSpec, ModifyRule, MutationSpec, Replacements, Rule,
    RuleFile, RuleKind, RuleSet, RuleValue, TargetType, DEFAULT_DELAY, DEFAULT_LIMIT, DEFAULT_LUMP,
    EPSILON, GLOBAL_DEFAULT_FILE, GLOBAL_FILE, MAPS_DIR, RULE_EXTENSION, WILDCARD_KEYS,
};
