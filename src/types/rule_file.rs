use std::path::Path;

use super::entity::Lump;
use super::options::ApplyOptions;
use super::report::ApplyReport;
use super::rule::{Rule, RuleKind};

/// The compiled rules of one rule file, in application order.
///
/// # Example
///
/// ```
/// use entstrip::memory::{MemoryEntity, MemoryLump};
/// use entstrip::{ApplyOptions, RuleFile};
///
/// let file = RuleFile::from_jsonc(r#"{
///     // drop every ammo pickup
///     "remove": {"classname": "item_ammo_*"},
/// }"#)
/// .unwrap();
///
/// let mut lump = MemoryLump::new("default_ents")
///     .with_entity(MemoryEntity::new().with("classname", "item_ammo_pistol"))
///     .with_entity(MemoryEntity::new().with("classname", "weapon_pistol"));
///
/// let report = file.apply(&mut lump, ApplyOptions::default());
/// assert_eq!(report.removed(), 1);
/// assert_eq!(lump.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleFile {
    rules: Vec<Rule>,
}

impl RuleFile {
    /// Wrap already-compiled rules. They are reordered (stably) into
    /// removals, additions and modifications.
    #[must_use]
    pub fn new(mut rules: Vec<Rule>) -> Self {
        rules.sort_by_key(|rule| match rule.kind() {
            RuleKind::Filter => 0,
            RuleKind::Add => 1,
            RuleKind::Modify => 2,
        });
        Self { rules }
    }

    /// Parse and compile a rule document.
    ///
    /// # Errors
    ///
    /// Returns [`EntstripError`](crate::EntstripError) on parse or compile
    /// failure. Nothing of the document is kept in that case.
    pub fn from_jsonc(input: &str) -> Result<Self, crate::EntstripError> {
        let sections = crate::parse::parse_document(input)?;
        let rules = crate::compile::compile_sections(&sections)?;
        Ok(Self { rules })
    }

    /// Read a rule file and compile it.
    ///
    /// # Errors
    ///
    /// Returns [`EntstripError::File`](crate::EntstripError::File) naming
    /// `path` on I/O, parse, or compile failure.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, crate::EntstripError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path)
            .map_err(|e| crate::EntstripError::from(e).in_file(path))?;
        let file = Self::from_jsonc(&input).map_err(|e| e.in_file(path))?;
        tracing::debug!(path = %path.display(), rules = file.len(), "compiled rule file");
        Ok(file)
    }

    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule to `lump`.
    pub fn apply<L: Lump + ?Sized>(&self, lump: &mut L, options: ApplyOptions) -> ApplyReport {
        crate::apply::apply_rules(lump, &self.rules, options)
    }
}
