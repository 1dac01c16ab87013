use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use walkdir::WalkDir;

use super::entity::{Lump, DEFAULT_LUMP};
use super::options::ApplyOptions;
use super::report::ApplyReport;
use super::rule_file::RuleFile;
use crate::EntstripError;

/// Rules applied to every lump of every level.
pub const GLOBAL_FILE: &str = "global.jsonc";
/// Rules applied to a level's default-entity lump.
pub const GLOBAL_DEFAULT_FILE: &str = "global_default.jsonc";
/// Directory holding one subtree of rule files per level.
pub const MAPS_DIR: &str = "maps";
/// Extension of rule files inside a level subtree.
pub const RULE_EXTENSION: &str = "jsonc";

/// Rule files for one level, organised by scope.
///
/// Created empty; [`load`](RuleSet::load) fills every scope from the rule
/// directory and [`purge`](RuleSet::purge) empties it again. A failed load
/// leaves the previous contents untouched.
///
/// # Example
///
/// ```
/// use entstrip::memory::{MemoryEntity, MemoryLump};
/// use entstrip::{ApplyOptions, RuleFile, RuleSet};
///
/// let mut rules = RuleSet::new("/srv/rules");
/// rules.set_global(RuleFile::from_jsonc(r#"{"remove": {"classname": "npc_*"}}"#).unwrap());
/// assert!(rules.has_rules());
///
/// let mut lumps = vec![MemoryLump::new("default_ents")
///     .with_entity(MemoryEntity::new().with("classname", "npc_zombie"))];
/// let report = rules.apply_world("c1m1", "c1m1", &mut lumps, ApplyOptions::default());
/// assert_eq!(report.removed(), 1);
///
/// rules.purge();
/// assert!(!rules.has_rules());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    root: PathBuf,
    scopes: Scopes,
}

#[derive(Debug, Clone, Default)]
struct Scopes {
    global: Option<RuleFile>,
    global_default: Option<RuleFile>,
    /// Keyed by lowercased `"<world>::<lump>"`.
    lumps: HashMap<String, RuleFile>,
}

impl Scopes {
    fn is_empty(&self) -> bool {
        self.global.as_ref().is_none_or(RuleFile::is_empty)
            && self.global_default.as_ref().is_none_or(RuleFile::is_empty)
            && self.lumps.values().all(RuleFile::is_empty)
    }
}

impl RuleSet {
    /// An empty rule set reading from `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            scopes: Scopes::default(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Replace every scope with the rule files for `level`.
    ///
    /// # Errors
    ///
    /// Returns the first [`EntstripError`] met while walking, reading or
    /// compiling. The rule set is then left exactly as it was.
    pub fn load(&mut self, level: &str) -> Result<(), EntstripError> {
        let started = Instant::now();
        let scopes = self.read_scopes(level)?;
        tracing::info!(
            level,
            global = scopes.global.is_some(),
            global_default = scopes.global_default.is_some(),
            lumps = scopes.lumps.len(),
            elapsed = ?started.elapsed(),
            "loaded rules"
        );
        self.scopes = scopes;
        Ok(())
    }

    fn read_scopes(&self, level: &str) -> Result<Scopes, EntstripError> {
        let mut scopes = Scopes {
            global: read_optional(&self.root.join(GLOBAL_FILE))?,
            global_default: read_optional(&self.root.join(GLOBAL_DEFAULT_FILE))?,
            lumps: HashMap::new(),
        };

        let level_dir = self.root.join(MAPS_DIR).join(level);
        if !level_dir.is_dir() {
            tracing::debug!(path = %level_dir.display(), "no rule directory for level");
            return Ok(scopes);
        }

        for entry in WalkDir::new(&level_dir).sort_by_file_name() {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !has_rule_extension(path) {
                continue;
            }
            let Some(lump) = path.file_stem().and_then(|stem| stem.to_str()) else {
                tracing::debug!(path = %path.display(), "skipping rule file with a non-UTF-8 name");
                continue;
            };
            let world = world_name(&level_dir, path, level);
            let file = RuleFile::from_file(path)?;
            if scopes.lumps.insert(scope_key(&world, lump), file).is_some() {
                tracing::warn!(world = %world, lump, path = %path.display(), "rule file replaces an earlier one");
            }
        }
        Ok(scopes)
    }

    /// Drop every loaded rule. Safe to call repeatedly.
    pub fn purge(&mut self) {
        self.scopes = Scopes::default();
    }

    /// Whether any scope holds at least one rule.
    #[must_use]
    pub fn has_rules(&self) -> bool {
        !self.scopes.is_empty()
    }

    #[must_use]
    pub fn global(&self) -> Option<&RuleFile> {
        self.scopes.global.as_ref()
    }

    #[must_use]
    pub fn global_default(&self) -> Option<&RuleFile> {
        self.scopes.global_default.as_ref()
    }

    /// The lump-specific rules for `world`'s `lump`, ignoring case.
    #[must_use]
    pub fn lump_rules(&self, world: &str, lump: &str) -> Option<&RuleFile> {
        self.scopes.lumps.get(&scope_key(world, lump))
    }

    pub fn set_global(&mut self, file: RuleFile) {
        self.scopes.global = Some(file);
    }

    pub fn set_global_default(&mut self, file: RuleFile) {
        self.scopes.global_default = Some(file);
    }

    /// Install `file` as the rules for `world`'s `lump`, returning the rules
    /// it displaces.
    pub fn insert_lump(&mut self, world: &str, lump: &str, file: RuleFile) -> Option<RuleFile> {
        self.scopes.lumps.insert(scope_key(world, lump), file)
    }

    /// The rule files that apply to one lump, in application order: the
    /// lump's own rules, then global, then global-default (default lump of
    /// the level's main world only).
    pub fn scope_chain(&self, level: &str, world: &str, lump: &str) -> Vec<&RuleFile> {
        let mut chain = Vec::with_capacity(3);
        chain.extend(self.lump_rules(world, lump));
        chain.extend(self.scopes.global.as_ref());
        if world.eq_ignore_ascii_case(level) && lump.eq_ignore_ascii_case(DEFAULT_LUMP) {
            chain.extend(self.scopes.global_default.as_ref());
        }
        chain
    }

    /// Apply every relevant scope to one lump of `world`.
    pub fn apply_lump<L: Lump + ?Sized>(
        &self,
        level: &str,
        world: &str,
        lump: &mut L,
        options: ApplyOptions,
    ) -> ApplyReport {
        let name = lump.name().to_owned();
        let mut report = ApplyReport::default();
        for file in self.scope_chain(level, world, &name) {
            report.merge(file.apply(lump, options));
        }
        if !report.is_unchanged() || !report.errors().is_empty() {
            tracing::debug!(level, world, lump = %name, %report, "applied rules");
        }
        report
    }

    /// Apply the rules to every lump of a freshly built world.
    pub fn apply_world<'a, L, I>(
        &self,
        level: &str,
        world: &str,
        lumps: I,
        options: ApplyOptions,
    ) -> ApplyReport
    where
        L: Lump + 'a,
        I: IntoIterator<Item = &'a mut L>,
    {
        let mut report = ApplyReport::default();
        for lump in lumps {
            report.merge(self.apply_lump(level, world, lump, options));
        }
        report
    }
}

fn read_optional(path: &Path) -> Result<Option<RuleFile>, EntstripError> {
    if path.is_file() {
        RuleFile::from_file(path).map(Some)
    } else {
        Ok(None)
    }
}

fn has_rule_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(RULE_EXTENSION))
}

/// Relative directory of `path` under `level_dir`, or the level name for
/// files directly inside it.
fn world_name(level_dir: &Path, path: &Path, level: &str) -> String {
    let relative = path
        .parent()
        .and_then(|parent| parent.strip_prefix(level_dir).ok())
        .map(|dir| {
            dir.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default();
    if relative.is_empty() {
        level.to_owned()
    } else {
        relative
    }
}

fn scope_key(world: &str, lump: &str) -> String {
    format!("{world}::{lump}").to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(text: &str) -> RuleFile {
        RuleFile::from_jsonc(text).unwrap()
    }

    #[test]
    fn scope_keys_ignore_case() {
        let mut rules = RuleSet::default();
        assert!(rules
            .insert_lump("C1M1", "Default_Ents", file(r#"{"remove": {"a": "b"}}"#))
            .is_none());
        assert!(rules.lump_rules("c1m1", "default_ents").is_some());
        assert!(rules.lump_rules("c1m2", "default_ents").is_none());
    }

    #[test]
    fn empty_files_do_not_count_as_rules() {
        let mut rules = RuleSet::default();
        rules.set_global(RuleFile::default());
        assert!(!rules.has_rules());
        rules.set_global_default(file(r#"{"add": {"classname": "a"}}"#));
        assert!(rules.has_rules());
    }

    #[test]
    fn scope_chain_order() {
        let lump_file = file(r#"{"remove": {"lump": "1"}}"#);
        let global = file(r#"{"remove": {"global": "1"}}"#);
        let global_default = file(r#"{"remove": {"default": "1"}}"#);

        let mut rules = RuleSet::default();
        rules.insert_lump("c1m1", "default_ents", lump_file.clone());
        rules.set_global(global.clone());
        rules.set_global_default(global_default.clone());

        assert_eq!(
            rules.scope_chain("c1m1", "C1M1", "DEFAULT_ENTS"),
            [&lump_file, &global, &global_default]
        );
        assert_eq!(rules.scope_chain("c1m1", "c1m1/sub", "default_ents"), [&global]);
        assert_eq!(rules.scope_chain("c1m1", "c1m1", "other"), [&global]);
    }

    #[test]
    fn world_name_from_relative_dir() {
        let level_dir = Path::new("/rules/maps/c1m1");
        assert_eq!(
            world_name(level_dir, &level_dir.join("default_ents.jsonc"), "c1m1"),
            "c1m1"
        );
        assert_eq!(
            world_name(level_dir, &level_dir.join("a/b/lights.jsonc"), "c1m1"),
            "a/b"
        );
    }

    #[test]
    fn purge_is_idempotent() {
        let mut rules = RuleSet::new("/nowhere");
        rules.purge();
        rules.purge();
        assert!(!rules.has_rules());
        assert!(rules.global().is_none());
    }
}
