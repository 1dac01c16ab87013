use serde::{Deserialize, Serialize};

/// Runtime toggles for applying rules.
///
/// ```
/// use entstrip::ApplyOptions;
///
/// let options = ApplyOptions::default();
/// assert!(!options.verbose);
/// assert!(options.replace_enabled);
///
/// let quiet = ApplyOptions::default().with_replace(false);
/// assert!(!quiet.replace_enabled);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    /// Log a before/after summary of every change. Never affects results.
    pub verbose: bool,
    /// When off, `replace` blocks inside `modify` rules are skipped.
    pub replace_enabled: bool,
}

impl Default for ApplyOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            replace_enabled: true,
        }
    }
}

impl ApplyOptions {
    #[must_use]
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    #[must_use]
    pub fn with_replace(mut self, enabled: bool) -> Self {
        self.replace_enabled = enabled;
        self
    }
}
