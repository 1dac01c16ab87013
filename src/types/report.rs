use std::fmt;
use std::time::Duration;

use super::error::ApplyError;

/// Outcome of applying rules to one or more lumps.
///
/// Counts what changed and collects the apply-time errors that aborted
/// individual additions, insertions or replacements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplyReport {
    removed: usize,
    added: usize,
    modified: usize,
    errors: Vec<ApplyError>,
    duration: Duration,
}

impl ApplyReport {
    pub(crate) fn record_removed(&mut self) {
        self.removed += 1;
    }

    pub(crate) fn record_added(&mut self) {
        self.added += 1;
    }

    pub(crate) fn record_modified(&mut self) {
        self.modified += 1;
    }

    pub(crate) fn record_error(&mut self, error: ApplyError) {
        self.errors.push(error);
    }

    pub(crate) fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Fold another report into this one. Durations add up.
    pub(crate) fn merge(&mut self, other: ApplyReport) {
        self.removed += other.removed;
        self.added += other.added;
        self.modified += other.modified;
        self.errors.extend(other.errors);
        self.duration += other.duration;
    }

    /// Entities removed by `remove` rules.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Entities created by `add` rules.
    #[must_use]
    pub fn added(&self) -> usize {
        self.added
    }

    /// Entity matches patched by `modify` rules. An entity matched by two
    /// rules counts twice.
    #[must_use]
    pub fn modified(&self) -> usize {
        self.modified
    }

    #[must_use]
    pub fn errors(&self) -> &[ApplyError] {
        &self.errors
    }

    /// Wall-clock duration of the application.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// True when nothing was removed, added or modified.
    #[must_use]
    pub fn is_unchanged(&self) -> bool {
        self.removed == 0 && self.added == 0 && self.modified == 0
    }
}

impl fmt::Display for ApplyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "removed: {}, added: {}, modified: {}",
            self.removed, self.added, self.modified
        )?;
        if !self.errors.is_empty() {
            write!(f, ", errors: {}", self.errors.len())?;
        }
        write!(f, ", duration: {:?}", self.duration)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counters() {
        let mut report = ApplyReport::default();
        assert!(report.is_unchanged());
        report.record_removed();
        report.record_added();
        report.record_added();
        report.record_modified();
        report.record_error(ApplyError::IncompleteConnection { field: "input" });

        assert_eq!(report.removed(), 1);
        assert_eq!(report.added(), 2);
        assert_eq!(report.modified(), 1);
        assert_eq!(report.errors().len(), 1);
        assert!(!report.is_unchanged());
    }

    #[test]
    fn report_merge_adds_up() {
        let mut a = ApplyReport::default();
        a.record_removed();
        a.set_duration(Duration::from_nanos(100));
        let mut b = ApplyReport::default();
        b.record_removed();
        b.record_modified();
        b.set_duration(Duration::from_nanos(50));

        a.merge(b);
        assert_eq!(a.removed(), 2);
        assert_eq!(a.modified(), 1);
        assert_eq!(a.duration(), Duration::from_nanos(150));
    }

    #[test]
    fn report_display() {
        let mut report = ApplyReport::default();
        report.record_added();
        let s = report.to_string();
        assert!(s.contains("removed: 0, added: 1, modified: 0"));
        assert!(!s.contains("errors"));

        report.record_error(ApplyError::IncompleteConnection { field: "output" });
        assert!(report.to_string().contains("errors: 1"));
    }
}
