/// Section names that are stored under another name.
const SECTION_ALIASES: [(&str, &str); 1] = [("filter", "remove")];

fn canonical_section(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    SECTION_ALIASES
        .iter()
        .find(|(alias, _)| *alias == key)
        .map_or(key, |(_, canonical)| (*canonical).to_owned())
}

/// The top-level sections of a rule document.
///
/// Maps each depth-1 key (compared case-insensitively, `filter` folded into
/// `remove`) to the raw text of every value assigned to it, in source order.
/// Repeated keys accumulate instead of overwriting each other.
#[derive(Debug, Clone, Default)]
pub struct Sections {
    entries: Vec<(String, Vec<String>)>,
}

impl Sections {
    pub(crate) fn push(&mut self, key: &str, fragment: &str) {
        let key = canonical_section(key);
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, fragments)) => fragments.push(fragment.to_owned()),
            None => self.entries.push((key, vec![fragment.to_owned()])),
        }
    }

    /// Raw fragments captured for `key`, or an empty slice.
    #[must_use]
    pub fn fragments(&self, key: &str) -> &[String] {
        let key = canonical_section(key);
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(&[][..], |(_, fragments)| fragments.as_slice())
    }

    /// Canonical keys in order of first appearance.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
