//! Path omission rules.

use std::collections::{BTreeSet, HashSet};

use super::path::Path;

/// Suffix that turns an omission pattern into a prefix pattern.
pub const WILDCARD_SUFFIX: &str = ".*";

/// Returns true if `pattern` omits a whole subtree.
pub fn is_prefix_pattern(pattern: &str) -> bool {
    pattern.ends_with(WILDCARD_SUFFIX)
}

/// OmitRules decides which event paths are hidden from the caller.
///
/// Patterns come in three forms:
/// - absolute paths such as `.Spec.Name` or `.Items[*].Id`
/// - bare step names such as `Name`, matched against the last step
/// - prefixes such as `.Status.*`, matched against the wildcard form
#[derive(Debug, Clone, Default)]
pub struct OmitRules {
    exact: HashSet<String>,
    last_steps: HashSet<String>,
    prefixes: BTreeSet<String>,
}

impl OmitRules {
    pub fn new() -> Self {
        OmitRules::default()
    }

    /// Registers one pattern.
    pub fn add(&mut self, pattern: impl AsRef<str>) {
        let pattern = pattern.as_ref();
        if is_prefix_pattern(pattern) {
            let prefix = &pattern[..pattern.len() - WILDCARD_SUFFIX.len()];
            self.prefixes.insert(prefix.to_string());
        } else if pattern.starts_with('.') {
            self.exact.insert(pattern.to_string());
        } else {
            self.last_steps.insert(pattern.to_string());
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.last_steps.is_empty() && self.prefixes.is_empty()
    }

    /// Returns true if events at `path` must not reach the caller.
    pub fn is_omitted(&self, path: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        if !self.exact.is_empty() && self.exact.contains(&path.to_string()) {
            return true;
        }
        if !self.last_steps.is_empty() && self.last_steps.contains(&path.last_segment()) {
            return true;
        }
        let wildcard = path.wildcard();
        if self.exact.contains(&wildcard) {
            return true;
        }
        self.prefixes
            .iter()
            .any(|prefix| has_step_prefix(&wildcard, prefix))
    }
}

impl<S: AsRef<str>> Extend<S> for OmitRules {
    fn extend<T: IntoIterator<Item = S>>(&mut self, iter: T) {
        for pattern in iter {
            self.add(pattern);
        }
    }
}

/// Prefix match that only succeeds on a step boundary.
fn has_step_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('.') || rest.starts_with('['),
        None => false,
    }
}
