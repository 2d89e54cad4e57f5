//! Collected diff results.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::event::{DiffEvent, Reason};
use crate::value::Value;

/// Patch holds every event of one comparison, in emission order.
///
/// An empty patch means the two values are equal under the configured
/// comparators and omission rules.
#[derive(Debug, Clone, Default)]
pub struct Patch<'a> {
    events: Vec<DiffEvent<'a>>,
}

/// PatchRow is the serializable form of one event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchRow {
    pub path: String,
    pub reason: Reason,
    pub left: Value,
    pub right: Value,
}

impl<'a> Patch<'a> {
    pub fn new() -> Self {
        Patch { events: Vec::new() }
    }

    pub fn push(&mut self, event: DiffEvent<'a>) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if no event was recorded.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DiffEvent<'a>> {
        self.events.iter()
    }

    pub fn events(&self) -> &[DiffEvent<'a>] {
        &self.events
    }

    pub fn into_events(self) -> Vec<DiffEvent<'a>> {
        self.events
    }

    /// Returns the events with the given reason.
    pub fn with_reason(&self, reason: Reason) -> impl Iterator<Item = &DiffEvent<'a>> {
        self.events.iter().filter(move |e| e.reason == reason)
    }

    /// Converts every event into a serializable row.
    pub fn rows(&self) -> Vec<PatchRow> {
        self.events
            .iter()
            .map(|e| PatchRow {
                path: e.path.to_string(),
                reason: e.reason,
                left: e.left.to_value(),
                right: e.right.to_value(),
            })
            .collect()
    }

    /// Serializes the patch rows to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.rows())
    }

    /// Serializes the patch rows to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.rows())
    }
}

impl<'a> IntoIterator for Patch<'a> {
    type Item = DiffEvent<'a>;
    type IntoIter = std::vec::IntoIter<DiffEvent<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.into_iter()
    }
}

impl<'a> Extend<DiffEvent<'a>> for Patch<'a> {
    fn extend<T: IntoIterator<Item = DiffEvent<'a>>>(&mut self, iter: T) {
        self.events.extend(iter);
    }
}

impl fmt::Display for Patch<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for event in &self.events {
            if !first {
                writeln!(f)?;
            }
            first = false;
            write!(f, "- {} {}:", event.reason, event.path)?;
            write!(f, "\n  left:  {:?}", event.left)?;
            write!(f, "\n  right: {:?}", event.right)?;
        }
        Ok(())
    }
}
