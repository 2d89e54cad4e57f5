//! Identity-based sequence alignment.
//!
//! Elements of two sequences are tagged with an identity, sorted by
//! `(identity, index)` and merge-joined. Elements whose identity appears on
//! only one side become removals or additions. When both groups are
//! non-empty, the first `min(removed, added)` of each are re-paired as
//! modifications. That re-pairing is a presentation heuristic, not a
//! minimal edit script.

use std::cmp::Ordering;

/// Tagged is one sequence element: its original index and identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tagged {
    pub index: usize,
    pub identity: String,
}

impl Tagged {
    pub fn new(index: usize, identity: impl Into<String>) -> Self {
        Tagged {
            index,
            identity: identity.into(),
        }
    }
}

impl Ord for Tagged {
    fn cmp(&self, other: &Self) -> Ordering {
        self.identity
            .cmp(&other.identity)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Tagged {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Alignment is the result of [`align`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    /// Pairs of `(left index, right index)` to compare structurally.
    pub matched: Vec<(usize, usize)>,
    /// Right elements without a left counterpart.
    pub added: Vec<Tagged>,
    /// Left elements without a right counterpart.
    pub removed: Vec<Tagged>,
}

impl Alignment {
    /// Returns true if every element was matched.
    pub fn is_fully_matched(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Tags identities with their position and sorts them for [`align`].
pub fn tag_sorted<I, S>(identities: I) -> Vec<Tagged>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tagged: Vec<Tagged> = identities
        .into_iter()
        .enumerate()
        .map(|(index, identity)| Tagged::new(index, identity))
        .collect();
    tagged.sort();
    tagged
}

/// Aligns two sorted tagged lists.
///
/// Equal identities pair in ascending index order on each side, so the k-th
/// left duplicate meets the k-th right duplicate.
pub fn align(left: Vec<Tagged>, right: Vec<Tagged>) -> Alignment {
    let mut alignment = Alignment::default();
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let order = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => l.identity.cmp(&r.identity),
            _ => break,
        };
        match order {
            Ordering::Less => alignment.removed.extend(left.next()),
            Ordering::Greater => alignment.added.extend(right.next()),
            Ordering::Equal => {
                if let (Some(l), Some(r)) = (left.next(), right.next()) {
                    alignment.matched.push((l.index, r.index));
                }
            }
        }
    }
    alignment.removed.extend(left);
    alignment.added.extend(right);

    let n = alignment.removed.len().min(alignment.added.len());
    if n > 0 {
        let removed = alignment.removed.drain(..n);
        let added = alignment.added.drain(..n);
        alignment
            .matched
            .extend(removed.zip(added).map(|(l, r)| (l.index, r.index)));
    }

    tracing::trace!(
        matched = alignment.matched.len(),
        added = alignment.added.len(),
        removed = alignment.removed.len(),
        "aligned sequences"
    );
    alignment
}
