//! Diff event types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::fieldpath::Path;
use crate::value::{to_value, Reflect, Value};

/// Reason tells why a [`DiffEvent`] was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The two values have different types.
    TypeMismatch,
    /// Reserved for sequence length reports; the aligner describes length
    /// changes through element events instead.
    SliceLengthMismatch,
    /// Informational: the two maps hold a different number of entries.
    MapLengthMismatch,
    /// Leaf values differ.
    ValueMismatch,
    /// The left optional slot is empty while the right one is set.
    LeftMissing,
    /// The right optional slot is empty while the left one is set.
    RightMissing,
    /// A left sequence element has no counterpart on the right.
    LeftElementRemoved,
    /// A right sequence element has no counterpart on the left.
    RightElementAdded,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::TypeMismatch => "type mismatch",
            Reason::SliceLengthMismatch => "slice length mismatch",
            Reason::MapLengthMismatch => "map length mismatch",
            Reason::ValueMismatch => "value mismatch",
            Reason::LeftMissing => "left missing",
            Reason::RightMissing => "right missing",
            Reason::LeftElementRemoved => "left element removed",
            Reason::RightElementAdded => "right element added",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// EventValue is one side of a [`DiffEvent`].
///
/// Values normally borrow from the compared inputs. A leaf reached through
/// an optional slot is re-wrapped into that slot's type and owned by the
/// event, so both sides of an event always have the type declared at its
/// path.
pub enum EventValue<'a> {
    /// No value on this side (removed, added or missing).
    Absent,
    Borrowed(&'a dyn Reflect),
    Owned(Box<dyn Reflect>),
}

impl<'a> EventValue<'a> {
    pub fn get(&self) -> Option<&dyn Reflect> {
        match self {
            EventValue::Absent => None,
            EventValue::Borrowed(v) => Some(*v),
            EventValue::Owned(v) => Some(&**v),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, EventValue::Absent)
    }

    /// Returns the value as `T` if that is its concrete type.
    pub fn downcast_ref<T: Reflect>(&self) -> Option<&T> {
        self.get().and_then(|v| v.downcast_ref::<T>())
    }

    /// Converts the value into a [`Value`] document; `Absent` becomes `Null`.
    pub fn to_value(&self) -> Value {
        self.get().map(to_value).unwrap_or_default()
    }
}

impl Clone for EventValue<'_> {
    fn clone(&self) -> Self {
        match self {
            EventValue::Absent => EventValue::Absent,
            EventValue::Borrowed(v) => EventValue::Borrowed(*v),
            EventValue::Owned(v) => EventValue::Owned(v.clone()),
        }
    }
}

impl fmt::Debug for EventValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => write!(f, "{:?}", v),
            None => f.write_str("<absent>"),
        }
    }
}

/// DiffEvent reports one divergence between the compared values.
#[derive(Debug, Clone)]
pub struct DiffEvent<'a> {
    pub path: Path,
    pub reason: Reason,
    pub left: EventValue<'a>,
    pub right: EventValue<'a>,
}

impl<'a> DiffEvent<'a> {
    pub fn new(path: Path, reason: Reason, left: EventValue<'a>, right: EventValue<'a>) -> Self {
        DiffEvent {
            path,
            reason,
            left,
            right,
        }
    }
}

impl fmt::Display for DiffEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {:?} -> {:?}",
            self.path, self.reason, self.left, self.right
        )
    }
}
