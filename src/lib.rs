//! # Reflect Diff
//!
//! Structural deep comparison of in-memory values.
//!
//! Two values of the same type are walked in lock-step and every leaf-level
//! divergence is reported as a typed [`DiffEvent`]. Sequences are aligned by
//! element identity rather than position, so reordered collections produce
//! meaningful events. Comparison and identity behavior can be overridden per
//! type, per path and type, or per primitive kind.
//!
//! ## Modules
//!
//! - [`schema`] - Static type descriptors and primitive kinds
//! - [`value`] - The [`Reflect`] facility and the dynamic [`Value`] document model
//! - [`fieldpath`] - Paths into the compared values and omission rules
//! - [`diff`] - The differ, its events and patches
//!
//! ```
//! use reflect_diff::{reflect_struct, Differ, Reason};
//!
//! #[derive(Debug, Clone)]
//! struct User {
//!     id: u32,
//!     name: String,
//! }
//!
//! reflect_struct!(User { id as "ID", name as "Name" });
//!
//! let left = vec![User { id: 1, name: "ann".into() }, User { id: 2, name: "bob".into() }];
//! let right = vec![User { id: 2, name: "bo".into() }];
//!
//! let differ = Differ::new();
//! let patch = differ.make_patch(&left, &right);
//! let events: Vec<_> = patch.iter().map(|e| (e.path.to_string(), e.reason)).collect();
//! assert_eq!(
//!     events,
//!     vec![
//!         (".[0]".to_string(), Reason::LeftElementRemoved),
//!         (".[1].Name".to_string(), Reason::ValueMismatch),
//!     ]
//! );
//! ```

pub mod diff;
pub mod fieldpath;
pub mod schema;
pub mod value;

pub use diff::{
    compare_value, ConfigError, DiffConfig, DiffEvent, Differ, EventValue, Patch, PatchRow, Reason,
};
pub use fieldpath::{OmitRules, Path, PathElement};
pub use schema::{Kind, TypeInfo};
pub use value::{to_value, Primitive, Reflect, Shape, Value};

#[doc(hidden)]
pub mod __private {
    pub use once_cell::sync::OnceCell;
}
