//! Diff module - Structural comparison of two values.
//!
//! The [`Differ`] walks two values in lock-step by shape, consults its
//! comparator and identity overrides, aligns sequences by element identity
//! and reports each divergence as a [`DiffEvent`]. A [`Patch`] collects the
//! events of one comparison.

mod align;
mod config;
mod defaults;
mod error;
mod event;
mod identity;
mod patch;
mod registry;
mod traverse;


#[cfg(test)]
mod misc_test;

pub use align::{align, tag_sorted, Alignment, Tagged};
pub use config::*;
pub use defaults::primitive_identity;
pub use error::*;
pub use event::*;
pub use identity::{IdAccessor, ZERO_IDENTITY};
pub use patch::*;
pub use registry::{compare_value, Differ};
