//! Field path module - Locations inside the compared value graph.
//!
//! Paths are built while the differ walks two values and are rendered in the
//! `.Field[index].Key` form. The omission rules match event paths against
//! caller supplied patterns.

mod omit;
mod path;

pub use omit::*;
pub use path::*;
