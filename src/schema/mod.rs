//! Schema module describes the static shape of reflected types.
//!
//! Every type that takes part in a comparison exposes a [`TypeInfo`]: a stable
//! type identifier, a readable name and a [`ShapeInfo`] telling the traversal
//! engine how to walk values of that type.

mod elements;

pub use elements::*;
