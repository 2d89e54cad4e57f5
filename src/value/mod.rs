//! Value module - Reflection over in-memory values.
//!
//! [`Reflect`] gives the differ a structural view of arbitrary values, and
//! [`Value`] is the dynamic JSON/YAML document model, itself reflected as a
//! union type.

mod convert;
mod impls;
mod reflect;
mod value;

pub use convert::*;
pub use reflect::*;
pub use value::*;
