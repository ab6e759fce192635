//! The document tree: the format-neutral shape values are mapped to.

// -----------------------------------------------------------------------------
// Modules

mod node;
mod number;
mod ordered_map;
mod serde;

#[cfg(feature = "json")]
pub mod json;

// -----------------------------------------------------------------------------
// Exports

pub use node::{DocumentNode, NodeKind, ObjectMap};
pub use number::Number;
pub use ordered_map::OrderedMap;
