//! Polymorphic values: trait objects written with a type tag.

// -----------------------------------------------------------------------------
// Modules

pub(crate) mod base;
mod discriminator;
pub(crate) mod registry;

// -----------------------------------------------------------------------------
// Exports

pub use base::{DynamicType, PolymorphicBase};
pub use discriminator::{Discriminator, Placement, TagId};
pub use registry::{SubtypeEntry, SubtypeRegistry, Subtypes};
