//! Mapping declarations and the descriptors resolved from them.
//!
//! A type declares its properties through a [`DescriptorBuilder`], either by
//! hand or through `#[derive(Mapped)]`. The first use of the type resolves
//! those declarations against the mapper's configuration into a
//! [`TypeDescriptor`]: visibility thresholds, ignore rules, naming and
//! inclusion policies are all settled there, once.

// -----------------------------------------------------------------------------
// Modules

pub(crate) mod builder;
pub(crate) mod descriptor;
pub(crate) mod introspect;
pub(crate) mod naming;
pub(crate) mod property;

mod include;
mod visibility;

// -----------------------------------------------------------------------------
// Exports

pub use builder::{BucketBuilder, DescriptorBuilder, PropertyBuilder};
pub use descriptor::TypeDescriptor;
pub use include::{Include, Presence};
pub use naming::NamingStrategy;
pub use property::{PropertyDescriptor, PropertyKind};
pub use visibility::{MinVisibility, Visibility, VisibilityRules};
