//! Values that can be written to and read from a document tree.

// -----------------------------------------------------------------------------
// Modules

mod codec;
mod collections;
mod maybe;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use codec::{Codec, RawCodec};
pub use collections::MapLike;
pub use maybe::Maybe;

use alloc::string::String;
use alloc::sync::Arc;

use crate::Mapper;
use crate::document::DocumentNode;
use crate::error::{MapError, SchemaError};
use crate::info::{Presence, TypeDescriptor};
use crate::mapper::{ReadContext, WriteContext};

// -----------------------------------------------------------------------------
// MapValue

/// A value with a document representation.
///
/// Implemented for scalars, strings, `Option`, [`Maybe`], `Vec`, string
/// keyed maps, [`DocumentNode`] and boxed polymorphic values. Structs get
/// it from `#[derive(Mapped)]`.
///
/// Only [`to_node`](MapValue::to_node) and
/// [`from_node`](MapValue::from_node) are required. The other methods
/// feed inclusion policies, creators and polymorphism, and have
/// defaults suited to plain values.
pub trait MapValue: Sized + Send + Sync + 'static {
    /// Set by `#[mapped(ignore_type)]`: properties of this type are dropped.
    const IGNORED_TYPE: bool = false;

    /// Name used in coercion errors.
    fn type_label() -> &'static str {
        core::any::type_name::<Self>()
    }

    fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError>;

    fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError>;

    /// How the value is present, for inclusion policies.
    fn presence(&self) -> Presence {
        Presence::Present
    }

    /// The value compared against by [`Include::NonDefault`].
    ///
    /// [`Include::NonDefault`]: crate::info::Include::NonDefault
    fn default_value() -> Option<Self> {
        None
    }

    /// Stand-in for an optional creator argument missing from the input.
    fn missing_value() -> Option<Self> {
        None
    }

    /// Writes the value as a property of an object.
    ///
    /// Differs from [`to_node`](MapValue::to_node) only for values that
    /// also emit a sibling key, such as an externally tagged subtype.
    fn to_property(&self, ctx: &WriteContext<'_>) -> Result<Emitted, MapError> {
        self.to_node(ctx).map(Emitted::new)
    }

    /// The sibling key this value reads its type tag from, if any.
    fn external_tag_key(_ctx: &ReadContext<'_>) -> Result<Option<String>, MapError> {
        Ok(None)
    }

    /// The descriptor of a mapped struct, `None` for every other value.
    fn descriptor(_mapper: &Mapper) -> Option<Result<Arc<TypeDescriptor>, SchemaError>> {
        None
    }
}

// -----------------------------------------------------------------------------
// Emitted

/// A written property value and the sibling entry it brings along.
#[derive(Debug, Clone, PartialEq)]
pub struct Emitted {
    pub node: DocumentNode,
    pub sibling: Option<(String, DocumentNode)>,
}

impl Emitted {
    #[inline]
    pub const fn new(node: DocumentNode) -> Self {
        Self {
            node,
            sibling: None,
        }
    }
}
