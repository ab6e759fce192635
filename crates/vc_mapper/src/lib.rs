#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Code generated by the derive names this crate `vc_mapper`, which has to
// resolve inside the crate too.
extern crate self as vc_mapper;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

pub mod construct;
pub mod document;
pub mod error;
pub mod info;
pub mod mapper;
pub mod poly;
pub mod value;

#[doc(hidden)]
pub mod __macro_exports;

// -----------------------------------------------------------------------------
// Exports

pub use document::DocumentNode;
pub use error::{DiscriminatorError, KeyPath, MapError, SchemaError};
pub use mapper::{Mapper, MapperConfig, Reader};
pub use value::MapValue;

#[cfg(feature = "json")]
pub use document::json;

/// `#[derive(Mapped)]`.
pub use vc_mapper_derive as derive;

// -----------------------------------------------------------------------------
// Mapped

/// A struct mapped to an object through declared properties.
///
/// Usually derived: `#[derive(Mapped)]` implements both this trait and
/// [`MapValue`]. A hand-written implementation pairs with
/// [`impl_map_value!`].
pub trait Mapped: MapValue {
    /// Declares the properties, creators and type-level settings of `Self`.
    fn describe(builder: &mut info::DescriptorBuilder<Self>);
}

/// Implements [`MapValue`] for a type implementing [`Mapped`] by hand.
///
/// ```
/// use vc_mapper::info::{DescriptorBuilder, Visibility};
/// use vc_mapper::{Mapped, Mapper, object};
///
/// #[derive(Default)]
/// struct Tag {
///     name: String,
/// }
///
/// impl Mapped for Tag {
///     fn describe(builder: &mut DescriptorBuilder<Self>) {
///         builder.default_constructor(Tag::default);
///         builder
///             .field("name", Visibility::Private, |t| &t.name, |t| &mut t.name)
///             .explicit();
///     }
/// }
/// vc_mapper::impl_map_value!(Tag);
///
/// let tag: Tag = Mapper::new().read(&object! { "name" => "rust" }).unwrap();
/// assert_eq!(tag.name, "rust");
/// ```
#[macro_export]
macro_rules! impl_map_value {
    ($ty:ty) => {
        impl $crate::MapValue for $ty {
            fn to_node(
                &self,
                ctx: &$crate::mapper::WriteContext<'_>,
            ) -> ::core::result::Result<$crate::DocumentNode, $crate::MapError> {
                $crate::__macro_exports::write_mapped(self, ctx)
            }

            fn from_node(
                node: &$crate::DocumentNode,
                ctx: &$crate::mapper::ReadContext<'_>,
            ) -> ::core::result::Result<Self, $crate::MapError> {
                $crate::__macro_exports::read_mapped(node, ctx)
            }

            fn descriptor(
                mapper: &$crate::Mapper,
            ) -> ::core::option::Option<
                ::core::result::Result<
                    $crate::__macro_exports::Arc<$crate::info::TypeDescriptor>,
                    $crate::SchemaError,
                >,
            > {
                ::core::option::Option::Some(mapper.describe::<Self>())
            }
        }
    };
}

#[cfg(test)]
mod tests;
