//! The mapping engine.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod config;
mod context;
mod read;
mod write;

// -----------------------------------------------------------------------------
// Exports

pub use config::MapperConfig;
pub use context::{ReadContext, ReadOptions, WriteContext};

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use crate::Mapped;
use crate::document::DocumentNode;
use crate::error::{MapError, SchemaError};
use crate::info::TypeDescriptor;
use crate::info::introspect::build_descriptor;
use crate::poly::base::{read_tagged, write_tagged};
use crate::poly::{DynamicType, PolymorphicBase, SubtypeRegistry};
use crate::value::MapValue;

use cache::TypeCache;

// -----------------------------------------------------------------------------
// Mapper

static SHARED: Mapper = Mapper::new();

/// Writes values to document trees and reads them back.
///
/// A mapper owns the descriptors of the types it has seen, built on first
/// use with its [`MapperConfig`]. Mappers with different configurations
/// keep separate descriptors.
///
/// # Examples
///
/// ```
/// use vc_mapper::derive::Mapped;
/// use vc_mapper::{Mapper, object};
///
/// #[derive(Mapped, Default, Debug, PartialEq)]
/// #[mapped(default)]
/// pub struct Point {
///     pub x: i32,
///     pub y: i32,
/// }
///
/// let mapper = Mapper::new();
/// let node = mapper.write(&Point { x: 1, y: 2 }).unwrap();
/// assert_eq!(node, object! { "x" => 1, "y" => 2 });
/// assert_eq!(mapper.read::<Point>(&node).unwrap(), Point { x: 1, y: 2 });
/// ```
pub struct Mapper {
    config: MapperConfig,
    descriptors: TypeCache<Arc<TypeDescriptor>>,
    registries: TypeCache<Arc<dyn Any + Send + Sync>>,
}

impl Mapper {
    #[inline]
    pub const fn new() -> Self {
        Self::with_config(MapperConfig::DEFAULT)
    }

    #[inline]
    pub const fn with_config(config: MapperConfig) -> Self {
        Self {
            config,
            descriptors: TypeCache::new(),
            registries: TypeCache::new(),
        }
    }

    /// The process-wide mapper, with the default configuration.
    #[inline]
    pub fn shared() -> &'static Mapper {
        &SHARED
    }

    #[inline]
    pub const fn config(&self) -> &MapperConfig {
        &self.config
    }

    #[inline]
    pub(crate) const fn write_context(&self) -> WriteContext<'_> {
        WriteContext::new(self)
    }

    #[inline]
    pub(crate) const fn read_context(&self) -> ReadContext<'_> {
        ReadContext::new(self, ReadOptions { ignore_unknown: None })
    }

    /// The descriptor of `T`, built on first use.
    ///
    /// Failures are cached: every later call returns the same error.
    pub fn describe<T: Mapped>(&self) -> Result<Arc<TypeDescriptor>, SchemaError> {
        let type_path = core::any::type_name::<T>();
        self.descriptors.get_or_build(TypeId::of::<T>(), type_path, || {
            build_descriptor::<T>(self).map(Arc::new)
        })
    }

    /// The subtypes of the polymorphic base `B`, built on first use.
    pub fn subtypes<B: ?Sized + PolymorphicBase>(
        &self,
    ) -> Result<Arc<SubtypeRegistry<B>>, SchemaError> {
        let type_path = core::any::type_name::<B>();
        let erased = self.registries.get_or_build(TypeId::of::<B>(), type_path, || {
            let registry = SubtypeRegistry::<B>::build(self)?;
            Ok(Arc::new(registry) as Arc<dyn Any + Send + Sync>)
        })?;
        match erased.downcast::<SubtypeRegistry<B>>() {
            Ok(registry) => Ok(registry),
            Err(_) => SubtypeRegistry::<B>::build(self).map(Arc::new),
        }
    }

    // -------------------------------------------------------------------------
    // Writing

    pub fn write<V: MapValue>(&self, value: &V) -> Result<DocumentNode, MapError> {
        value.to_node(&self.write_context())
    }

    /// Writes an erased value with an explicit descriptor.
    pub fn write_described(
        &self,
        value: &dyn Any,
        descriptor: &TypeDescriptor,
    ) -> Result<DocumentNode, MapError> {
        self.write_body(value, descriptor, &self.write_context())
    }

    /// Writes `value` tagged as a subtype of `B`.
    ///
    /// For call sites that only hold an erased value. An external tag
    /// falls back to a wrapper array.
    pub fn write_as<B: ?Sized + PolymorphicBase>(
        &self,
        value: &dyn DynamicType,
    ) -> Result<DocumentNode, MapError> {
        let ctx = self.write_context();
        write_tagged::<B>(value.as_any(), value.dynamic_type_path(), &ctx, false)
            .map(|emitted| emitted.node)
    }

    /// Writes a sequence whose elements are tagged as subtypes of `B`.
    pub fn write_seq_as<'v, B: ?Sized + PolymorphicBase>(
        &self,
        values: impl IntoIterator<Item = &'v dyn DynamicType>,
    ) -> Result<DocumentNode, MapError> {
        let ctx = self.write_context();
        values
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                write_tagged::<B>(value.as_any(), value.dynamic_type_path(), &ctx, false)
                    .map(|emitted| emitted.node)
                    .map_err(|e| e.at_index(index))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentNode::Sequence)
    }

    // -------------------------------------------------------------------------
    // Reading

    pub fn read<V: MapValue>(&self, node: &DocumentNode) -> Result<V, MapError> {
        V::from_node(node, &self.read_context())
    }

    /// Reads an erased value with an explicit descriptor.
    pub fn read_described(
        &self,
        node: &DocumentNode,
        descriptor: &TypeDescriptor,
    ) -> Result<Box<dyn Any + Send + Sync>, MapError> {
        self.read_object(node, descriptor, &self.read_context())
    }

    /// Reads a value tagged as a subtype of `B`.
    pub fn read_as<B: ?Sized + PolymorphicBase>(
        &self,
        node: &DocumentNode,
    ) -> Result<Box<B>, MapError> {
        read_tagged::<B>(node, &self.read_context())
    }

    /// Reading with per-call options.
    #[inline]
    pub fn reader(&self) -> Reader<'_> {
        Reader {
            mapper: self,
            options: ReadOptions::default(),
        }
    }

    // -------------------------------------------------------------------------
    // Text

    /// Writes `value` as compact JSON text.
    #[cfg(feature = "json")]
    pub fn to_json_string<V: MapValue>(&self, value: &V) -> Result<String, MapError> {
        crate::document::json::to_string(&self.write(value)?)
    }

    /// Reads a `V` from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json_str<V: MapValue>(&self, text: &str) -> Result<V, MapError> {
        self.read(&crate::document::json::from_str(text)?)
    }
}

impl Default for Mapper {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for Mapper {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Mapper")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Reader

/// Reads with options that apply to one call.
///
/// ```
/// use vc_mapper::derive::Mapped;
/// use vc_mapper::{MapError, Mapper, object};
///
/// #[derive(Mapped, Default)]
/// #[mapped(default)]
/// pub struct Small {
///     pub a: i32,
/// }
///
/// let node = object! { "a" => 1, "b" => 2 };
/// let mapper = Mapper::new();
///
/// let err = mapper.read::<Small>(&node).err().unwrap();
/// assert!(matches!(err, MapError::UnknownKey { ref key, .. } if key == "b"));
///
/// let small: Small = mapper.reader().ignore_unknown(true).read(&node).unwrap();
/// assert_eq!(small.a, 1);
/// ```
#[derive(Clone, Copy)]
pub struct Reader<'m> {
    mapper: &'m Mapper,
    options: ReadOptions,
}

impl Reader<'_> {
    /// Skips unknown keys instead of failing, unless the type decides
    /// otherwise.
    #[inline]
    pub const fn ignore_unknown(mut self, ignore: bool) -> Self {
        self.options.ignore_unknown = Some(ignore);
        self
    }

    pub fn read<V: MapValue>(&self, node: &DocumentNode) -> Result<V, MapError> {
        V::from_node(node, &ReadContext::new(self.mapper, self.options))
    }

    /// Reads a `V` from JSON text.
    #[cfg(feature = "json")]
    pub fn from_json_str<V: MapValue>(&self, text: &str) -> Result<V, MapError> {
        self.read(&crate::document::json::from_str(text)?)
    }
}
