use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::TypeId;

use vc_utils::hash::HashMap;

use crate::construct::{ConstructorKind, ConstructorSpec, CreatorArg};
use crate::error::MapError;
use crate::info::builder::ErasedValueWriter;
use crate::info::{Include, PropertyDescriptor, PropertyKind};
use crate::mapper::ReadContext;

// -----------------------------------------------------------------------------
// KeySlot

/// What an input key is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum KeySlot {
    /// A value property, by index.
    Property(usize),
    /// A key of the unwrapped property at the index, under its own name.
    Unwrapped(usize, String),
    /// Consumed by the creator only.
    Creator,
    /// Skipped silently.
    Ignored,
}

/// Where an external tag key found in the input goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TagRoute {
    /// Read by a property of this type from its parent object.
    Own,
    /// Handed to the unwrapped property at the index, under its own name.
    Unwrapped(usize, String),
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The resolved mapping of a type.
///
/// Built once per type by [`Mapper::describe`] and immutable afterwards.
///
/// [`Mapper::describe`]: crate::Mapper::describe
pub struct TypeDescriptor {
    pub(crate) type_id: TypeId,
    pub(crate) type_path: &'static str,
    pub(crate) alias: Option<&'static str>,
    pub(crate) properties: Box<[PropertyDescriptor]>,
    pub(crate) slots: HashMap<String, KeySlot>,
    pub(crate) any_bucket: Option<usize>,
    pub(crate) constructor: ConstructorSpec,
    pub(crate) include: Include,
    pub(crate) ignore_unknown: Option<bool>,
    pub(crate) value_writer: Option<ErasedValueWriter>,
}

impl TypeDescriptor {
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    #[inline]
    pub fn type_path(&self) -> &'static str {
        self.type_path
    }

    /// The type path without module path and generics.
    #[inline]
    pub fn short_name(&self) -> &'static str {
        crate::poly::registry::short_name(self.type_path)
    }

    /// The subtype name declared with `type_name`.
    #[inline]
    pub fn alias(&self) -> Option<&'static str> {
        self.alias
    }

    /// Properties in declaration order.
    #[inline]
    pub fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }

    /// A property by internal name.
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|property| property.name == name)
    }

    /// The property reading an external key.
    ///
    /// Keys spliced in by unwrapped properties resolve to the unwrapped
    /// property itself.
    pub fn property_by_key(&self, key: &str) -> Option<&PropertyDescriptor> {
        match self.slots.get(key)? {
            KeySlot::Property(index) | KeySlot::Unwrapped(index, _) => Some(&self.properties[*index]),
            KeySlot::Creator => self
                .constructor
                .args()
                .iter()
                .find(|arg| arg.key == key)
                .and_then(|arg| arg.property)
                .map(|index| &self.properties[index]),
            KeySlot::Ignored => None,
        }
    }

    /// Whether the type is written as a single value instead of an object.
    #[inline]
    pub fn writes_single_value(&self) -> bool {
        self.value_writer.is_some()
    }

    /// The any-bucket property.
    #[inline]
    pub fn any_bucket(&self) -> Option<&PropertyDescriptor> {
        self.any_bucket.map(|index| &self.properties[index])
    }

    #[inline]
    pub fn constructor(&self) -> ConstructorKind {
        self.constructor.kind()
    }

    /// Arguments of a multi-argument creator, in declaration order.
    #[inline]
    pub fn creator_args(&self) -> &[CreatorArg] {
        self.constructor.args()
    }

    /// Inclusion policy for properties without their own.
    #[inline]
    pub fn default_include(&self) -> Include {
        self.include
    }

    /// Type-level unknown-key handling, if declared.
    #[inline]
    pub fn ignore_unknown(&self) -> Option<bool> {
        self.ignore_unknown
    }

    /// External tag keys written next to this type's properties.
    ///
    /// Found at read time: the discriminator of a polymorphic property
    /// lives in its base's registry.
    pub(crate) fn tag_keys(&self, ctx: &ReadContext<'_>) -> Result<Vec<(String, TagRoute)>, MapError> {
        let mut keys = Vec::new();
        for (index, property) in self.properties.iter().enumerate() {
            match property.kind {
                PropertyKind::Value => {
                    if let Some(slot) = property.value_slot() {
                        let ctx = ctx.with_discriminator(property.discriminator());
                        if let Some(key) = slot.external_tag_key(&ctx)? {
                            keys.push((key, TagRoute::Own));
                        }
                    }
                }
                PropertyKind::Unwrapped { prefix, suffix } => {
                    if let Some(child) = &property.unwrapped {
                        for (key, _) in child.tag_keys(ctx)? {
                            let outer = format!("{prefix}{key}{suffix}");
                            keys.push((outer, TagRoute::Unwrapped(index, key)));
                        }
                    }
                }
                PropertyKind::AnyBucket => {}
            }
        }
        Ok(keys)
    }
}

impl core::fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("type_path", &self.type_path)
            .field("alias", &self.alias)
            .field("properties", &self.properties)
            .field("constructor", &self.constructor)
            .field("include", &self.include)
            .field("ignore_unknown", &self.ignore_unknown)
            .field("writes_single_value", &self.writes_single_value())
            .finish_non_exhaustive()
    }
}
