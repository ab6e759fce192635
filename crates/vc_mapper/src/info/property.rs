use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;
use core::any::Any;
use core::marker::PhantomData;

use crate::Mapper;
use crate::document::DocumentNode;
use crate::error::{MapError, SchemaError};
use crate::info::{Include, Presence, TypeDescriptor};
use crate::mapper::{ReadContext, WriteContext};
use crate::poly::Discriminator;
use crate::value::{Codec, Emitted, MapLike, MapValue};

// -----------------------------------------------------------------------------
// PropertyKind

/// How a property maps onto document keys.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PropertyKind {
    /// One key, one value.
    Value,
    /// The value's own keys are spliced into the parent object.
    Unwrapped {
        prefix: &'static str,
        suffix: &'static str,
    },
    /// Catches unknown keys on read, spreads its entries on write.
    AnyBucket,
}

// -----------------------------------------------------------------------------
// Erased accessors

pub(crate) struct Written {
    pub presence: Presence,
    pub emitted: Emitted,
}

/// Type-erased access to one property of an owner type.
pub(crate) trait ValueSlot: Send + Sync {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn has_getter(&self) -> bool;

    fn has_setter(&self) -> bool;

    /// `None` when there is no getter.
    fn emit(&self, owner: &dyn Any, ctx: &WriteContext<'_>) -> Result<Option<Written>, MapError>;

    fn has_default(&self) -> bool;

    fn default_node(&self, ctx: &WriteContext<'_>) -> Option<Result<DocumentNode, MapError>>;

    fn decode(
        &self,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<Box<dyn Any + Send>, MapError>;

    fn assign(
        &self,
        owner: &mut dyn Any,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<(), MapError>;

    fn external_tag_key(&self, ctx: &ReadContext<'_>) -> Result<Option<String>, MapError>;

    fn value_descriptor(&self, mapper: &Mapper) -> Option<Result<Arc<TypeDescriptor>, SchemaError>>;

    fn value_ignored(&self) -> bool;
}

/// Type-erased access to an any-bucket.
pub(crate) trait BucketSlot: Send + Sync {
    fn entries(
        &self,
        owner: &dyn Any,
        ctx: &WriteContext<'_>,
    ) -> Result<Vec<(String, Written)>, MapError>;

    fn insert(
        &self,
        owner: &mut dyn Any,
        key: &str,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<(), MapError>;
}

pub(crate) enum PropertyAccess {
    Value(Box<dyn ValueSlot>),
    Bucket(Box<dyn BucketSlot>),
}

fn owner_ref<T: Any>(owner: &dyn Any) -> Result<&T, MapError> {
    owner.downcast_ref::<T>().ok_or_else(|| owner_mismatch::<T>())
}

fn owner_mut<T: Any>(owner: &mut dyn Any) -> Result<&mut T, MapError> {
    owner.downcast_mut::<T>().ok_or_else(|| owner_mismatch::<T>())
}

fn owner_mismatch<T>() -> MapError {
    MapError::custom(alloc::format!(
        "accessor of `{}` applied to another type",
        core::any::type_name::<T>()
    ))
}

pub(crate) enum Getter<T, V> {
    Field(fn(&T) -> &V),
    Computed(fn(&T) -> V),
}

pub(crate) enum Setter<T, V> {
    Field(fn(&mut T) -> &mut V),
    Method(fn(&mut T, V)),
}

/// Accessors of a value property, typed until erased behind [`ValueSlot`].
pub(crate) struct Accessors<T, V: MapValue> {
    pub getter: Option<Getter<T, V>>,
    pub setter: Option<Setter<T, V>>,
    pub codec: Option<Box<dyn Codec<V>>>,
}

impl<T, V: MapValue> Accessors<T, V> {
    pub const fn new() -> Self {
        Self {
            getter: None,
            setter: None,
            codec: None,
        }
    }

    fn write(&self, value: &V, ctx: &WriteContext<'_>) -> Result<Written, MapError> {
        let emitted = match &self.codec {
            Some(codec) => Emitted::new(codec.encode(value, ctx)?),
            None => value.to_property(ctx)?,
        };
        Ok(Written {
            presence: value.presence(),
            emitted,
        })
    }

    fn read(&self, node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<V, MapError> {
        match &self.codec {
            Some(codec) => codec.decode(node, ctx),
            None => V::from_node(node, ctx),
        }
    }
}

impl<T: Any + Send + Sync, V: MapValue> ValueSlot for Accessors<T, V> {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    fn emit(&self, owner: &dyn Any, ctx: &WriteContext<'_>) -> Result<Option<Written>, MapError> {
        let owner = owner_ref::<T>(owner)?;
        match &self.getter {
            Some(Getter::Field(get)) => self.write(get(owner), ctx).map(Some),
            Some(Getter::Computed(get)) => self.write(&get(owner), ctx).map(Some),
            None => Ok(None),
        }
    }

    fn has_default(&self) -> bool {
        V::default_value().is_some()
    }

    fn default_node(&self, ctx: &WriteContext<'_>) -> Option<Result<DocumentNode, MapError>> {
        let value = V::default_value()?;
        Some(self.write(&value, ctx).map(|written| written.emitted.node))
    }

    fn decode(
        &self,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<Box<dyn Any + Send>, MapError> {
        let value = self.read(node, ctx)?;
        Ok(Box::new(value))
    }

    fn assign(
        &self,
        owner: &mut dyn Any,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<(), MapError> {
        let Some(setter) = &self.setter else {
            return Ok(());
        };
        let value = self.read(node, ctx)?;
        let owner = owner_mut::<T>(owner)?;
        match setter {
            Setter::Field(get_mut) => *get_mut(owner) = value,
            Setter::Method(set) => set(owner, value),
        }
        Ok(())
    }

    fn external_tag_key(&self, ctx: &ReadContext<'_>) -> Result<Option<String>, MapError> {
        V::external_tag_key(ctx)
    }

    fn value_descriptor(&self, mapper: &Mapper) -> Option<Result<Arc<TypeDescriptor>, SchemaError>> {
        V::descriptor(mapper)
    }

    fn value_ignored(&self) -> bool {
        V::IGNORED_TYPE
    }
}

pub(crate) struct Bucket<T, M> {
    pub get: fn(&T) -> &M,
    pub get_mut: fn(&mut T) -> &mut M,
}

impl<T: Any + Send + Sync, M: MapLike> BucketSlot for Bucket<T, M> {
    fn entries(
        &self,
        owner: &dyn Any,
        ctx: &WriteContext<'_>,
    ) -> Result<Vec<(String, Written)>, MapError> {
        let map = (self.get)(owner_ref::<T>(owner)?);
        let ctx = ctx.element();
        map.map_entries()
            .into_iter()
            .map(|(key, value)| {
                let node = value.to_node(&ctx).map_err(|e| e.at_key(key))?;
                let written = Written {
                    presence: value.presence(),
                    emitted: Emitted::new(node),
                };
                Ok((String::from(key), written))
            })
            .collect()
    }

    fn insert(
        &self,
        owner: &mut dyn Any,
        key: &str,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<(), MapError> {
        let value = M::Value::from_node(node, ctx)?;
        (self.get_mut)(owner_mut::<T>(owner)?).insert_entry(String::from(key), value);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// PropertyDescriptor

/// A resolved property of a [`TypeDescriptor`].
pub struct PropertyDescriptor {
    pub(crate) name: &'static str,
    pub(crate) key: String,
    pub(crate) kind: PropertyKind,
    pub(crate) readable: bool,
    pub(crate) writable: bool,
    pub(crate) include: Include,
    pub(crate) non_default_degraded: bool,
    pub(crate) raw: bool,
    pub(crate) codec: bool,
    pub(crate) discriminator: Option<Discriminator>,
    pub(crate) accept_single_value: bool,
    pub(crate) unwrap_single_array: bool,
    pub(crate) unwrapped: Option<Arc<TypeDescriptor>>,
    pub(crate) access: PropertyAccess,
}

impl PropertyDescriptor {
    /// The internal name, as declared.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The external key. Empty for unwrapped properties and any-buckets.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Whether reading assigns this property.
    #[inline]
    pub fn is_readable(&self) -> bool {
        self.readable
    }

    /// Whether writing emits this property.
    #[inline]
    pub fn is_writable(&self) -> bool {
        self.writable
    }

    /// The effective inclusion policy.
    #[inline]
    pub fn include(&self) -> Include {
        self.include
    }

    /// `NonDefault` applies, but the value type has no default.
    #[inline]
    pub fn non_default_degraded(&self) -> bool {
        self.non_default_degraded
    }

    #[inline]
    pub fn is_raw(&self) -> bool {
        self.raw
    }

    #[inline]
    pub fn has_codec(&self) -> bool {
        self.codec
    }

    /// A discriminator override for a polymorphic value.
    #[inline]
    pub fn discriminator(&self) -> Option<&Discriminator> {
        self.discriminator.as_ref()
    }

    /// A lone value is read as a one-element sequence.
    #[inline]
    pub fn accepts_single_value(&self) -> bool {
        self.accept_single_value
    }

    /// A one-element sequence is written as its element.
    #[inline]
    pub fn unwraps_single_array(&self) -> bool {
        self.unwrap_single_array
    }

    /// The descriptor spliced in by an unwrapped property.
    #[inline]
    pub fn unwrapped_descriptor(&self) -> Option<&TypeDescriptor> {
        self.unwrapped.as_deref()
    }

    pub(crate) fn value_slot(&self) -> Option<&dyn ValueSlot> {
        match &self.access {
            PropertyAccess::Value(slot) => Some(&**slot),
            PropertyAccess::Bucket(_) => None,
        }
    }

    /// The input as this property reads it.
    pub(crate) fn read_shape<'n>(&self, node: &'n DocumentNode) -> Cow<'n, DocumentNode> {
        match node {
            DocumentNode::Sequence(_) | DocumentNode::Null => Cow::Borrowed(node),
            single if self.accept_single_value => {
                Cow::Owned(DocumentNode::Sequence(vec![single.clone()]))
            }
            _ => Cow::Borrowed(node),
        }
    }

    /// The output as this property writes it.
    pub(crate) fn write_shape(&self, node: DocumentNode) -> DocumentNode {
        match node {
            DocumentNode::Sequence(mut items) if self.unwrap_single_array && items.len() == 1 => {
                items.swap_remove(0)
            }
            other => other,
        }
    }

    /// Reads a node the way this property would, for a creator argument.
    pub(crate) fn decode_as<V: MapValue>(
        &self,
        node: &DocumentNode,
        ctx: &ReadContext<'_>,
    ) -> Result<V, MapError> {
        let shaped = self.read_shape(node);
        let node = &*shaped;
        match self.value_slot() {
            Some(slot) => match slot.decode(node, ctx)?.downcast::<V>() {
                Ok(value) => Ok(*value),
                Err(_) => V::from_node(node, ctx),
            },
            None => V::from_node(node, ctx),
        }
    }
}

impl core::fmt::Debug for PropertyDescriptor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PropertyDescriptor")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("kind", &self.kind)
            .field("readable", &self.readable)
            .field("writable", &self.writable)
            .field("include", &self.include)
            .field("accept_single_value", &self.accept_single_value)
            .field("unwrap_single_array", &self.unwrap_single_array)
            .finish_non_exhaustive()
    }
}

/// Marker tying a property builder to its owner and value types.
pub(crate) type Typed<T, V> = PhantomData<fn() -> (T, V)>;
