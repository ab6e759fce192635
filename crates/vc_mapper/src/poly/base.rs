use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec;
use core::any::Any;

use crate::document::{DocumentNode, ObjectMap};
use crate::error::{DiscriminatorError, MapError};
use crate::mapper::{ReadContext, WriteContext};
use crate::poly::{Placement, Subtypes};
use crate::value::{Emitted, MapValue};

// -----------------------------------------------------------------------------
// DynamicType

/// Runtime type access for trait objects.
///
/// Implemented for every `Send + Sync + 'static` type. A polymorphic base
/// trait lists it as a supertrait so that its trait objects can report
/// their concrete type.
pub trait DynamicType: Any + Send + Sync {
    /// Type path of the concrete type behind the reference.
    fn dynamic_type_path(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Send + Sync> DynamicType for T {
    #[inline]
    fn dynamic_type_path(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    #[inline]
    fn as_any(&self) -> &dyn Any {
        self
    }
}

// -----------------------------------------------------------------------------
// PolymorphicBase

/// A trait object type whose values are written with a type tag.
///
/// `Box<dyn Base>` becomes a [`MapValue`] once the trait object type
/// implements this trait.
///
/// # Examples
///
/// ```
/// use vc_mapper::derive::Mapped;
/// use vc_mapper::poly::{DynamicType, PolymorphicBase, Subtypes};
/// use vc_mapper::{Mapper, object};
///
/// trait Shape: DynamicType {}
///
/// #[derive(Mapped, Default)]
/// #[mapped(default)]
/// struct Circle {
///     pub r: u32,
/// }
///
/// impl Shape for Circle {}
///
/// impl PolymorphicBase for dyn Shape {
///     fn subtypes(types: &mut Subtypes<Self>) {
///         types.register_as::<Circle>("circle", |v| Box::new(v));
///     }
/// }
///
/// let mapper = Mapper::new();
/// let shape: Box<dyn Shape> = Box::new(Circle { r: 2 });
/// let node = mapper.write(&shape).unwrap();
/// assert_eq!(node, object! { "@type" => "circle", "r" => 2 });
///
/// let back: Box<dyn Shape> = mapper.read(&node).unwrap();
/// assert_eq!((*back).as_any().downcast_ref::<Circle>().map(|c| c.r), Some(2));
/// ```
pub trait PolymorphicBase: DynamicType {
    fn subtypes(types: &mut Subtypes<Self>);
}

// -----------------------------------------------------------------------------
// Tagged writing

/// Writes `value` tagged as a subtype of `B`.
///
/// With `as_property`, an external tag is returned as a sibling entry
/// instead of falling back to a wrapper array.
pub(crate) fn write_tagged<B: ?Sized + PolymorphicBase>(
    any: &dyn Any,
    type_path: &'static str,
    ctx: &WriteContext<'_>,
    as_property: bool,
) -> Result<Emitted, MapError> {
    let mapper = ctx.mapper();
    let registry = mapper.subtypes::<B>()?;
    let discriminator = ctx.discriminator().unwrap_or(registry.discriminator());

    let entry = registry.entry_of(Any::type_id(any)).ok_or_else(|| {
        DiscriminatorError::UnregisteredSubtype {
            base: registry.base_path(),
            subtype: type_path,
        }
    })?;

    let tag = DocumentNode::from(entry.tag(discriminator.id()));
    let descriptor = entry.descriptor(mapper)?;
    let body = mapper.write_body(any, &descriptor, &ctx.element())?;

    let emitted = match (discriminator.placement(), body) {
        (Placement::Property(key), DocumentNode::Object(mut body)) => {
            body.insert_first(&**key, tag);
            Emitted::new(DocumentNode::Object(body))
        }
        (Placement::ExternalProperty(key), body) if as_property => Emitted {
            node: body,
            sibling: Some((String::from(&**key), tag)),
        },
        (Placement::WrapperObject, body) => {
            let mut wrapper = ObjectMap::with_capacity(1);
            wrapper.insert(entry.tag(discriminator.id()), body);
            Emitted::new(DocumentNode::Object(wrapper))
        }
        // Wrapper arrays, and bodies that cannot carry a tag property.
        (_, body) => Emitted::new(DocumentNode::Sequence(vec![tag, body])),
    };
    Ok(emitted)
}

// -----------------------------------------------------------------------------
// Tagged reading

fn from_array<'n>(
    node: &'n DocumentNode,
    base: &'static str,
) -> Result<(&'n str, Cow<'n, DocumentNode>), MapError> {
    match node.as_sequence() {
        Some([tag, body]) => match tag.as_str() {
            Some(tag) => Ok((tag, Cow::Borrowed(body))),
            None => Err(malformed(base, "a string tag first")),
        },
        _ => Err(malformed(base, "a [tag, value] pair")),
    }
}

fn from_object<'n>(
    node: &'n DocumentNode,
    base: &'static str,
) -> Result<(&'n str, Cow<'n, DocumentNode>), MapError> {
    match node.as_object() {
        Some(object) if object.len() == 1 => match object.first() {
            Some((tag, body)) => Ok((tag, Cow::Borrowed(body))),
            None => Err(malformed(base, "a single-key object")),
        },
        _ => Err(malformed(base, "a single-key object")),
    }
}

fn malformed(base: &'static str, expected: &'static str) -> MapError {
    DiscriminatorError::MalformedWrapper { base, expected }.into()
}

fn tag_in<'n>(object: &'n ObjectMap, key: &str, base: &'static str) -> Result<&'n str, MapError> {
    object.get(key).and_then(DocumentNode::as_str).ok_or_else(|| {
        DiscriminatorError::MissingTag {
            base,
            key: String::from(key),
        }
        .into()
    })
}

pub(crate) fn read_tagged<B: ?Sized + PolymorphicBase>(
    node: &DocumentNode,
    ctx: &ReadContext<'_>,
) -> Result<Box<B>, MapError> {
    let mapper = ctx.mapper();
    let registry = mapper.subtypes::<B>()?;
    let discriminator = ctx.discriminator().unwrap_or(registry.discriminator());
    let base = registry.base_path();

    let (tag, body) = match discriminator.placement() {
        Placement::Property(key) => match node {
            DocumentNode::Object(object) => {
                let tag = tag_in(object, key, base)?;
                let mut rest = object.clone();
                rest.remove(key);
                (tag, Cow::Owned(DocumentNode::Object(rest)))
            }
            DocumentNode::Sequence(_) => from_array(node, base)?,
            _ => return Err(MapError::coercion(base, node)),
        },
        Placement::ExternalProperty(key) => match ctx.parent() {
            Some(parent) => (tag_in(parent, key, base)?, Cow::Borrowed(node)),
            None => from_array(node, base)?,
        },
        Placement::WrapperArray => from_array(node, base)?,
        Placement::WrapperObject => from_object(node, base)?,
    };

    let entry = registry
        .resolve(tag, discriminator.id())
        .ok_or_else(|| DiscriminatorError::UnknownTag {
            base,
            tag: String::from(tag),
        })?;
    let descriptor = entry.descriptor(mapper)?;
    let value = mapper.read_object(&body, &descriptor, &ctx.element())?;
    entry.upcast(value)
}

// -----------------------------------------------------------------------------
// MapValue

impl<B: ?Sized + PolymorphicBase> MapValue for Box<B> {
    fn type_label() -> &'static str {
        core::any::type_name::<B>()
    }

    fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        let value: &B = self;
        let path = DynamicType::dynamic_type_path(value);
        write_tagged::<B>(DynamicType::as_any(value), path, ctx, false).map(|emitted| emitted.node)
    }

    fn to_property(&self, ctx: &WriteContext<'_>) -> Result<Emitted, MapError> {
        let value: &B = self;
        let path = DynamicType::dynamic_type_path(value);
        write_tagged::<B>(DynamicType::as_any(value), path, ctx, true)
    }

    fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        read_tagged::<B>(node, ctx)
    }

    fn external_tag_key(ctx: &ReadContext<'_>) -> Result<Option<String>, MapError> {
        let registry = ctx.mapper().subtypes::<B>()?;
        let discriminator = ctx.discriminator().unwrap_or(registry.discriminator());
        Ok(discriminator.external_key().map(String::from))
    }
}
