use alloc::format;
use core::any::Any;

use crate::Mapper;
use crate::document::{DocumentNode, ObjectMap};
use crate::error::MapError;
use crate::info::property::{PropertyAccess, Written};
use crate::info::{PropertyDescriptor, PropertyKind, TypeDescriptor};
use crate::mapper::WriteContext;
use crate::value::Emitted;

impl Mapper {
    /// Writes `owner` as its value writer's output, or as an object.
    pub(crate) fn write_body(
        &self,
        owner: &dyn Any,
        descriptor: &TypeDescriptor,
        ctx: &WriteContext<'_>,
    ) -> Result<DocumentNode, MapError> {
        match &descriptor.value_writer {
            Some(write) => write(owner, ctx),
            None => self.write_object(owner, descriptor, ctx).map(DocumentNode::Object),
        }
    }

    /// Writes the properties of `owner` as an object.
    ///
    /// Properties are written in declaration order, the any-bucket's
    /// entries last. A bucket entry never replaces a declared key.
    fn write_object(
        &self,
        owner: &dyn Any,
        descriptor: &TypeDescriptor,
        ctx: &WriteContext<'_>,
    ) -> Result<ObjectMap, MapError> {
        if Any::type_id(owner) != descriptor.type_id {
            return Err(MapError::custom(format!(
                "value is not a `{}`",
                descriptor.type_path
            )));
        }

        let mut object = ObjectMap::with_capacity(descriptor.properties.len());
        for property in descriptor.properties.iter().filter(|p| p.writable) {
            match property.kind {
                PropertyKind::Value => write_value(&mut object, owner, property, ctx)?,
                PropertyKind::Unwrapped { prefix, suffix } => {
                    write_unwrapped(&mut object, owner, property, prefix, suffix, ctx)?;
                }
                PropertyKind::AnyBucket => {}
            }
        }

        if let Some(bucket) = descriptor.any_bucket().filter(|p| p.writable)
            && let PropertyAccess::Bucket(access) = &bucket.access
        {
            for (key, written) in access.entries(owner, ctx)? {
                if descriptor.slots.contains_key(key.as_str()) || object.contains_key(&key) {
                    log::warn!(
                        "`{}`: any-bucket entry \"{key}\" collides with a declared key, skipped",
                        descriptor.type_path
                    );
                    continue;
                }
                let Written { presence, emitted } = written;
                if bucket.include.keeps(presence, &emitted.node, || None) {
                    object.insert(key, emitted.node);
                }
            }
        }

        Ok(object)
    }
}

fn write_value(
    object: &mut ObjectMap,
    owner: &dyn Any,
    property: &PropertyDescriptor,
    ctx: &WriteContext<'_>,
) -> Result<(), MapError> {
    let Some(slot) = property.value_slot() else {
        return Ok(());
    };
    let ctx = ctx.with_discriminator(property.discriminator());
    let written = slot.emit(owner, &ctx).map_err(|e| e.at_key(&property.key))?;
    let Some(Written { presence, emitted }) = written else {
        return Ok(());
    };
    let Emitted { node, sibling } = emitted;
    let node = property.write_shape(node);

    let keep = property.include.keeps(presence, &node, || {
        slot.default_node(&ctx)
            .and_then(Result::ok)
            .map(|default| property.write_shape(default))
    });
    if keep {
        object.insert(property.key.as_str(), node);
        if let Some((key, tag)) = sibling {
            object.insert(key, tag);
        }
    }
    Ok(())
}

fn write_unwrapped(
    object: &mut ObjectMap,
    owner: &dyn Any,
    property: &PropertyDescriptor,
    prefix: &str,
    suffix: &str,
    ctx: &WriteContext<'_>,
) -> Result<(), MapError> {
    let Some(slot) = property.value_slot() else {
        return Ok(());
    };
    let written = slot
        .emit(owner, &ctx.element())
        .map_err(|e| e.spliced(prefix, suffix))?;
    let Some(written) = written else {
        return Ok(());
    };
    match written.emitted.node {
        DocumentNode::Null => {}
        DocumentNode::Object(inner) => {
            for (key, value) in inner {
                object.insert(format!("{prefix}{key}{suffix}"), value);
            }
        }
        other => return Err(MapError::coercion("object", &other)),
    }
    Ok(())
}
