use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;

use crate::Mapper;
use crate::construct::ConstructorSpec;
use crate::document::{DocumentNode, ObjectMap};
use crate::error::MapError;
use crate::info::{PropertyDescriptor, PropertyKind, TypeDescriptor};
use crate::info::descriptor::{KeySlot, TagRoute};
use crate::info::property::PropertyAccess;
use crate::mapper::ReadContext;

/// Input keys sorted by destination.
#[derive(Default)]
struct Classified<'n> {
    values: Vec<(usize, &'n str, &'n DocumentNode)>,
    unwrapped: Vec<(usize, ObjectMap)>,
    extras: Vec<(&'n str, &'n DocumentNode)>,
}

impl Classified<'_> {
    fn route_unwrapped(&mut self, index: usize, key: &str, node: &DocumentNode) {
        let position = match self.unwrapped.iter().position(|(i, _)| *i == index) {
            Some(position) => position,
            None => {
                self.unwrapped.push((index, ObjectMap::new()));
                self.unwrapped.len() - 1
            }
        };
        self.unwrapped[position].1.insert(key, node.clone());
    }
}

impl Mapper {
    /// Reads an instance of the type described by `descriptor`.
    ///
    /// Every key is classified before the instance is constructed, so a
    /// failure never leaves a partly populated value behind.
    pub(crate) fn read_object(
        &self,
        node: &DocumentNode,
        descriptor: &TypeDescriptor,
        ctx: &ReadContext<'_>,
    ) -> Result<Box<dyn Any + Send + Sync>, MapError> {
        if let ConstructorSpec::Delegating(delegate) = &descriptor.constructor {
            return delegate(node, &ctx.element());
        }
        let Some(object) = node.as_object() else {
            return Err(MapError::coercion(descriptor.type_path, node));
        };

        let input = classify(self, object, descriptor, ctx)?;
        let mut instance = descriptor.constructor.instantiate(object, descriptor, ctx)?;

        for (index, key, value) in input.values {
            let property = &descriptor.properties[index];
            if let Some(slot) = property.value_slot() {
                let ctx = ctx.property(object, property.discriminator());
                slot.assign(&mut *instance, &property.read_shape(value), &ctx)
                    .map_err(|e| e.at_key(key))?;
            }
        }

        for (index, inner) in input.unwrapped {
            let property = &descriptor.properties[index];
            if let Some(slot) = property.value_slot() {
                let inner = DocumentNode::Object(inner);
                slot.assign(&mut *instance, &inner, &ctx.element())
                    .map_err(|e| splice_error(e, property))?;
            }
        }

        if let Some(bucket) = descriptor.any_bucket()
            && let PropertyAccess::Bucket(access) = &bucket.access
        {
            let element = ctx.element();
            for (key, value) in input.extras {
                access
                    .insert(&mut *instance, key, value, &element)
                    .map_err(|e| e.at_key(key))?;
            }
        }

        Ok(instance)
    }
}

fn splice_error(err: MapError, property: &PropertyDescriptor) -> MapError {
    match property.kind {
        PropertyKind::Unwrapped { prefix, suffix } => err.spliced(prefix, suffix),
        _ => err,
    }
}

fn classify<'n>(
    mapper: &Mapper,
    object: &'n ObjectMap,
    descriptor: &TypeDescriptor,
    ctx: &ReadContext<'_>,
) -> Result<Classified<'n>, MapError> {
    let ignore_unknown = descriptor
        .ignore_unknown
        .or(ctx.options().ignore_unknown)
        .unwrap_or(mapper.config().ignore_unknown);
    let bucket = descriptor.any_bucket().filter(|p| p.readable).is_some();
    let tag_keys = descriptor.tag_keys(ctx)?;

    let mut input = Classified::default();
    for (key, value) in object {
        if let Some((_, route)) = tag_keys.iter().find(|(tag, _)| tag == key) {
            if let TagRoute::Unwrapped(index, inner) = route {
                input.route_unwrapped(*index, inner, value);
            }
            continue;
        }

        match descriptor.slots.get(key) {
            Some(KeySlot::Property(index)) => {
                if descriptor.properties[*index].readable {
                    input.values.push((*index, key, value));
                }
            }
            Some(KeySlot::Unwrapped(index, inner)) => {
                if descriptor.properties[*index].readable {
                    input.route_unwrapped(*index, inner, value);
                }
            }
            Some(KeySlot::Creator | KeySlot::Ignored) => {}
            None if bucket => input.extras.push((key, value)),
            None if ignore_unknown => {
                log::trace!("`{}`: skipped unknown key \"{key}\"", descriptor.type_path);
            }
            None => {
                return Err(MapError::UnknownKey {
                    type_path: descriptor.type_path,
                    key: String::from(key),
                });
            }
        }
    }
    Ok(input)
}
