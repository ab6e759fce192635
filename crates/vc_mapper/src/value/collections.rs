use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;
use std::collections::HashMap;

use crate::document::{DocumentNode, ObjectMap, OrderedMap};
use crate::error::MapError;
use crate::mapper::{ReadContext, WriteContext};
use crate::value::MapValue;

// -----------------------------------------------------------------------------
// Vec

impl<T: MapValue> MapValue for Vec<T> {
    fn type_label() -> &'static str {
        "sequence"
    }

    fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        let ctx = ctx.element();
        self.iter()
            .enumerate()
            .map(|(index, item)| item.to_node(&ctx).map_err(|e| e.at_index(index)))
            .collect::<Result<Vec<_>, _>>()
            .map(DocumentNode::Sequence)
    }

    fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        let Some(items) = node.as_sequence() else {
            return Err(MapError::coercion("sequence", node));
        };
        let ctx = ctx.element();
        items
            .iter()
            .enumerate()
            .map(|(index, item)| T::from_node(item, &ctx).map_err(|e| e.at_index(index)))
            .collect()
    }

    fn default_value() -> Option<Self> {
        Some(Vec::new())
    }
}

// -----------------------------------------------------------------------------
// MapLike

/// A string-keyed map usable as an any-bucket.
///
/// The bucket collects every unknown key on read and spreads its entries
/// as top-level keys on write.
pub trait MapLike: MapValue {
    type Value: MapValue;

    /// Current entries, in the order they should be written.
    fn map_entries(&self) -> Vec<(&str, &Self::Value)>;

    fn insert_entry(&mut self, key: String, value: Self::Value);
}

fn write_entries<'a, V: MapValue>(
    entries: impl Iterator<Item = (&'a str, &'a V)>,
    ctx: &WriteContext<'_>,
) -> Result<DocumentNode, MapError> {
    let ctx = ctx.element();
    let mut object = ObjectMap::new();
    for (key, value) in entries {
        let node = value.to_node(&ctx).map_err(|e| e.at_key(key))?;
        object.insert(key, node);
    }
    Ok(DocumentNode::Object(object))
}

fn read_entries<V: MapValue>(
    node: &DocumentNode,
    ctx: &ReadContext<'_>,
    mut insert: impl FnMut(String, V),
) -> Result<(), MapError> {
    let Some(object) = node.as_object() else {
        return Err(MapError::coercion("object", node));
    };
    let ctx = ctx.element();
    for (key, value) in object {
        let value = V::from_node(value, &ctx).map_err(|e| e.at_key(key))?;
        insert(String::from(key), value);
    }
    Ok(())
}

macro_rules! impl_map_like {
    ($({$($generics:tt)*} $map:ty => $new:expr),* $(,)?) => {$(
        impl<$($generics)*> MapValue for $map {
            fn type_label() -> &'static str {
                "map"
            }

            fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
                write_entries(self.iter().map(|(k, v)| (AsRef::<str>::as_ref(k), v)), ctx)
            }

            fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError> {
                let mut map: Self = $new;
                read_entries(node, ctx, |k, v| {
                    map.insert(k, v);
                })?;
                Ok(map)
            }

            fn default_value() -> Option<Self> {
                Some($new)
            }
        }

        impl<$($generics)*> MapLike for $map {
            type Value = V;

            fn map_entries(&self) -> Vec<(&str, &V)> {
                self.iter().map(|(k, v)| (AsRef::<str>::as_ref(k), v)).collect()
            }

            fn insert_entry(&mut self, key: String, value: V) {
                self.insert(key, value);
            }
        }
    )*};
}

impl_map_like! {
    {V: MapValue} BTreeMap<String, V> => BTreeMap::new(),
    {V: MapValue} OrderedMap<V> => OrderedMap::new(),
    {V: MapValue, S: BuildHasher + Default + Send + Sync + 'static} HashMap<String, V, S>
        => HashMap::with_hasher(S::default()),
    {V: MapValue, S: BuildHasher + Default + Send + Sync + 'static} vc_utils::hash::hashbrown::HashMap<String, V, S>
        => vc_utils::hash::hashbrown::HashMap::with_hasher(S::default()),
}
