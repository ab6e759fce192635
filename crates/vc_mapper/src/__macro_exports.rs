//! Items used by code generated by `#[derive(Mapped)]` and
//! [`impl_map_value!`](crate::impl_map_value). Not public API.

pub use alloc::sync::Arc;

use crate::Mapped;
use crate::document::DocumentNode;
use crate::error::MapError;
use crate::mapper::{ReadContext, WriteContext};

/// Writes a mapped struct through its descriptor.
pub fn write_mapped<T: Mapped>(value: &T, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
    let mapper = ctx.mapper();
    let descriptor = mapper.describe::<T>()?;
    mapper.write_body(value, &descriptor, &ctx.element())
}

/// Reads a mapped struct through its descriptor.
pub fn read_mapped<T: Mapped>(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<T, MapError> {
    let mapper = ctx.mapper();
    let descriptor = mapper.describe::<T>()?;
    let value = mapper.read_object(node, &descriptor, &ctx.element())?;
    match value.downcast::<T>() {
        Ok(value) => Ok(*value),
        Err(_) => Err(MapError::custom(alloc::format!(
            "creator of `{}` produced another type",
            descriptor.type_path()
        ))),
    }
}
