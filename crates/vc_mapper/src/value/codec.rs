use alloc::string::String;

use crate::document::DocumentNode;
use crate::error::MapError;
use crate::mapper::{ReadContext, WriteContext};
use crate::value::MapValue;

// -----------------------------------------------------------------------------
// Codec

/// A per-property replacement for a value's own document representation.
///
/// Attached with `#[mapped(codec = ...)]` or
/// [`PropertyBuilder::codec`](crate::info::PropertyBuilder::codec).
///
/// # Examples
///
/// ```
/// use vc_mapper::document::DocumentNode;
/// use vc_mapper::mapper::{ReadContext, WriteContext};
/// use vc_mapper::value::Codec;
/// use vc_mapper::MapError;
///
/// /// Writes booleans as `"Y"` / `"N"`.
/// struct YesNo;
///
/// impl Codec<bool> for YesNo {
///     fn encode(&self, value: &bool, _: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
///         Ok(DocumentNode::from(if *value { "Y" } else { "N" }))
///     }
///
///     fn decode(&self, node: &DocumentNode, _: &ReadContext<'_>) -> Result<bool, MapError> {
///         match node.as_str() {
///             Some("Y") => Ok(true),
///             Some("N") => Ok(false),
///             _ => Err(MapError::coercion("Y or N", node)),
///         }
///     }
/// }
/// ```
pub trait Codec<V: MapValue>: Send + Sync + 'static {
    fn encode(&self, value: &V, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError>;

    /// Defaults to the value's own reading.
    fn decode(&self, node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<V, MapError> {
        V::from_node(node, ctx)
    }
}

// -----------------------------------------------------------------------------
// RawCodec

/// Emits a string property verbatim instead of as a quoted string.
///
/// On read, string input is taken as is. Any other input is kept as its
/// compact JSON text, or rejected without the `json` feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawCodec;

fn raw_text(node: &DocumentNode) -> Result<String, MapError> {
    match node {
        DocumentNode::String(s) | DocumentNode::Raw(s) => Ok(s.clone()),
        #[cfg(feature = "json")]
        _ => crate::document::json::to_string(node),
        #[cfg(not(feature = "json"))]
        _ => Err(MapError::coercion("raw text", node)),
    }
}

impl Codec<String> for RawCodec {
    fn encode(&self, value: &String, _ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        Ok(DocumentNode::Raw(value.clone()))
    }

    fn decode(&self, node: &DocumentNode, _ctx: &ReadContext<'_>) -> Result<String, MapError> {
        raw_text(node)
    }
}

impl Codec<Option<String>> for RawCodec {
    fn encode(
        &self,
        value: &Option<String>,
        _ctx: &WriteContext<'_>,
    ) -> Result<DocumentNode, MapError> {
        Ok(value.clone().map_or(DocumentNode::Null, DocumentNode::Raw))
    }

    fn decode(
        &self,
        node: &DocumentNode,
        _ctx: &ReadContext<'_>,
    ) -> Result<Option<String>, MapError> {
        match node {
            DocumentNode::Null => Ok(None),
            _ => raw_text(node).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Codec, RawCodec};
    use crate::Mapper;
    use crate::document::DocumentNode;
    use crate::object;

    #[test]
    fn raw_encodes_verbatim() {
        let mapper = Mapper::new();
        let ctx = mapper.write_context();
        let node = RawCodec.encode(&String::from("{\"a\":1}"), &ctx).unwrap();
        assert_eq!(node, DocumentNode::Raw("{\"a\":1}".into()));
        assert_eq!(RawCodec.encode(&None::<String>, &ctx), Ok(DocumentNode::Null));
    }

    #[cfg(feature = "json")]
    #[test]
    fn raw_decodes_structures_as_text() {
        let mapper = Mapper::new();
        let ctx = mapper.read_context();
        let text: String = RawCodec.decode(&object! { "a" => 1 }, &ctx).unwrap();
        assert_eq!(text, "{\"a\":1}");
        let plain: String = RawCodec.decode(&DocumentNode::from("x"), &ctx).unwrap();
        assert_eq!(plain, "x");
    }
}
