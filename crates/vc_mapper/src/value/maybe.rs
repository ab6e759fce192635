use alloc::string::String;
use alloc::sync::Arc;

use crate::Mapper;
use crate::document::DocumentNode;
use crate::error::{MapError, SchemaError};
use crate::info::{Presence, TypeDescriptor};
use crate::mapper::{ReadContext, WriteContext};
use crate::value::{Emitted, MapValue};

// -----------------------------------------------------------------------------
// Option

// `None` is null. Everything else, including a discriminator override,
// passes through to the inner value.
impl<T: MapValue> MapValue for Option<T> {
    const IGNORED_TYPE: bool = T::IGNORED_TYPE;

    fn type_label() -> &'static str {
        T::type_label()
    }

    fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        match self {
            Some(value) => value.to_node(ctx),
            None => Ok(DocumentNode::Null),
        }
    }

    fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        match node {
            DocumentNode::Null => Ok(None),
            _ => T::from_node(node, ctx).map(Some),
        }
    }

    fn presence(&self) -> Presence {
        match self {
            Some(value) => value.presence(),
            None => Presence::Null,
        }
    }

    fn default_value() -> Option<Self> {
        Some(None)
    }

    fn missing_value() -> Option<Self> {
        Some(None)
    }

    fn to_property(&self, ctx: &WriteContext<'_>) -> Result<Emitted, MapError> {
        match self {
            Some(value) => value.to_property(ctx),
            None => Ok(Emitted::new(DocumentNode::Null)),
        }
    }

    fn external_tag_key(ctx: &ReadContext<'_>) -> Result<Option<String>, MapError> {
        T::external_tag_key(ctx)
    }

    fn descriptor(mapper: &Mapper) -> Option<Result<Arc<TypeDescriptor>, SchemaError>> {
        T::descriptor(mapper)
    }
}

// -----------------------------------------------------------------------------
// Maybe

/// A tri-state value: present, or explicitly absent.
///
/// Together with `Option`, it tells apart "no value" (`None`) from
/// "deliberately left out" (`Maybe::Absent`), which
/// [`Include::NonAbsent`] drops while [`Include::NonNull`] keeps.
///
/// An absent value is written as null, and null reads back as absent.
///
/// [`Include::NonAbsent`]: crate::info::Include::NonAbsent
/// [`Include::NonNull`]: crate::info::Include::NonNull
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Maybe<T> {
    #[default]
    Absent,
    Present(T),
}

impl<T> Maybe<T> {
    #[inline]
    pub const fn is_present(&self) -> bool {
        matches!(self, Maybe::Present(_))
    }

    #[inline]
    pub fn as_ref(&self) -> Maybe<&T> {
        match self {
            Maybe::Present(value) => Maybe::Present(value),
            Maybe::Absent => Maybe::Absent,
        }
    }

    #[inline]
    pub fn into_option(self) -> Option<T> {
        match self {
            Maybe::Present(value) => Some(value),
            Maybe::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Maybe<T> {
    #[inline]
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Maybe::Present(value),
            None => Maybe::Absent,
        }
    }
}

impl<T: MapValue> MapValue for Maybe<T> {
    const IGNORED_TYPE: bool = T::IGNORED_TYPE;

    fn type_label() -> &'static str {
        T::type_label()
    }

    fn to_node(&self, ctx: &WriteContext<'_>) -> Result<DocumentNode, MapError> {
        match self {
            Maybe::Present(value) => value.to_node(ctx),
            Maybe::Absent => Ok(DocumentNode::Null),
        }
    }

    fn from_node(node: &DocumentNode, ctx: &ReadContext<'_>) -> Result<Self, MapError> {
        match node {
            DocumentNode::Null => Ok(Maybe::Absent),
            _ => T::from_node(node, ctx).map(Maybe::Present),
        }
    }

    fn presence(&self) -> Presence {
        match self {
            Maybe::Present(value) => value.presence(),
            Maybe::Absent => Presence::Absent,
        }
    }

    fn default_value() -> Option<Self> {
        Some(Maybe::Absent)
    }

    fn missing_value() -> Option<Self> {
        Some(Maybe::Absent)
    }

    fn to_property(&self, ctx: &WriteContext<'_>) -> Result<Emitted, MapError> {
        match self {
            Maybe::Present(value) => value.to_property(ctx),
            Maybe::Absent => Ok(Emitted::new(DocumentNode::Null)),
        }
    }

    fn external_tag_key(ctx: &ReadContext<'_>) -> Result<Option<String>, MapError> {
        T::external_tag_key(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::Maybe;
    use crate::Mapper;
    use crate::document::DocumentNode;
    use crate::info::Presence;
    use crate::value::MapValue;

    #[test]
    fn option_null_round_trip() {
        let mapper = Mapper::new();
        assert_eq!(mapper.write(&Option::<i32>::None), Ok(DocumentNode::Null));
        assert_eq!(mapper.read::<Option<i32>>(&DocumentNode::Null), Ok(None));
        assert_eq!(mapper.read::<Option<i32>>(&DocumentNode::from(3)), Ok(Some(3)));
    }

    #[test]
    fn presence_distinguishes_null_and_absent() {
        assert_eq!(Option::<i32>::None.presence(), Presence::Null);
        assert_eq!(Maybe::<i32>::Absent.presence(), Presence::Absent);
        assert_eq!(Maybe::Present(Option::<i32>::None).presence(), Presence::Null);
        assert_eq!(Some(Maybe::Present(1)).presence(), Presence::Present);
    }

    #[test]
    fn absent_reads_back_from_null() {
        let mapper = Mapper::new();
        assert_eq!(mapper.read::<Maybe<String>>(&DocumentNode::Null), Ok(Maybe::Absent));
        assert_eq!(mapper.write(&Maybe::<String>::Absent), Ok(DocumentNode::Null));
    }
}
