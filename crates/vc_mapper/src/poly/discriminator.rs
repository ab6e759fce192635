use alloc::borrow::Cow;

// -----------------------------------------------------------------------------
// Discriminator

/// What a type tag identifies a subtype by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TagId {
    /// The subtype's alias, falling back to its short type name.
    Name,
    /// The subtype's full type path.
    Class,
}

/// Where a type tag sits in the document.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// A key inside the value's own object, written first.
    Property(Cow<'static, str>),
    /// A key next to the property holding the value, in the enclosing object.
    ExternalProperty(Cow<'static, str>),
    /// `[tag, value]`
    WrapperArray,
    /// `{ tag: value }`
    WrapperObject,
}

impl Placement {
    #[inline]
    pub const fn property(key: &'static str) -> Self {
        Placement::Property(Cow::Borrowed(key))
    }

    #[inline]
    pub const fn external_property(key: &'static str) -> Self {
        Placement::ExternalProperty(Cow::Borrowed(key))
    }
}

/// How the concrete type of a polymorphic value is recorded.
///
/// ```
/// use vc_mapper::poly::{Discriminator, Placement, TagId};
///
/// let default = Discriminator::default();
/// assert_eq!(default.id(), TagId::Name);
/// assert_eq!(default.placement(), &Placement::property("@type"));
///
/// let wrapped = Discriminator::new(TagId::Class, Placement::WrapperArray);
/// assert_eq!(wrapped.external_key(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Discriminator {
    id: TagId,
    placement: Placement,
}

impl Discriminator {
    /// A name tag under the `@type` key.
    pub const DEFAULT: Self = Self::new(TagId::Name, Placement::property("@type"));

    #[inline]
    pub const fn new(id: TagId, placement: Placement) -> Self {
        Self { id, placement }
    }

    /// A name tag under `key` inside the value's object.
    #[inline]
    pub const fn property(key: &'static str) -> Self {
        Self::new(TagId::Name, Placement::property(key))
    }

    #[inline]
    pub const fn id(&self) -> TagId {
        self.id
    }

    #[inline]
    pub const fn placement(&self) -> &Placement {
        &self.placement
    }

    /// The sibling key of an external tag.
    pub fn external_key(&self) -> Option<&str> {
        match &self.placement {
            Placement::ExternalProperty(key) => Some(key),
            _ => None,
        }
    }
}

impl Default for Discriminator {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
