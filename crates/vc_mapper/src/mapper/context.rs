use crate::Mapper;
use crate::document::ObjectMap;
use crate::poly::Discriminator;

// -----------------------------------------------------------------------------
// WriteContext

/// State threaded through writing a value.
#[derive(Clone, Copy)]
pub struct WriteContext<'a> {
    mapper: &'a Mapper,
    discriminator: Option<&'a Discriminator>,
}

impl<'a> WriteContext<'a> {
    #[inline]
    pub(crate) const fn new(mapper: &'a Mapper) -> Self {
        Self {
            mapper,
            discriminator: None,
        }
    }

    #[inline]
    pub const fn mapper(&self) -> &'a Mapper {
        self.mapper
    }

    /// A property-level discriminator override for the value being written.
    ///
    /// Only a polymorphic value held directly by the property, or through
    /// an `Option`, sees it. Container elements do not.
    #[inline]
    pub const fn discriminator(&self) -> Option<&'a Discriminator> {
        self.discriminator
    }

    /// Context for an element of a sequence or map.
    #[inline]
    pub const fn element(&self) -> Self {
        Self {
            mapper: self.mapper,
            discriminator: None,
        }
    }

    #[inline]
    pub(crate) const fn with_discriminator(&self, discriminator: Option<&'a Discriminator>) -> Self {
        Self {
            mapper: self.mapper,
            discriminator,
        }
    }
}

// -----------------------------------------------------------------------------
// ReadContext

/// Per-call switches for reading.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReadOptions {
    /// Overrides the mapper's unknown-key handling, below type-level settings.
    pub ignore_unknown: Option<bool>,
}

/// State threaded through reading a value.
#[derive(Clone, Copy)]
pub struct ReadContext<'a> {
    mapper: &'a Mapper,
    options: ReadOptions,
    discriminator: Option<&'a Discriminator>,
    parent: Option<&'a ObjectMap>,
}

impl<'a> ReadContext<'a> {
    #[inline]
    pub(crate) const fn new(mapper: &'a Mapper, options: ReadOptions) -> Self {
        Self {
            mapper,
            options,
            discriminator: None,
            parent: None,
        }
    }

    #[inline]
    pub const fn mapper(&self) -> &'a Mapper {
        self.mapper
    }

    #[inline]
    pub const fn options(&self) -> ReadOptions {
        self.options
    }

    /// See [`WriteContext::discriminator`].
    #[inline]
    pub const fn discriminator(&self) -> Option<&'a Discriminator> {
        self.discriminator
    }

    /// The object that holds the property being read.
    ///
    /// Externally tagged values look up their tag here.
    #[inline]
    pub const fn parent(&self) -> Option<&'a ObjectMap> {
        self.parent
    }

    /// Context for an element of a sequence or map.
    #[inline]
    pub const fn element(&self) -> Self {
        Self {
            mapper: self.mapper,
            options: self.options,
            discriminator: None,
            parent: None,
        }
    }

    #[inline]
    pub(crate) const fn with_discriminator(&self, discriminator: Option<&'a Discriminator>) -> Self {
        Self {
            mapper: self.mapper,
            options: self.options,
            discriminator,
            parent: self.parent,
        }
    }

    /// Context for a property of an object.
    #[inline]
    pub(crate) fn property<'b>(
        &self,
        parent: &'b ObjectMap,
        discriminator: Option<&'b Discriminator>,
    ) -> ReadContext<'b>
    where
        'a: 'b,
    {
        ReadContext {
            mapper: self.mapper,
            options: self.options,
            discriminator,
            parent: Some(parent),
        }
    }
}
