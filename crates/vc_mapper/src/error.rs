use alloc::borrow::Cow;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;

use thiserror::Error;

// -----------------------------------------------------------------------------
// SchemaError

/// A type whose mapping declarations are contradictory.
///
/// Produced while building a type's descriptor. The failure is cached, so
/// every later use of the type reports the same error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    #[error("`{type_path}` declares more than one any-bucket: `{first}` and `{second}`")]
    DuplicateAnyBucket {
        type_path: &'static str,
        first: &'static str,
        second: &'static str,
    },

    #[error("`{type_path}` maps both `{first}` and `{second}` to the key \"{key}\"")]
    DuplicateKey {
        type_path: &'static str,
        key: String,
        first: String,
        second: String,
    },

    #[error("creator of `{type_path}` binds \"{key}\", which matches no property")]
    UnknownCreatorKey { type_path: &'static str, key: String },

    #[error("`{type_path}` declares more than one {kind} creator")]
    DuplicateCreator {
        type_path: &'static str,
        kind: &'static str,
    },

    #[error("property `{property}` of `{type_path}` cannot be unwrapped: {reason}")]
    InvalidUnwrap {
        type_path: &'static str,
        property: &'static str,
        reason: &'static str,
    },

    #[error("`{type_path}` is unwrapped into itself")]
    RecursiveUnwrap { type_path: &'static str },

    #[error("property `{property}` of `{type_path}` is declared twice with different value types")]
    AccessorMismatch {
        type_path: &'static str,
        property: &'static str,
    },

    #[error("`{base}` registers both `{first}` and `{second}` under the tag \"{tag}\"")]
    DuplicateTag {
        base: &'static str,
        tag: String,
        first: &'static str,
        second: &'static str,
    },
}

// -----------------------------------------------------------------------------
// DiscriminatorError

/// Failures around the type tag of a polymorphic value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DiscriminatorError {
    #[error("unknown type tag \"{tag}\" for `{base}`")]
    UnknownTag { base: &'static str, tag: String },

    #[error("missing type tag \"{key}\" for `{base}`")]
    MissingTag { base: &'static str, key: String },

    #[error("`{subtype}` is not a registered subtype of `{base}`")]
    UnregisteredSubtype {
        base: &'static str,
        subtype: &'static str,
    },

    #[error("malformed type wrapper for `{base}`: expected {expected}")]
    MalformedWrapper {
        base: &'static str,
        expected: &'static str,
    },
}

// -----------------------------------------------------------------------------
// KeyPath

/// One step of a [`KeyPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside a document, printed like `$.items[2].name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPath {
    // Stored innermost first, errors grow the path while unwinding.
    segments: Vec<PathSegment>,
}

impl KeyPath {
    /// The document root, `$`.
    #[inline]
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Segments from the root inwards.
    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter().rev()
    }

    /// Adds an enclosing segment.
    pub fn push_outer(&mut self, segment: PathSegment) {
        self.segments.push(segment);
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in self.segments() {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// MapError

/// Error returned by writing and reading values.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum MapError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("unknown key \"{key}\" for `{type_path}`")]
    UnknownKey { type_path: &'static str, key: String },

    #[error("missing required creator argument \"{key}\" for `{type_path}`")]
    MissingRequiredArgument { type_path: &'static str, key: String },

    #[error(transparent)]
    Discriminator(#[from] DiscriminatorError),

    #[error("cannot read {found} as {expected} at {path}")]
    ValueCoercion {
        path: KeyPath,
        expected: Cow<'static, str>,
        found: String,
    },

    #[error("`{type_path}` cannot be constructed: no default constructor or creator")]
    NotConstructible { type_path: &'static str },

    #[error("{0}")]
    Custom(String),

    #[error("json: {0}")]
    Json(String),
}

impl MapError {
    /// A coercion failure at the current location.
    pub fn coercion(expected: impl Into<Cow<'static, str>>, found: &crate::document::DocumentNode) -> Self {
        MapError::ValueCoercion {
            path: KeyPath::root(),
            expected: expected.into(),
            found: found.describe(),
        }
    }

    /// A free-form failure, typically raised by a codec or creator.
    pub fn custom(message: impl fmt::Display) -> Self {
        MapError::Custom(message.to_string())
    }

    /// Prefixes the location of a coercion failure with an object key.
    pub fn at_key(self, key: &str) -> Self {
        self.at(|| PathSegment::Key(String::from(key)))
    }

    /// Prefixes the location of a coercion failure with a sequence index.
    pub fn at_index(self, index: usize) -> Self {
        self.at(|| PathSegment::Index(index))
    }

    /// Renames the outermost key of a coercion failure raised inside an
    /// unwrapped value to the key it has in the enclosing object.
    pub(crate) fn spliced(mut self, prefix: &str, suffix: &str) -> Self {
        if let MapError::ValueCoercion { path, .. } = &mut self
            && let Some(PathSegment::Key(key)) = path.segments.last_mut()
        {
            *key = format!("{prefix}{key}{suffix}");
        }
        self
    }

    fn at(mut self, segment: impl FnOnce() -> PathSegment) -> Self {
        if let MapError::ValueCoercion { path, .. } = &mut self {
            path.push_outer(segment());
        }
        self
    }

    /// The location of a coercion failure.
    pub fn path(&self) -> Option<&KeyPath> {
        match self {
            MapError::ValueCoercion { path, .. } => Some(path),
            _ => None,
        }
    }
}
