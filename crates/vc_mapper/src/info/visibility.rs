// -----------------------------------------------------------------------------
// Visibility

/// Access level of a field or accessor, as declared in source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    /// No visibility modifier.
    Private,
    /// `pub(crate)`, `pub(super)` and `pub(in path)`.
    Restricted,
    /// `pub`.
    Public,
}

/// The least visibility an accessor needs to be picked up implicitly.
///
/// Accessors declared explicitly bypass this threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MinVisibility {
    Any,
    NonPrivate,
    PublicOnly,
    /// Nothing is picked up implicitly.
    None,
}

impl MinVisibility {
    /// Whether an accessor of visibility `vis` passes the threshold.
    ///
    /// ```
    /// use vc_mapper::info::{MinVisibility, Visibility};
    ///
    /// assert!(MinVisibility::NonPrivate.admits(Visibility::Restricted));
    /// assert!(!MinVisibility::PublicOnly.admits(Visibility::Restricted));
    /// assert!(!MinVisibility::None.admits(Visibility::Public));
    /// ```
    pub const fn admits(self, vis: Visibility) -> bool {
        match self {
            MinVisibility::Any => true,
            MinVisibility::NonPrivate => !matches!(vis, Visibility::Private),
            MinVisibility::PublicOnly => matches!(vis, Visibility::Public),
            MinVisibility::None => false,
        }
    }
}

/// Visibility thresholds for both directions.
///
/// `write` governs accessors used when producing a document, `read`
/// governs accessors used when populating a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VisibilityRules {
    pub write: MinVisibility,
    pub read: MinVisibility,
}

impl VisibilityRules {
    /// Every getter or field is written, only non-private setters and
    /// fields are read.
    pub const DEFAULT: Self = Self {
        write: MinVisibility::Any,
        read: MinVisibility::NonPrivate,
    };

    #[inline]
    pub const fn new(write: MinVisibility, read: MinVisibility) -> Self {
        Self { write, read }
    }
}

impl Default for VisibilityRules {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
