use crate::document::DocumentNode;

// -----------------------------------------------------------------------------
// Include

/// When a property is written.
///
/// Each policy also excludes everything the previous ones exclude:
/// `NonAbsent` drops nulls too, `NonEmpty` drops absent values too,
/// and so on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Include {
    #[default]
    Always,
    /// Drop null values.
    NonNull,
    /// Drop null values and explicitly absent ones.
    NonAbsent,
    /// Also drop empty strings, sequences and objects.
    NonEmpty,
    /// Also drop values equal to the type's default.
    ///
    /// Degrades to `NonEmpty` for value types without a default.
    NonDefault,
}

/// How a value is present, independently of its written form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Presence {
    Present,
    /// An empty optional.
    Null,
    /// A tri-state value explicitly marked as absent.
    Absent,
}

impl Include {
    /// Whether a value with the given presence and written `node` is kept.
    ///
    /// `default_node` is asked for the written form of the value type's
    /// default, only under [`Include::NonDefault`].
    pub(crate) fn keeps(
        self,
        presence: Presence,
        node: &DocumentNode,
        default_node: impl FnOnce() -> Option<DocumentNode>,
    ) -> bool {
        let null = match presence {
            Presence::Null => true,
            Presence::Present => node.is_null(),
            Presence::Absent => false,
        };
        if self >= Include::NonNull && null {
            return false;
        }
        if self >= Include::NonAbsent && presence == Presence::Absent {
            return false;
        }
        if self >= Include::NonEmpty && node.is_empty_value() {
            return false;
        }
        if self == Include::NonDefault
            && let Some(default) = default_node()
        {
            return *node != default;
        }
        true
    }
}
