use alloc::string::String;

use vc_utils::case;

// -----------------------------------------------------------------------------
// NamingStrategy

/// Maps internal property names to external keys.
///
/// Applied only to properties without an explicit rename.
///
/// ```
/// use vc_mapper::info::NamingStrategy;
///
/// assert_eq!(NamingStrategy::CamelCase.apply("last_login"), "lastLogin");
/// assert_eq!(NamingStrategy::KebabCase.apply("last_login"), "last-login");
/// assert_eq!(NamingStrategy::Identity.apply("last_login"), "last_login");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NamingStrategy {
    /// Keys equal internal names.
    #[default]
    Identity,
    CamelCase,
    PascalCase,
    SnakeCase,
    KebabCase,
    ScreamingSnakeCase,
    LowerCase,
    LowerDotCase,
}

impl NamingStrategy {
    pub fn apply(self, name: &str) -> String {
        match self {
            NamingStrategy::Identity => String::from(name),
            NamingStrategy::CamelCase => case::to_camel(name),
            NamingStrategy::PascalCase => case::to_pascal(name),
            NamingStrategy::SnakeCase => case::to_snake(name),
            NamingStrategy::KebabCase => case::to_kebab(name),
            NamingStrategy::ScreamingSnakeCase => case::to_screaming_snake(name),
            NamingStrategy::LowerCase => case::to_lower(name),
            NamingStrategy::LowerDotCase => case::to_lower_dot(name),
        }
    }
}

/// The external key of a property.
///
/// An accessor-level rename beats a property-level rename, and either
/// beats the naming strategy.
pub(crate) fn resolve_key(
    accessor_rename: Option<&str>,
    property_rename: Option<&str>,
    internal: &str,
    strategy: NamingStrategy,
) -> String {
    match accessor_rename.or(property_rename) {
        Some(name) => String::from(name),
        None => strategy.apply(internal),
    }
}
