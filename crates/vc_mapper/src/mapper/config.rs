use crate::info::{Include, NamingStrategy, VisibilityRules};

// -----------------------------------------------------------------------------
// MapperConfig

/// Mapper-wide defaults, overridden by type-level and property-level
/// declarations.
///
/// ```
/// use vc_mapper::info::{Include, NamingStrategy};
/// use vc_mapper::{Mapper, MapperConfig};
///
/// const CONFIG: MapperConfig = MapperConfig::DEFAULT
///     .with_default_include(Include::NonNull)
///     .with_naming(NamingStrategy::CamelCase);
///
/// let mapper = Mapper::with_config(CONFIG);
/// assert_eq!(mapper.config().default_include, Include::NonNull);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MapperConfig {
    /// Inclusion policy of properties that declare none. `Always` by default.
    pub default_include: Include,
    /// Whether unknown keys are skipped instead of failing. `false` by default.
    pub ignore_unknown: bool,
    /// Visibility thresholds of types that declare none.
    pub visibility: VisibilityRules,
    /// Naming strategy of types that declare none. `Identity` by default.
    pub naming: NamingStrategy,
    /// Whether a lone value is read as a one-element sequence. `false` by
    /// default.
    pub accept_single_value: bool,
    /// Whether a one-element sequence is written as its element. `false` by
    /// default.
    pub unwrap_single_arrays: bool,
}

impl MapperConfig {
    pub const DEFAULT: Self = Self {
        default_include: Include::Always,
        ignore_unknown: false,
        visibility: VisibilityRules::DEFAULT,
        naming: NamingStrategy::Identity,
        accept_single_value: false,
        unwrap_single_arrays: false,
    };

    #[inline]
    pub const fn with_default_include(mut self, include: Include) -> Self {
        self.default_include = include;
        self
    }

    #[inline]
    pub const fn with_ignore_unknown(mut self, ignore: bool) -> Self {
        self.ignore_unknown = ignore;
        self
    }

    #[inline]
    pub const fn with_visibility(mut self, rules: VisibilityRules) -> Self {
        self.visibility = rules;
        self
    }

    #[inline]
    pub const fn with_naming(mut self, naming: NamingStrategy) -> Self {
        self.naming = naming;
        self
    }

    #[inline]
    pub const fn with_accept_single_value(mut self, accept: bool) -> Self {
        self.accept_single_value = accept;
        self
    }

    #[inline]
    pub const fn with_unwrap_single_arrays(mut self, unwrap: bool) -> Self {
        self.unwrap_single_arrays = unwrap;
        self
    }
}

impl Default for MapperConfig {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
