//! See [`Mapped`].
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static MAPPED_ATTRIBUTE_NAME: &str = "mapped";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;

// -----------------------------------------------------------------------------
// Macros

/// # Mapped Structs
///
/// `#[derive(Mapped)]` implements `Mapped` and `MapValue` for a struct with
/// named fields (or a unit struct). Every field becomes a property whose
/// internal name is the field name; its visibility is the field's.
///
/// The field types must implement `MapValue`, and so must every generic
/// type parameter.
///
/// Tuple structs, enums and unions are rejected. Polymorphic hierarchies
/// are modelled with a trait object base, see `vc_mapper::poly`.
///
/// ## Type-level attributes
///
/// ```rust, ignore
/// #[derive(Mapped, Default)]
/// #[mapped(default, rename_all = "camelCase", include = NonNull)]
/// struct Foo { /* ... */ }
/// ```
///
/// - `default`: read by `Default::default()` followed by population.
///   The same value is the baseline of `include = NonDefault`.
/// - `type_name = "alias"`: the name used as a polymorphic tag.
/// - `include = Always | NonNull | NonAbsent | NonEmpty | NonDefault`.
/// - `ignore_unknown` or `ignore_unknown = false`.
/// - `ignore_properties = ["a", "b"]`, optionally with `allow_getters`
///   (still written) or `allow_setters` (still read).
/// - `rename_all = "camelCase"`. Also `identity`, `PascalCase`,
///   `snake_case`, `kebab-case`, `SCREAMING_SNAKE_CASE`, `lowercase` and
///   `lower.dot.case`.
/// - `visibility(write = Any, read = NonPrivate)`: the thresholds a field
///   needs to be visible without being explicit. Each is one of `Any`,
///   `NonPrivate`, `PublicOnly` and `None`.
/// - `ignore_type`: every property of this type is skipped wherever it
///   appears.
/// - `creator(call = Self::new, args = ["a", "b"], optional = ["b"])`:
///   reads by calling `call` with the named properties, in order.
/// - `map_creator = Self::from_map`: reads by handing the whole object,
///   read as the function's argument type, to the function.
/// - `value = Self::getter`: writes the type as the single value the
///   getter returns. Pair it with `map_creator` to read that value back.
///
/// ## Field-level attributes
///
/// ```rust, ignore
/// #[derive(Mapped)]
/// struct Foo {
///     #[mapped(rename = "id", include = NonNull)]
///     identifier: Option<u64>,
///     #[mapped(unwrapped(prefix = "home_"))]
///     address: Address,
/// }
/// ```
///
/// - `rename = "key"`: the external key, also makes the field explicit.
/// - `property`: visible in both directions whatever the thresholds.
/// - `ignore`, `ignore_read` or `ignore_write`.
/// - `include = ...`: per-property policy, beats the type's.
/// - `codec = expr`: a `Codec` replacing the value's representation.
/// - `raw`: the string is written verbatim as a raw node.
/// - `unwrapped`, or `unwrapped(prefix = "p_", suffix = "_s")`: splices
///   the nested mapped value's keys into this object.
/// - `any_bucket`: the map receiving unknown keys, written last.
/// - `accept_single_value`: a lone value is read as a one-element sequence.
/// - `unwrap_single_array`: a one-element sequence is written as its
///   element. Both flags take `= false` to opt out of the mapper default.
/// - `discriminator(name | class, property = "k" | external_property = "k"
///   | wrapper_array | wrapper_object)`: how a polymorphic value held by
///   this field is tagged. Defaults to `name` in property `"@type"`.
#[proc_macro_derive(Mapped, attributes(mapped))]
pub fn derive_mapped(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    impls::derive_mapped(ast).into()
}
