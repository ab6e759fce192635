//! Paths into `vc_mapper` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// The path under which `vc_mapper` is reachable from the deriving crate.
///
/// Resolved from the deriving crate's `Cargo.toml`, see
/// [`vc_macro_utils::Manifest`]. The lookup reads a file, so it runs once
/// per derive and the path is passed around.
pub(crate) fn vc_mapper() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_mapper"))
}

#[inline(always)]
pub(crate) fn info_(vc_mapper: &syn::Path) -> TokenStream {
    quote!(#vc_mapper::info)
}

#[inline(always)]
pub(crate) fn poly_(vc_mapper: &syn::Path) -> TokenStream {
    quote!(#vc_mapper::poly)
}

#[inline(always)]
pub(crate) fn macro_exports_(vc_mapper: &syn::Path) -> TokenStream {
    quote!(#vc_mapper::__macro_exports)
}
