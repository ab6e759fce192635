//! Code generation for `#[derive(Mapped)]`.

// -----------------------------------------------------------------------------
// Modules

mod trait_map_value;
mod trait_mapped;

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, parse_quote};

use crate::derive_data::MappedStruct;

/// The struct's generics, each type parameter bound by `MapValue`.
fn bounded_generics(data: &MappedStruct, vc_mapper: &syn::Path) -> Generics {
    let mut generics = data.generics.clone();
    let params: Vec<_> = data.generics.type_params().map(|p| p.ident.clone()).collect();
    let where_clause = generics.make_where_clause();
    for ident in params {
        where_clause
            .predicates
            .push(parse_quote!(#ident: #vc_mapper::MapValue));
    }
    generics
}

pub(crate) fn derive_mapped(ast: DeriveInput) -> TokenStream {
    let data = match MappedStruct::from_input(ast) {
        Ok(data) => data,
        Err(err) => return err.into_compile_error(),
    };
    let vc_mapper = crate::path::vc_mapper();
    let generics = bounded_generics(&data, &vc_mapper);

    let mapped = match trait_mapped::impl_mapped(&data, &generics, &vc_mapper) {
        Ok(tokens) => tokens,
        Err(err) => return err.into_compile_error(),
    };
    let map_value = trait_map_value::impl_map_value(&data, &generics, &vc_mapper);

    quote! {
        const _: () = {
            #mapped
            #map_value
        };
    }
}
