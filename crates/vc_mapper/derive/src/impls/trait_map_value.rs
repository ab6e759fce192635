use proc_macro2::TokenStream;
use quote::quote;
use syn::Generics;

use crate::derive_data::MappedStruct;

/// `MapValue`, delegating to the descriptor-driven engine.
pub(crate) fn impl_map_value(data: &MappedStruct, generics: &Generics, vc_mapper: &syn::Path) -> TokenStream {
    let ident = &data.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let exports_ = crate::path::macro_exports_(vc_mapper);
    let info_ = crate::path::info_(vc_mapper);

    let ignored_type = data
        .attrs
        .ignore_type
        .then(|| quote!(const IGNORED_TYPE: bool = true;));

    let default_value = data.attrs.default.map(|_| {
        quote! {
            fn default_value() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(<Self as ::core::default::Default>::default())
            }
        }
    });

    quote! {
        impl #impl_generics #vc_mapper::MapValue for #ident #ty_generics #where_clause {
            #ignored_type

            fn to_node(
                &self,
                ctx: &#vc_mapper::mapper::WriteContext<'_>,
            ) -> ::core::result::Result<#vc_mapper::DocumentNode, #vc_mapper::MapError> {
                #exports_::write_mapped(self, ctx)
            }

            fn from_node(
                node: &#vc_mapper::DocumentNode,
                ctx: &#vc_mapper::mapper::ReadContext<'_>,
            ) -> ::core::result::Result<Self, #vc_mapper::MapError> {
                #exports_::read_mapped(node, ctx)
            }

            #default_value

            fn descriptor(
                mapper: &#vc_mapper::Mapper,
            ) -> ::core::option::Option<
                ::core::result::Result<#exports_::Arc<#info_::TypeDescriptor>, #vc_mapper::SchemaError>,
            > {
                ::core::option::Option::Some(mapper.describe::<Self>())
            }
        }
    }
}
