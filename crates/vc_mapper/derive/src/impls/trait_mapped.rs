use proc_macro2::TokenStream;
use quote::quote;
use syn::Generics;
use syn::ext::IdentExt;

use crate::derive_data::{
    CreatorAttribute, DiscriminatorAttribute, MappedField, MappedStruct, PlacementAttribute,
};

/// `Mapped::describe`: one builder call per type-level setting and field.
pub(crate) fn impl_mapped(
    data: &MappedStruct,
    generics: &Generics,
    vc_mapper: &syn::Path,
) -> syn::Result<TokenStream> {
    let ident = &data.ident;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let info_ = crate::path::info_(vc_mapper);

    let type_calls = type_calls(data, vc_mapper);
    let field_calls = data
        .fields
        .iter()
        .map(|field| field_call(field, vc_mapper))
        .collect::<syn::Result<Vec<_>>>()?;

    Ok(quote! {
        impl #impl_generics #vc_mapper::Mapped for #ident #ty_generics #where_clause {
            #[allow(unused_variables)]
            fn describe(builder: &mut #info_::DescriptorBuilder<Self>) {
                #(#type_calls)*
                #(#field_calls)*
            }
        }
    })
}

fn type_calls(data: &MappedStruct, vc_mapper: &syn::Path) -> Vec<TokenStream> {
    let info_ = crate::path::info_(vc_mapper);
    let attrs = &data.attrs;
    let mut calls = Vec::new();

    if let Some(name) = &attrs.type_name {
        calls.push(quote!(builder.type_name(#name);));
    }
    if let Some(include) = &attrs.include {
        calls.push(quote!(builder.include(#info_::Include::#include);));
    }
    if let Some(ignore) = attrs.ignore_unknown {
        calls.push(quote!(builder.ignore_unknown(#ignore);));
    }
    if !attrs.ignore_properties.is_empty() {
        let names = &attrs.ignore_properties;
        calls.push(quote!(builder.ignore_properties(&[#(#names),*]);));
    }
    if attrs.allow_getters {
        calls.push(quote!(builder.allow_getters();));
    }
    if attrs.allow_setters {
        calls.push(quote!(builder.allow_setters();));
    }
    if let Some(naming) = &attrs.rename_all {
        calls.push(quote!(builder.rename_all(#info_::NamingStrategy::#naming);));
    }
    if let Some((write, read)) = &attrs.visibility {
        calls.push(quote! {
            builder.visibility(#info_::VisibilityRules::new(
                #info_::MinVisibility::#write,
                #info_::MinVisibility::#read,
            ));
        });
    }
    if attrs.default.is_some() {
        calls.push(quote!(builder.default_constructor(<Self as ::core::default::Default>::default);));
    }
    if let Some(creator) = &attrs.creator {
        calls.push(creator_call(creator, vc_mapper));
    }
    if let Some(create) = &attrs.map_creator {
        calls.push(quote!(builder.map_creator(#create);));
    }
    if let Some(get) = &attrs.value {
        calls.push(quote!(builder.value_writer(#get);));
    }
    calls
}

fn creator_call(creator: &CreatorAttribute, vc_mapper: &syn::Path) -> TokenStream {
    let CreatorAttribute {
        call,
        args,
        optional,
    } = creator;
    let gets = args.iter().map(|arg| quote!(args.get(#arg)?));
    let declared = args.iter().map(|arg| {
        if optional.iter().any(|o| o.value() == arg.value()) {
            quote!(.optional_arg(#arg))
        } else {
            quote!(.arg(#arg))
        }
    });
    quote! {
        builder.creator(
            #vc_mapper::construct::Creator::new(|args| {
                ::core::result::Result::Ok(#call(#(#gets),*))
            })
            #(#declared)*
        );
    }
}

fn field_call(field: &MappedField, vc_mapper: &syn::Path) -> syn::Result<TokenStream> {
    let info_ = crate::path::info_(vc_mapper);
    let MappedField {
        ident,
        ty,
        visibility,
        attrs,
    } = field;
    let name = ident.unraw().to_string();
    let include = attrs
        .include
        .as_ref()
        .map(|include| quote!(.include(#info_::Include::#include)));

    if attrs.any_bucket {
        return Ok(quote! {
            builder
                .any_bucket::<#ty>(#name, |this| &this.#ident, |this| &mut this.#ident)
                #include;
        });
    }

    if attrs.raw && attrs.codec.is_some() {
        return Err(syn::Error::new(ident.span(), "`raw` and `codec` cannot be combined"));
    }

    let vis = syn::Ident::new(visibility, ident.span());
    let mut chain = Vec::new();
    if let Some(rename) = &attrs.rename {
        chain.push(quote!(.rename(#rename)));
    }
    if attrs.explicit {
        chain.push(quote!(.explicit()));
    }
    if attrs.ignore {
        chain.push(quote!(.ignore()));
    }
    if attrs.ignore_read {
        chain.push(quote!(.ignore_read()));
    }
    if attrs.ignore_write {
        chain.push(quote!(.ignore_write()));
    }
    chain.extend(include);
    if let Some(codec) = &attrs.codec {
        chain.push(quote!(.codec(#codec)));
    }
    if attrs.raw {
        chain.push(quote!(.raw()));
    }
    if let Some((prefix, suffix)) = &attrs.unwrapped {
        chain.push(match (prefix, suffix) {
            (None, None) => quote!(.unwrapped()),
            _ => {
                let prefix = prefix.as_ref().map_or_else(|| quote!(""), |p| quote!(#p));
                let suffix = suffix.as_ref().map_or_else(|| quote!(""), |s| quote!(#s));
                quote!(.unwrapped_with(#prefix, #suffix))
            }
        });
    }
    if let Some(accept) = attrs.accept_single_value {
        chain.push(quote!(.accept_single_value(#accept)));
    }
    if let Some(unwrap) = attrs.unwrap_single_array {
        chain.push(quote!(.unwrap_single_array(#unwrap)));
    }
    if let Some(discriminator) = &attrs.discriminator {
        let discriminator = discriminator_expr(discriminator, vc_mapper);
        chain.push(quote!(.discriminator(#discriminator)));
    }

    Ok(quote! {
        builder
            .field::<#ty>(
                #name,
                #info_::Visibility::#vis,
                |this| &this.#ident,
                |this| &mut this.#ident,
            )
            #(#chain)*;
    })
}

fn discriminator_expr(discriminator: &DiscriminatorAttribute, vc_mapper: &syn::Path) -> TokenStream {
    let poly_ = crate::path::poly_(vc_mapper);
    let id = match discriminator.class {
        true => quote!(#poly_::TagId::Class),
        false => quote!(#poly_::TagId::Name),
    };
    let placement = match &discriminator.placement {
        None => quote!(#poly_::Placement::property("@type")),
        Some(PlacementAttribute::Property(key)) => quote!(#poly_::Placement::property(#key)),
        Some(PlacementAttribute::ExternalProperty(key)) => {
            quote!(#poly_::Placement::external_property(#key))
        }
        Some(PlacementAttribute::WrapperArray) => quote!(#poly_::Placement::WrapperArray),
        Some(PlacementAttribute::WrapperObject) => quote!(#poly_::Placement::WrapperObject),
    };
    quote!(#poly_::Discriminator::new(#id, #placement))
}
