//! Parsing of the deriving struct and its `#[mapped(...)]` attributes.

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod mapped_struct;
mod type_attributes;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use field_attributes::{DiscriminatorAttribute, FieldAttributes, PlacementAttribute};
pub(crate) use mapped_struct::{MappedField, MappedStruct};
pub(crate) use type_attributes::{CreatorAttribute, TypeAttributes};

use syn::meta::ParseNestedMeta;
use syn::parse::ParseStream;
use syn::punctuated::Punctuated;
use syn::{Ident, LitStr, Token};

/// `key = Variant`, with `Variant` one of `allowed`.
fn parse_ident_of(meta: &ParseNestedMeta<'_>, allowed: &[&str]) -> syn::Result<Ident> {
    let ident: Ident = meta.value()?.parse()?;
    if allowed.iter().any(|name| ident == *name) {
        Ok(ident)
    } else {
        let expected = allowed.join(", ");
        Err(syn::Error::new(ident.span(), format!("expected one of: {expected}")))
    }
}

/// `["a", "b"]`
fn parse_str_list(input: ParseStream<'_>) -> syn::Result<Vec<LitStr>> {
    let content;
    syn::bracketed!(content in input);
    let list = Punctuated::<LitStr, Token![,]>::parse_terminated(&content)?;
    Ok(list.into_iter().collect())
}
