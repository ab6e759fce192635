use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Fields, Generics, Ident, Type, Visibility};

use super::{FieldAttributes, TypeAttributes};

/// A named field and its attributes.
pub(crate) struct MappedField {
    pub ident: Ident,
    pub ty: Type,
    /// Variant name of `vc_mapper::info::Visibility`.
    pub visibility: &'static str,
    pub attrs: FieldAttributes,
}

/// The deriving struct.
pub(crate) struct MappedStruct {
    pub ident: Ident,
    pub generics: Generics,
    pub attrs: TypeAttributes,
    pub fields: Vec<MappedField>,
}

fn visibility_name(vis: &Visibility) -> &'static str {
    match vis {
        Visibility::Public(_) => "Public",
        Visibility::Restricted(_) => "Restricted",
        Visibility::Inherited => "Private",
    }
}

impl MappedStruct {
    pub fn from_input(ast: DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&ast.attrs)?;
        let named = match ast.data {
            Data::Struct(data) => match data.fields {
                Fields::Named(named) => named.named,
                Fields::Unit => Default::default(),
                Fields::Unnamed(fields) => {
                    return Err(syn::Error::new(
                        fields.span(),
                        "`Mapped` needs named fields: tuple fields have no key",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span(),
                    "`Mapped` is derived for structs, map enums through a polymorphic base",
                ));
            }
            Data::Union(data) => {
                let span = data.union_token.span();
                return Err(syn::Error::new(span, "`Mapped` is not derived for unions"));
            }
        };

        let mut fields = Vec::with_capacity(named.len());
        for field in named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            let Some(ident) = field.ident else {
                return Err(syn::Error::new(field.ty.span(), "expected a named field"));
            };
            fields.push(MappedField {
                ident,
                ty: field.ty,
                visibility: visibility_name(&field.vis),
                attrs: field_attrs,
            });
        }

        Ok(Self {
            ident: ast.ident,
            generics: ast.generics,
            attrs,
            fields,
        })
    }
}
