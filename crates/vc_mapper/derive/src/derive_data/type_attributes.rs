use proc_macro2::Span;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, Expr, Ident, LitStr};

use super::{parse_ident_of, parse_str_list};
use crate::MAPPED_ATTRIBUTE_NAME;

const INCLUDE_POLICIES: &[&str] = &["Always", "NonNull", "NonAbsent", "NonEmpty", "NonDefault"];
const MIN_VISIBILITIES: &[&str] = &["Any", "NonPrivate", "PublicOnly", "None"];

/// `rename_all` values and the naming strategies they select.
const NAMING_STRATEGIES: &[(&str, &str)] = &[
    ("identity", "Identity"),
    ("camelCase", "CamelCase"),
    ("PascalCase", "PascalCase"),
    ("snake_case", "SnakeCase"),
    ("kebab-case", "KebabCase"),
    ("SCREAMING_SNAKE_CASE", "ScreamingSnakeCase"),
    ("lowercase", "LowerCase"),
    ("lower.dot.case", "LowerDotCase"),
];

/// `#[mapped(creator(call = .., args = [..], optional = [..]))]`
pub(crate) struct CreatorAttribute {
    pub call: Expr,
    pub args: Vec<LitStr>,
    pub optional: Vec<LitStr>,
}

/// Type-level `#[mapped(...)]` attributes.
#[derive(Default)]
pub(crate) struct TypeAttributes {
    /// `default`: read through `Default` and compare against it.
    pub default: Option<Span>,
    pub type_name: Option<LitStr>,
    pub include: Option<Ident>,
    pub ignore_unknown: Option<bool>,
    pub ignore_properties: Vec<LitStr>,
    pub allow_getters: bool,
    pub allow_setters: bool,
    pub rename_all: Option<Ident>,
    pub visibility: Option<(Ident, Ident)>,
    pub ignore_type: bool,
    pub creator: Option<CreatorAttribute>,
    pub map_creator: Option<Expr>,
    /// `value = path`: written as the single value `path` returns.
    pub value: Option<Expr>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(MAPPED_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;
        if path.is_ident("default") {
            self.default = Some(meta.path.span());
        } else if path.is_ident("type_name") {
            self.type_name = Some(meta.value()?.parse()?);
        } else if path.is_ident("include") {
            self.include = Some(parse_ident_of(&meta, INCLUDE_POLICIES)?);
        } else if path.is_ident("ignore_unknown") {
            self.ignore_unknown = Some(match meta.input.peek(syn::Token![=]) {
                true => meta.value()?.parse::<syn::LitBool>()?.value,
                false => true,
            });
        } else if path.is_ident("ignore_properties") {
            self.ignore_properties.extend(parse_str_list(meta.value()?)?);
        } else if path.is_ident("allow_getters") {
            self.allow_getters = true;
        } else if path.is_ident("allow_setters") {
            self.allow_setters = true;
        } else if path.is_ident("ignore_type") {
            self.ignore_type = true;
        } else if path.is_ident("rename_all") {
            let lit: LitStr = meta.value()?.parse()?;
            let value = lit.value();
            let Some((_, variant)) = NAMING_STRATEGIES.iter().find(|(name, _)| *name == value) else {
                return Err(syn::Error::new(lit.span(), "unknown naming strategy"));
            };
            self.rename_all = Some(Ident::new(variant, lit.span()));
        } else if path.is_ident("visibility") {
            let mut write = Ident::new("Any", meta.path.span());
            let mut read = Ident::new("NonPrivate", meta.path.span());
            meta.parse_nested_meta(|inner| {
                if inner.path.is_ident("write") {
                    write = parse_ident_of(&inner, MIN_VISIBILITIES)?;
                } else if inner.path.is_ident("read") {
                    read = parse_ident_of(&inner, MIN_VISIBILITIES)?;
                } else {
                    return Err(inner.error("expected `write` or `read`"));
                }
                Ok(())
            })?;
            self.visibility = Some((write, read));
        } else if path.is_ident("creator") {
            if self.creator.is_some() {
                return Err(meta.error("more than one creator declared"));
            }
            self.creator = Some(parse_creator(&meta)?);
        } else if path.is_ident("map_creator") {
            if self.map_creator.is_some() {
                return Err(meta.error("more than one map creator declared"));
            }
            self.map_creator = Some(meta.value()?.parse()?);
        } else if path.is_ident("value") {
            if self.value.is_some() {
                return Err(meta.error("more than one value writer declared"));
            }
            self.value = Some(meta.value()?.parse()?);
        } else {
            return Err(meta.error("unknown type-level `mapped` attribute"));
        }
        Ok(())
    }
}

fn parse_creator(meta: &ParseNestedMeta<'_>) -> syn::Result<CreatorAttribute> {
    let mut call = None;
    let mut args = Vec::new();
    let mut optional = Vec::new();
    meta.parse_nested_meta(|inner| {
        if inner.path.is_ident("call") {
            call = Some(inner.value()?.parse::<Expr>()?);
        } else if inner.path.is_ident("args") {
            args = parse_str_list(inner.value()?)?;
        } else if inner.path.is_ident("optional") {
            optional = parse_str_list(inner.value()?)?;
        } else {
            return Err(inner.error("expected `call`, `args` or `optional`"));
        }
        Ok(())
    })?;
    let Some(call) = call else {
        return Err(meta.error("creator needs `call = path::to::fn`"));
    };
    if let Some(stray) = optional.iter().find(|o| !args.iter().any(|a| a.value() == o.value())) {
        return Err(syn::Error::new(stray.span(), "optional argument missing from `args`"));
    }
    Ok(CreatorAttribute {
        call,
        args,
        optional,
    })
}
