use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, Ident, LitStr};

use super::parse_ident_of;
use crate::MAPPED_ATTRIBUTE_NAME;

const INCLUDE_POLICIES: &[&str] = &["Always", "NonNull", "NonAbsent", "NonEmpty", "NonDefault"];

/// Where a property's polymorphic value writes its tag.
pub(crate) enum PlacementAttribute {
    Property(LitStr),
    ExternalProperty(LitStr),
    WrapperArray,
    WrapperObject,
}

/// `#[mapped(discriminator(...))]` on a field.
pub(crate) struct DiscriminatorAttribute {
    /// `class` tags by type path, names otherwise.
    pub class: bool,
    pub placement: Option<PlacementAttribute>,
}

/// Field-level `#[mapped(...)]` attributes.
#[derive(Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    /// `property`: visible in both directions whatever the thresholds.
    pub explicit: bool,
    pub ignore: bool,
    pub ignore_read: bool,
    pub ignore_write: bool,
    pub include: Option<Ident>,
    pub codec: Option<Expr>,
    pub raw: bool,
    pub unwrapped: Option<(Option<LitStr>, Option<LitStr>)>,
    pub any_bucket: bool,
    pub discriminator: Option<DiscriminatorAttribute>,
    pub accept_single_value: Option<bool>,
    pub unwrap_single_array: Option<bool>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();
        for attr in attrs.iter().filter(|a| a.path().is_ident(MAPPED_ATTRIBUTE_NAME)) {
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }
        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> syn::Result<()> {
        let path = &meta.path;
        if path.is_ident("rename") {
            self.rename = Some(meta.value()?.parse()?);
        } else if path.is_ident("property") {
            self.explicit = true;
        } else if path.is_ident("ignore") {
            self.ignore = true;
        } else if path.is_ident("ignore_read") {
            self.ignore_read = true;
        } else if path.is_ident("ignore_write") {
            self.ignore_write = true;
        } else if path.is_ident("include") {
            self.include = Some(parse_ident_of(&meta, INCLUDE_POLICIES)?);
        } else if path.is_ident("codec") {
            self.codec = Some(meta.value()?.parse()?);
        } else if path.is_ident("raw") {
            self.raw = true;
        } else if path.is_ident("any_bucket") {
            self.any_bucket = true;
        } else if path.is_ident("accept_single_value") {
            self.accept_single_value = Some(parse_flag(&meta)?);
        } else if path.is_ident("unwrap_single_array") {
            self.unwrap_single_array = Some(parse_flag(&meta)?);
        } else if path.is_ident("unwrapped") {
            let mut prefix = None;
            let mut suffix = None;
            if meta.input.peek(syn::token::Paren) {
                meta.parse_nested_meta(|inner| {
                    if inner.path.is_ident("prefix") {
                        prefix = Some(inner.value()?.parse()?);
                    } else if inner.path.is_ident("suffix") {
                        suffix = Some(inner.value()?.parse()?);
                    } else {
                        return Err(inner.error("expected `prefix` or `suffix`"));
                    }
                    Ok(())
                })?;
            }
            self.unwrapped = Some((prefix, suffix));
        } else if path.is_ident("discriminator") {
            let mut discriminator = DiscriminatorAttribute {
                class: false,
                placement: None,
            };
            meta.parse_nested_meta(|inner| {
                let placement = if inner.path.is_ident("name") {
                    discriminator.class = false;
                    return Ok(());
                } else if inner.path.is_ident("class") {
                    discriminator.class = true;
                    return Ok(());
                } else if inner.path.is_ident("property") {
                    PlacementAttribute::Property(inner.value()?.parse()?)
                } else if inner.path.is_ident("external_property") {
                    PlacementAttribute::ExternalProperty(inner.value()?.parse()?)
                } else if inner.path.is_ident("wrapper_array") {
                    PlacementAttribute::WrapperArray
                } else if inner.path.is_ident("wrapper_object") {
                    PlacementAttribute::WrapperObject
                } else {
                    return Err(inner.error("unknown discriminator setting"));
                };
                if discriminator.placement.replace(placement).is_some() {
                    return Err(inner.error("more than one tag placement"));
                }
                Ok(())
            })?;
            self.discriminator = Some(discriminator);
        } else {
            return Err(meta.error("unknown field-level `mapped` attribute"));
        }
        Ok(())
    }
}

/// `flag` or `flag = true | false`.
fn parse_flag(meta: &ParseNestedMeta<'_>) -> syn::Result<bool> {
    if meta.input.peek(syn::Token![=]) {
        Ok(meta.value()?.parse::<syn::LitBool>()?.value)
    } else {
        Ok(true)
    }
}
