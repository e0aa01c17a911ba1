use syn::{Attribute, LitStr, Result};

const FORM_ATTR: &str = "form";

/// Options from the `#[form(...)]` attributes of one field.
#[derive(Debug, Default)]
pub(crate) struct FieldAttrs {
    pub(crate) key: Option<LitStr>,
    pub(crate) skip: bool,
}

impl FieldAttrs {
    pub(crate) fn from_attrs(attrs: &[Attribute]) -> Result<Self> {
        let mut field_attrs = FieldAttrs::default();

        for attr in attrs {
            if !attr.path().is_ident(FORM_ATTR) {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("key") {
                    if field_attrs.key.is_some() {
                        return Err(meta.error("duplicate form attribute `key`"));
                    }
                    let key: LitStr = meta.value()?.parse()?;
                    if key.value().is_empty() {
                        return Err(syn::Error::new_spanned(&key, "form key must not be empty"));
                    }
                    field_attrs.key = Some(key);
                    Ok(())
                } else if meta.path.is_ident("skip") {
                    if field_attrs.skip {
                        return Err(meta.error("duplicate form attribute `skip`"));
                    }
                    field_attrs.skip = true;
                    Ok(())
                } else {
                    Err(meta.error("unsupported form attribute, expected `key = \"...\"` or `skip`"))
                }
            })?;
        }

        if field_attrs.skip {
            if let Some(key) = &field_attrs.key {
                return Err(syn::Error::new_spanned(key, "`skip` cannot be combined with `key`"));
            }
        }

        Ok(field_attrs)
    }
}
