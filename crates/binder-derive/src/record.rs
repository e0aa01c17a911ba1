use proc_macro2::TokenStream;
use quote::quote;
use syn::{parse_quote, Data, DeriveInput, Fields, GenericParam, Generics, Result};

use crate::attr::FieldAttrs;

pub(crate) fn expand(input: DeriveInput) -> Result<TokenStream> {
    let ident = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => named.named.iter().collect::<Vec<_>>(),
            Fields::Unit => Vec::new(),
            Fields::Unnamed(_) => {
                return Err(syn::Error::new_spanned(ident, "FormRecord requires a struct with named fields"));
            }
        },
        _ => return Err(syn::Error::new_spanned(ident, "FormRecord can only be derived for structs")),
    };

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let attrs = FieldAttrs::from_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }

        // named fields always carry an ident
        let Some(field_ident) = &field.ident else { continue };
        let name = field_ident.to_string();
        let key = match &attrs.key {
            Some(key) => quote! { ::core::option::Option::Some(#key) },
            None => quote! { ::core::option::Option::None },
        };

        descriptors.push(quote! {
            ::micro_binder::FieldDescriptor::new(
                #name,
                #key,
                ::micro_binder::IntoFieldSlot::field_slot(&mut self.#field_ident),
            )
        });
    }

    let generics = add_slot_bounds(input.generics.clone());
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::micro_binder::FormRecord for #ident #ty_generics #where_clause {
            fn form_fields(&mut self) -> ::std::vec::Vec<::micro_binder::FieldDescriptor<'_>> {
                ::std::vec![#(#descriptors),*]
            }
        }

        impl #impl_generics ::micro_binder::IntoFieldSlot for #ident #ty_generics #where_clause {
            fn field_slot(&mut self) -> ::micro_binder::FieldSlot<'_> {
                ::micro_binder::FieldSlot::Record(self)
            }
        }
    })
}

fn add_slot_bounds(mut generics: Generics) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(type_param) = param {
            type_param.bounds.push(parse_quote!(::micro_binder::IntoFieldSlot));
        }
    }
    generics
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(tokens: TokenStream) -> String {
        tokens.to_string().chars().filter(|c| !c.is_whitespace()).collect()
    }

    #[test]
    fn expands_named_fields_in_order() {
        let input: DeriveInput = parse_quote! {
            struct Profile {
                #[form(key = "name")]
                name: String,
                #[form(skip)]
                cache: u64,
                address: Address,
            }
        };

        let tokens = compact(expand(input).unwrap());

        let name = tokens.find("\"name\"").unwrap();
        let address = tokens.find("\"address\"").unwrap();
        assert!(name < address);
        assert!(!tokens.contains("cache"));
        assert!(tokens.contains("FieldSlot::Record(self)"));
    }

    #[test]
    fn bounds_type_parameters() {
        let input: DeriveInput = parse_quote! {
            struct Wrapper<T> {
                #[form(key = "inner")]
                inner: T,
            }
        };

        let tokens = compact(expand(input).unwrap());
        assert!(tokens.contains("T:::micro_binder::IntoFieldSlot"));
    }

    #[test]
    fn rejects_enums_and_tuple_structs() {
        let input: DeriveInput = parse_quote! { enum Choice { A, B } };
        assert!(expand(input).is_err());

        let input: DeriveInput = parse_quote! { struct Pair(String, String); };
        assert!(expand(input).is_err());
    }

    #[test]
    fn unit_struct_has_no_fields() {
        let input: DeriveInput = parse_quote! { struct Empty; };
        let tokens = compact(expand(input).unwrap());
        assert!(tokens.contains("::std::vec![]"));
    }
}
