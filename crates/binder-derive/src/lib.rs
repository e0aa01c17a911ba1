//! Derive macro for `micro_binder::FormRecord`.
//!
//! ```ignore
//! #[derive(FormRecord)]
//! struct Upload {
//!     #[form(key = "title")]
//!     title: String,
//!     #[form(key = "file")]
//!     file: Option<FileHeader>,
//!     #[form(skip)]
//!     checksum: u64,
//! }
//! ```
//!
//! Each named field becomes one `FieldDescriptor`, in declaration order. `#[form(key = "...")]`
//! sets the form key, a field without it has no key and is only walked when it is a nested
//! record. `#[form(skip)]` leaves the field out of the table entirely.

mod attr;
mod record;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

#[proc_macro_derive(FormRecord, attributes(form))]
pub fn derive_form_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match record::expand(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
