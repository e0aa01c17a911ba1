//! An HTTP request body binder.
//!
//! The binder reads a request body and populates a destination record, choosing the decoding
//! strategy from the `Content-Type` header:
//!
//! | Content-Type contains  | strategy                                   |
//! |------------------------|--------------------------------------------|
//! | `json`                 | [`serde_json`] decoding of the whole record |
//! | `xml`                  | [`quick_xml`] decoding of the whole record  |
//! | `form-urlencoded`      | url-encoded body plus query, field mapping |
//! | `multipart/form-data`  | multipart values and files, field mapping  |
//!
//! Form strategies populate the record field by field through its [`FormRecord`] table, which is
//! usually derived:
//!
//! ```
//! use micro_binder::{FileHeader, FormRecord};
//! use serde::Deserialize;
//!
//! #[derive(FormRecord, Deserialize, Default)]
//! struct Upload {
//!     #[form(key = "title")]
//!     title: String,
//!     #[form(key = "tags")]
//!     tags: Vec<String>,
//!     #[form(key = "file")]
//!     #[serde(skip)]
//!     file: Option<FileHeader>,
//! }
//! ```
//!
//! and bound with [`bind`] or a configured [`Binder`]:
//!
//! ```no_run
//! # use micro_binder::{FormRecord, BindError};
//! # use serde::Deserialize;
//! # #[derive(FormRecord, Deserialize, Default)]
//! # struct Upload { #[form(key = "title")] title: String }
//! async fn handle<B>(request: http::Request<B>) -> Result<Upload, BindError>
//! where
//!     B: http_body::Body + Send,
//!     B::Error: Into<micro_binder::BoxError>,
//! {
//!     let mut upload = Upload::default();
//!     micro_binder::bind(request, &mut upload).await?;
//!     Ok(upload)
//! }
//! ```

extern crate self as micro_binder;

mod binder;
mod content_type;
mod error;

pub mod form;
pub mod mapper;

pub use binder::bind;
pub use binder::Binder;
pub use binder::BinderBuilder;
pub use binder::DEFAULT_MAX_FORM_SIZE;
pub use binder::DEFAULT_MAX_MEMORY;
pub use content_type::ContentKind;
pub use error::BindError;
pub use error::BoxError;
pub use error::ConversionError;
pub use form::FileHeader;
pub use form::FileReader;
pub use form::FormData;
pub use mapper::convert;
pub use mapper::map_form;
pub use mapper::FieldDescriptor;
pub use mapper::FieldSlot;
pub use mapper::FormRecord;
pub use mapper::FormScalar;
pub use mapper::IntoFieldSlot;
pub use mapper::ScalarKind;
pub use mapper::TextSlot;

pub use micro_binder_derive::FormRecord;
