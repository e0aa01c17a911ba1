//! Form data parsed from `application/x-www-form-urlencoded` and `multipart/form-data` bodies.
//!
//! Both parsers produce a [`FormData`]: the text values and the uploaded files of the request,
//! each keyed by form key and kept in the order they were sent.

mod file;
mod multipart;
mod urlencoded;

pub use file::FileHeader;
pub use file::FileReader;

pub(crate) use multipart::parse_multipart;
pub(crate) use multipart::MultipartLimits;
pub(crate) use urlencoded::parse_urlencoded;

use std::collections::HashMap;

/// Text values and uploaded files of one request, keyed by form key.
#[derive(Debug, Default)]
pub struct FormData {
    values: HashMap<String, Vec<String>>,
    files: HashMap<String, Vec<FileHeader>>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every text value sent for `key`, in request order.
    pub fn values(&self, key: &str) -> Option<&[String]> {
        self.values.get(key).map(Vec::as_slice)
    }

    /// Returns every file uploaded for `key`, in request order.
    pub fn files(&self, key: &str) -> Option<&[FileHeader]> {
        self.files.get(key).map(Vec::as_slice)
    }

    pub fn push_value(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.entry(key.into()).or_default().push(value.into());
    }

    pub fn push_file(&mut self, key: impl Into<String>, file: FileHeader) {
        self.files.entry(key.into()).or_default().push(file);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.files.is_empty()
    }
}
