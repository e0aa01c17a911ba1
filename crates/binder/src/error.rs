use std::error::Error as StdError;
use std::io;
use thiserror::Error;

use crate::mapper::ScalarKind;

pub type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Error, Debug)]
pub enum BindError {
    #[error("missing Content-Type")]
    MissingContentType,

    #[error("unsupported Content-Type: {content_type}")]
    UnsupportedContentType { content_type: String },

    #[error("read request body error: {source}")]
    ReadBody { source: BoxError },

    #[error(transparent)]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Xml {
        #[from]
        source: quick_xml::DeError,
    },

    #[error("invalid form body: {reason}")]
    FormParse { reason: String },

    #[error("invalid multipart body: {source}")]
    Multipart {
        #[from]
        source: multer::Error,
    },

    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("unknown field type `{type_name}` for field `{field}`")]
    UnknownFieldType { field: &'static str, type_name: &'static str },

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl BindError {
    pub fn unsupported_content_type<S: ToString>(str: S) -> Self {
        Self::UnsupportedContentType { content_type: str.to_string() }
    }

    pub fn form_parse<S: ToString>(str: S) -> Self {
        Self::FormParse { reason: str.to_string() }
    }

    pub fn read_body<E: Into<BoxError>>(e: E) -> Self {
        Self::ReadBody { source: e.into() }
    }

    pub fn unknown_field_type(field: &'static str, type_name: &'static str) -> Self {
        Self::UnknownFieldType { field, type_name }
    }
}

/// A raw form value that could not be converted into the declared field kind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("parsing {value:?} as {kind}: {reason}")]
pub struct ConversionError {
    kind: ScalarKind,
    value: String,
    reason: String,
}

impl ConversionError {
    pub fn new<V: Into<String>, R: ToString>(kind: ScalarKind, value: V, reason: R) -> Self {
        Self { kind, value: value.into(), reason: reason.to_string() }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The offending raw string.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}
