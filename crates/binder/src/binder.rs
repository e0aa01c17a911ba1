//! The request body binder: content type dispatch and the four binding strategies.

use std::path::{Path, PathBuf};

use bytes::{Buf, Bytes};
use futures::TryStreamExt;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, Request};
use http_body::Body;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::form::{parse_multipart, parse_urlencoded, MultipartLimits};
use crate::{map_form, BindError, BoxError, ContentKind, FormRecord};

/// Default in-memory budget for multipart bodies, 16 MiB.
pub const DEFAULT_MAX_MEMORY: u64 = 16 << 20;

/// Default size limit for url-encoded bodies, 10 MiB.
pub const DEFAULT_MAX_FORM_SIZE: usize = 10 << 20;

/// Binds request bodies into destination records.
///
/// A `Binder` only holds limits, it can be shared between requests.
///
/// # Example
/// ```
/// # use micro_binder::{Binder, FormRecord};
/// # use serde::Deserialize;
/// # use http_body_util::Full;
/// # use bytes::Bytes;
/// #[derive(FormRecord, Deserialize, Default, Debug)]
/// struct User {
///     #[form(key = "name")]
///     name: String,
///     #[form(key = "zip")]
///     zip: String,
/// }
///
/// # async fn handle() -> Result<(), micro_binder::BindError> {
/// let request = http::Request::builder()
///     .header(http::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
///     .body(Full::new(Bytes::from_static(b"name=hello&zip=world")))
///     .unwrap();
///
/// let binder = Binder::builder().max_memory(4 << 20).build();
/// let mut user = User::default();
/// binder.bind(request, &mut user).await?;
/// assert_eq!(user.name, "hello");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Binder {
    max_memory: u64,
    max_form_size: usize,
    temp_dir: Option<PathBuf>,
}

impl Default for Binder {
    fn default() -> Self {
        BinderBuilder::new().build()
    }
}

impl Binder {
    pub fn builder() -> BinderBuilder {
        BinderBuilder::new()
    }

    pub fn max_memory(&self) -> u64 {
        self.max_memory
    }

    pub fn max_form_size(&self) -> usize {
        self.max_form_size
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }

    /// Binds the request body into `target`, choosing the strategy from the `Content-Type` header.
    ///
    /// On error, fields already assigned by the form strategies keep their new values.
    pub async fn bind<B, T>(&self, req: Request<B>, target: &mut T) -> Result<(), BindError>
    where
        B: Body + Send,
        B::Error: Into<BoxError>,
        T: DeserializeOwned + FormRecord,
    {
        let content_type = content_type(req.headers())?;
        let kind = ContentKind::classify(&content_type)
            .ok_or_else(|| BindError::unsupported_content_type(&content_type))?;

        debug!(content_type = %content_type, strategy = %kind, "bind request body");

        match kind {
            ContentKind::Json => self.bind_json(req, target).await,
            ContentKind::Xml => self.bind_xml(req, target).await,
            ContentKind::Form => self.bind_form(req, target).await,
            ContentKind::Multipart => self.bind_multipart(req, target).await,
        }
    }

    /// Decodes the first JSON value of the body into `target`.
    ///
    /// The decoded value replaces `target` as a whole, fields are not merged. A record bound from
    /// partial bodies needs `#[serde(default)]` for the fields that may be missing.
    pub async fn bind_json<B, T>(&self, req: Request<B>, target: &mut T) -> Result<(), BindError>
    where
        B: Body,
        B::Error: Into<BoxError>,
        T: DeserializeOwned,
    {
        let bytes = read_body(req.into_body()).await?;
        let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
        *target = T::deserialize(&mut deserializer)?;
        Ok(())
    }

    /// Decodes the XML document of the body into `target`.
    ///
    /// As with [`Binder::bind_json`], the decoded value replaces `target`, missing fields need
    /// `#[serde(default)]`.
    pub async fn bind_xml<B, T>(&self, req: Request<B>, target: &mut T) -> Result<(), BindError>
    where
        B: Body,
        B::Error: Into<BoxError>,
        T: DeserializeOwned,
    {
        let bytes = read_body(req.into_body()).await?;
        *target = quick_xml::de::from_reader(bytes.as_ref())?;
        Ok(())
    }

    /// Binds an `application/x-www-form-urlencoded` body, followed by the query string values.
    pub async fn bind_form<B, T>(&self, req: Request<B>, target: &mut T) -> Result<(), BindError>
    where
        B: Body,
        B::Error: Into<BoxError>,
        T: FormRecord + ?Sized,
    {
        let (parts, body) = req.into_parts();
        let bytes = Limited::new(body, self.max_form_size).collect().await.map_err(|e| {
            if e.is::<LengthLimitError>() {
                BindError::form_parse("form body too large")
            } else {
                BindError::read_body(e)
            }
        })?;

        let form = parse_urlencoded(&bytes.to_bytes(), parts.uri.query())?;
        map_form(&form, target)
    }

    /// Binds a `multipart/form-data` body, text parts and uploaded files.
    pub async fn bind_multipart<B, T>(&self, req: Request<B>, target: &mut T) -> Result<(), BindError>
    where
        B: Body + Send,
        B::Error: Into<BoxError>,
        T: FormRecord + ?Sized,
    {
        let content_type = content_type(req.headers())?;
        let boundary = multer::parse_boundary(&content_type)?;

        let stream = req.into_body().into_data_stream().map_ok(|mut data| data.copy_to_bytes(data.remaining()));
        let limits = MultipartLimits { max_memory: self.max_memory, temp_dir: self.temp_dir.as_deref() };

        let form = parse_multipart(stream, boundary, limits).await?;
        map_form(&form, target)
    }
}

/// Builder for [`Binder`], starting from the default limits.
#[derive(Debug, Clone)]
pub struct BinderBuilder {
    max_memory: u64,
    max_form_size: usize,
    temp_dir: Option<PathBuf>,
}

impl BinderBuilder {
    fn new() -> Self {
        Self { max_memory: DEFAULT_MAX_MEMORY, max_form_size: DEFAULT_MAX_FORM_SIZE, temp_dir: None }
    }

    /// Bytes of multipart content kept in memory before files are spilled to disk.
    pub fn max_memory(mut self, max_memory: u64) -> Self {
        self.max_memory = max_memory;
        self
    }

    /// Largest accepted url-encoded body.
    pub fn max_form_size(mut self, max_form_size: usize) -> Self {
        self.max_form_size = max_form_size;
        self
    }

    /// Directory for spilled multipart files, the system temp directory if unset.
    pub fn temp_dir<P: Into<PathBuf>>(mut self, temp_dir: P) -> Self {
        self.temp_dir = Some(temp_dir.into());
        self
    }

    pub fn build(self) -> Binder {
        Binder { max_memory: self.max_memory, max_form_size: self.max_form_size, temp_dir: self.temp_dir }
    }
}

/// Binds the request body into `target` with the default limits.
///
/// See [`Binder::bind`].
pub async fn bind<B, T>(req: Request<B>, target: &mut T) -> Result<(), BindError>
where
    B: Body + Send,
    B::Error: Into<BoxError>,
    T: DeserializeOwned + FormRecord,
{
    Binder::default().bind(req, target).await
}

fn content_type(headers: &HeaderMap) -> Result<String, BindError> {
    headers
        .get(CONTENT_TYPE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .filter(|value| !value.is_empty())
        .ok_or(BindError::MissingContentType)
}

async fn read_body<B>(body: B) -> Result<Bytes, BindError>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    body.collect().await.map(|collected| collected.to_bytes()).map_err(BindError::read_body)
}
