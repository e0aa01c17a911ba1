//! `multipart/form-data` parsing on top of `multer`.
//!
//! Text parts and small files are buffered in memory. Once a file would exceed the remaining
//! memory budget it is streamed into a temporary file instead.

use std::path::Path;

use bytes::{Bytes, BytesMut};
use futures::Stream;
use mime::Mime;
use multer::{Field, Multipart};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::{debug, trace};

use crate::form::{FileHeader, FormData};
use crate::{BindError, BoxError};

/// Extra budget for text values on top of the memory budget.
const VALUE_BYTES_RESERVE: u64 = 10 << 20;

const TEMP_FILE_PREFIX: &str = "multipart-";

#[derive(Debug, Clone, Copy)]
pub(crate) struct MultipartLimits<'a> {
    pub(crate) max_memory: u64,
    pub(crate) temp_dir: Option<&'a Path>,
}

/// Remaining byte budgets while reading one body.
struct Budget {
    memory: u64,
    values: u64,
}

pub(crate) async fn parse_multipart<S, E>(
    stream: S,
    boundary: String,
    limits: MultipartLimits<'_>,
) -> Result<FormData, BindError>
where
    S: Stream<Item = Result<Bytes, E>> + Send,
    E: Into<BoxError>,
{
    let mut multipart = Multipart::new(stream, boundary);
    let mut budget =
        Budget { memory: limits.max_memory, values: limits.max_memory.saturating_add(VALUE_BYTES_RESERVE) };
    let mut form = FormData::new();

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().filter(|name| !name.is_empty()).map(str::to_owned) else {
            trace!("skip multipart part without name");
            continue;
        };

        let file_name = field.file_name().map(base_name);
        match file_name {
            Some(file_name) if !file_name.is_empty() => {
                let file = read_file(&mut field, file_name, &mut budget, limits.temp_dir).await?;
                form.push_file(name, file);
            }
            file_name => {
                let value = read_value(&mut field, &mut budget).await?;
                // browsers send an empty file input as a part with an empty file name and no content
                if file_name.is_some() && value.is_empty() {
                    trace!(name = %name, "skip empty file input");
                    continue;
                }
                form.push_value(name, String::from_utf8_lossy(&value).into_owned());
            }
        }
    }

    Ok(form)
}

async fn read_value(field: &mut Field<'_>, budget: &mut Budget) -> Result<Bytes, BindError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if (buf.len() + chunk.len()) as u64 > budget.values {
            return Err(BindError::form_parse("multipart: message too large"));
        }
        buf.extend_from_slice(&chunk);
    }

    budget.values -= buf.len() as u64;
    Ok(buf.freeze())
}

async fn read_file(
    field: &mut Field<'_>,
    file_name: String,
    budget: &mut Budget,
    temp_dir: Option<&Path>,
) -> Result<FileHeader, BindError> {
    let content_type = field.content_type().cloned();
    let headers = field.headers().clone();

    let mut buf = BytesMut::new();
    while let Some(chunk) = field.chunk().await? {
        if (buf.len() + chunk.len()) as u64 > budget.memory {
            let file = spill_to_disk(field, file_name, content_type, buf, chunk, temp_dir).await?;
            return Ok(file.with_headers(headers));
        }
        buf.extend_from_slice(&chunk);
    }

    let size = buf.len() as u64;
    budget.memory -= size;
    budget.values = budget.values.saturating_sub(size);
    Ok(FileHeader::in_memory(file_name, content_type, buf.freeze()).with_headers(headers))
}

async fn spill_to_disk(
    field: &mut Field<'_>,
    file_name: String,
    content_type: Option<Mime>,
    buffered: BytesMut,
    pending: Bytes,
    temp_dir: Option<&Path>,
) -> Result<FileHeader, BindError> {
    let temp_file = create_temp_file(temp_dir)?;
    debug!(file_name = %file_name, path = %temp_file.path().display(), "file exceeds memory budget, spill to disk");

    let mut writer = tokio::fs::File::from_std(temp_file.reopen()?);
    writer.write_all(&buffered).await?;
    writer.write_all(&pending).await?;

    let mut size = (buffered.len() + pending.len()) as u64;
    while let Some(chunk) = field.chunk().await? {
        writer.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }
    writer.flush().await?;

    Ok(FileHeader::on_disk(file_name, content_type, size, temp_file))
}

fn create_temp_file(temp_dir: Option<&Path>) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(TEMP_FILE_PREFIX);
    match temp_dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
}

/// Keeps the last path component of a client supplied file name, ignoring trailing separators.
fn base_name(file_name: &str) -> String {
    file_name.trim_end_matches(['/', '\\']).rsplit(['/', '\\']).next().unwrap_or_default().to_owned()
}
