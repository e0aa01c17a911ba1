//! Uploaded file handles.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom};
use std::sync::Arc;

use bytes::Bytes;
use http::HeaderMap;
use mime::Mime;
use tempfile::NamedTempFile;

/// Metadata and content handle of one uploaded file part.
///
/// Small files are kept in memory, larger ones live in a temporary file that is removed once the
/// last clone of the handle is dropped. The content is only read through [`FileHeader::open`].
#[derive(Debug, Clone)]
pub struct FileHeader {
    file_name: String,
    content_type: Option<Mime>,
    headers: HeaderMap,
    size: u64,
    content: FileContent,
}

#[derive(Debug, Clone)]
enum FileContent {
    Memory(Bytes),
    Disk(Arc<NamedTempFile>),
}

impl FileHeader {
    /// Creates a handle over content held in memory.
    pub fn in_memory<S: Into<String>>(file_name: S, content_type: Option<Mime>, content: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type,
            headers: HeaderMap::new(),
            size: content.len() as u64,
            content: FileContent::Memory(content),
        }
    }

    pub(crate) fn on_disk(file_name: String, content_type: Option<Mime>, size: u64, file: NamedTempFile) -> Self {
        Self { file_name, content_type, headers: HeaderMap::new(), size, content: FileContent::Disk(Arc::new(file)) }
    }

    pub(crate) fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// The client supplied file name, reduced to its last path component.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }

    /// The headers of the multipart part the file was sent in.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The content length in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Returns true if the content is held in memory rather than in a temporary file.
    pub fn is_in_memory(&self) -> bool {
        matches!(self.content, FileContent::Memory(_))
    }

    /// Opens the content for reading, starting at the first byte.
    pub fn open(&self) -> io::Result<FileReader> {
        let kind = match &self.content {
            FileContent::Memory(bytes) => ReaderKind::Memory(Cursor::new(bytes.clone())),
            FileContent::Disk(file) => ReaderKind::Disk(file.reopen()?),
        };
        Ok(FileReader { kind })
    }
}

/// A reader over the content of a [`FileHeader`].
#[derive(Debug)]
pub struct FileReader {
    kind: ReaderKind,
}

#[derive(Debug)]
enum ReaderKind {
    Memory(Cursor<Bytes>),
    Disk(File),
}

impl Read for FileReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.kind {
            ReaderKind::Memory(cursor) => cursor.read(buf),
            ReaderKind::Disk(file) => file.read(buf),
        }
    }
}

impl Seek for FileReader {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        match &mut self.kind {
            ReaderKind::Memory(cursor) => cursor.seek(pos),
            ReaderKind::Disk(file) => file.seek(pos),
        }
    }
}
