use std::fmt::{self, Debug, Formatter};
use std::fs::File;
use std::io::{self, Write};
use std::sync::Arc;

use tempfile::NamedTempFile;

/// Uploaded file.
///
/// **Reference:** <https://github.com/jaydenseric/graphql-multipart-request-spec>
///
/// A file handle replaces each `null` placeholder the `map` field points to. The content has
/// already been spooled to a temporary file, so cloning a handle is cheap and every clone reads
/// the whole content from the start. The temporary file is removed when the last clone is
/// dropped.
///
/// # Example Curl Request
///
/// ```curl
/// curl 'localhost:8000' \
/// --form 'operations={
///         "query": "mutation ($file: Upload!) { upload(file: $file)  }",
///         "variables": { "file": null }}' \
/// --form 'map={ "0": ["variables.file"] }' \
/// --form '0=@myFile.txt'
/// ```
#[derive(Clone)]
pub struct FileHandle {
    field_name: String,
    filename: String,
    content_type: Option<String>,
    content: Arc<NamedTempFile>,
}

impl FileHandle {
    /// Spool a new, empty file for the part named `field_name`.
    pub(crate) fn spool(
        field_name: impl Into<String>,
        filename: impl Into<String>,
        content_type: Option<String>,
    ) -> io::Result<Spool> {
        Ok(Spool {
            field_name: field_name.into(),
            filename: filename.into(),
            content_type,
            file: NamedTempFile::new()?,
        })
    }

    /// The multipart field name this file was sent under.
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// The filename the client sent.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// The content type the client sent, if any.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> io::Result<u64> {
        self.content.as_file().metadata().map(|meta| meta.len())
    }

    /// Open the content for reading from the start.
    pub fn into_read(self) -> io::Result<File> {
        self.content.reopen()
    }

    /// Open the content as an `AsyncRead`, reading on a blocking thread pool.
    #[cfg(feature = "unblock")]
    #[cfg_attr(feature = "nightly", doc(cfg(feature = "unblock")))]
    pub fn into_async_read(
        self,
    ) -> io::Result<impl futures_util::io::AsyncRead + Unpin + Send + 'static> {
        Ok(blocking::Unblock::new(self.into_read()?))
    }
}

impl Debug for FileHandle {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileHandle")
            .field("field_name", &self.field_name)
            .field("filename", &self.filename)
            .field("content_type", &self.content_type)
            .finish()
    }
}

/// Two handles are equal when they are clones of the same uploaded part.
impl PartialEq for FileHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }
}

/// A file part being written to disk.
pub(crate) struct Spool {
    field_name: String,
    filename: String,
    content_type: Option<String>,
    file: NamedTempFile,
}

impl Spool {
    pub(crate) fn write_chunk(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.file.write_all(chunk)
    }

    pub(crate) fn finish(mut self) -> io::Result<FileHandle> {
        self.file.flush()?;
        Ok(FileHandle {
            field_name: self.field_name,
            filename: self.filename,
            content_type: self.content_type,
            content: Arc::new(self.file),
        })
    }
}
