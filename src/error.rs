use std::io;

use http::StatusCode;
use thiserror::Error;

/// Errors that can occur while turning an HTTP body into an [`UploadRequest`](crate::UploadRequest).
///
/// The `Display` output of each variant is the message sent to the client, so it never contains
/// internal detail. The underlying cause, when there is one, is available through
/// [`std::error::Error::source`].
#[derive(Debug, Error)]
pub enum ParseRequestError {
    /// The body could not be decoded as `multipart/form-data`.
    #[error("Unable to parse the multipart body")]
    MalformedBody(#[source] BodyError),

    /// The `operations` field or the `map` field is not valid JSON.
    #[error("Unable to parse the multipart body")]
    InvalidJson(#[source] serde_json::Error),

    /// The `operations` field has no usable `query`.
    #[error("No GraphQL query found in the request")]
    NoQuery,

    /// The `map` field is inconsistent with itself or with the variables.
    #[error("{0}")]
    InvalidMap(#[from] MapError),

    /// The `map` field references file fields that were not uploaded.
    #[error("File(s) missing in form data")]
    MissingFile(Vec<String>),
}

impl ParseRequestError {
    /// The HTTP status the transport should answer with.
    ///
    /// Every failure of this crate is a client input defect.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    /// The plain text body the transport should answer with, e.g.
    /// `400: No GraphQL query found in the request`.
    pub fn response_body(&self) -> String {
        format!("{}: {}", self.status().as_u16(), self)
    }
}

impl From<BodyError> for ParseRequestError {
    fn from(err: BodyError) -> Self {
        ParseRequestError::MalformedBody(err)
    }
}

impl From<multer::Error> for ParseRequestError {
    fn from(err: multer::Error) -> Self {
        ParseRequestError::MalformedBody(BodyError::Multipart(err))
    }
}

/// Why a request body could not be decoded.
#[derive(Debug, Error)]
pub enum BodyError {
    /// The multipart decoder rejected the body (bad boundary, truncated stream, size limit...).
    #[error("invalid multipart request: {0}")]
    Multipart(#[from] multer::Error),

    /// Reading the body or spooling a file part failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A non-multipart body could not be read.
    #[error("unable to read request body: {0}")]
    Stream(Box<dyn std::error::Error + Send + Sync>),

    /// The `operations` field is absent.
    #[error("missing multipart field 'operations'")]
    MissingOperations,

    /// The `map` field is absent.
    #[error("missing multipart field 'map'")]
    MissingMap,

    /// The `operations` or `map` field appears twice.
    #[error("duplicate multipart field '{0}'")]
    DuplicateField(String),

    /// More file parts than [`MultipartOptions::max_num_files`](crate::MultipartOptions::max_num_files) allows.
    #[error("exceeded the limit of {0} files in a single request")]
    TooManyFiles(usize),
}

/// Why the `map` field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    /// The `map` field is not an object of string lists.
    #[error("Invalid 'map' field, it should be an object mapping file fields to lists of paths.")]
    InvalidShape,

    /// A file field is mapped to no path at all.
    #[error("Invalid 'map' field, file field '{0}' has no paths.")]
    EmptyPaths(String),

    /// A path does not start with `variables.`.
    #[error("Invalid path '{0}' found inside 'map' field, it should start with 'variables.'.")]
    InvalidRoot(String),

    /// A path has an empty segment or no segment after `variables`.
    #[error("Invalid path '{0}' found inside 'map' field, it has an empty segment.")]
    EmptySegment(String),

    /// A path does not resolve to an existing slot in the variables.
    #[error("Invalid path '{0}' found inside 'map' field, it does not point to a valid value inside 'operations' field.")]
    PathNotFound(String),

    /// A path resolves to a slot that is not a `null` placeholder.
    #[error("Invalid path '{0}' found inside 'map' field, it should point to a null placeholder.")]
    NotPlaceholder(String),
}
