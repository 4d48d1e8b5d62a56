//! A helper module that supports HTTP

mod multipart;

use std::error::Error as StdError;

use bytes::Bytes;
use futures_util::stream::{Stream, StreamExt};

use crate::{BodyError, MultipartOptions, Result, UploadRequest};

/// Receive a GraphQL request from a content type and body.
///
/// A `multipart/form-data` body goes through the upload protocol: the `operations`, `map` and
/// file parts are decoded and every file is injected into the variables. Any other body is read
/// as an operations document without uploads.
///
/// A failing `body` stream, for example a client disconnecting mid-upload, is reported as
/// [`ParseRequestError::MalformedBody`](crate::ParseRequestError::MalformedBody).
pub async fn receive_body<S, O, E>(
    content_type: Option<impl AsRef<str>>,
    body: S,
    opts: MultipartOptions,
) -> Result<UploadRequest>
where
    S: Stream<Item = std::result::Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn StdError + Send + Sync>> + 'static,
{
    let content_type: Option<&str> = content_type.as_ref().map(|ct| ct.as_ref());
    let res = match content_type {
        Some(content_type) if is_multipart(content_type) => {
            match multer::parse_boundary(content_type) {
                Ok(boundary) => multipart::receive_multipart(body, boundary, opts).await,
                Err(err) => Err(err.into()),
            }
        }
        _ => receive_json(body).await,
    };

    #[cfg(feature = "tracing")]
    if let Err(err) = &res {
        tracing::debug!(error = %err, source = ?err.source(), "rejected GraphQL request");
    }

    res
}

/// Receive an operations document without uploads.
async fn receive_json<S, O, E>(body: S) -> Result<UploadRequest>
where
    S: Stream<Item = std::result::Result<O, E>>,
    O: Into<Bytes>,
    E: Into<Box<dyn StdError + Send + Sync>>,
{
    futures_util::pin_mut!(body);
    let mut data = Vec::new();
    while let Some(chunk) = body.next().await {
        let chunk: Bytes = chunk.map_err(|err| BodyError::Stream(err.into()))?.into();
        data.extend_from_slice(&chunk);
    }
    UploadRequest::from_operations(data)
}

fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .get(.."multipart/form-data".len())
        .map_or(false, |essence| {
            essence.eq_ignore_ascii_case("multipart/form-data")
        })
}
