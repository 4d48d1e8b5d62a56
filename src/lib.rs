//! # Server side of the GraphQL multipart request protocol
//!
//! **Reference:** <https://github.com/jaydenseric/graphql-multipart-request-spec>
//!
//! A client uploading files sends a `multipart/form-data` body with three kinds of parts:
//!
//! * `operations`: the GraphQL request as JSON, with `null` wherever a file belongs.
//! * `map`: JSON mapping each file field name to the variable paths it fills.
//! * one part per file, named after the keys of `map`.
//!
//! [`http::receive_body`] decodes such a body and returns an [`UploadRequest`] whose variables
//! carry a [`FileHandle`] in place of every placeholder. Any malformed input is reported as a
//! [`ParseRequestError`], whose `Display` is the exact message that goes back to the client.
//!
//! # Example Curl Request
//!
//! ```curl
//! curl 'localhost:8000' \
//! --form 'operations={
//!         "query": "mutation ($file: Upload!) { upload(file: $file)  }",
//!         "variables": { "file": null }}' \
//! --form 'map={ "0": ["variables.file"] }' \
//! --form '0=@myFile.txt'
//! ```
//!
//! # Crate features
//!
//! * `tracing`: emit `debug` events while assembling requests (enabled by default).
//! * `unblock`: provide [`FileHandle::into_async_read`] (enabled by default).

#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(feature = "nightly", feature(doc_cfg))]

mod error;
mod executor;
mod inject;
mod map;
mod options;
mod path;
mod request;
mod types;

pub mod http;

pub use error::{BodyError, MapError, ParseRequestError};
pub use executor::{Executor, Response, ServerError};
pub use map::UploadMap;
pub use options::MultipartOptions;
pub use path::VariablePath;
pub use request::{UploadRequest, Variables};
pub use types::{FileHandle, Value};

/// An alias of `std::result::Result<T, ParseRequestError>`.
pub type Result<T, E = ParseRequestError> = std::result::Result<T, E>;
