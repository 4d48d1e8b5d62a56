use serde::Serialize;

use crate::UploadRequest;

/// Runs an assembled request.
///
/// This is the seam to the GraphQL engine. Parsing, validating and resolving the query happen
/// behind it; uploads reach resolvers as [`Value::Upload`](crate::Value::Upload) in the
/// variables.
#[async_trait::async_trait]
pub trait Executor: Clone + Send + Sync + 'static {
    /// Execute a request.
    async fn execute(&self, request: UploadRequest) -> Response;
}

/// An error raised while executing a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerError {
    /// An explanatory message of the error.
    pub message: String,
}

impl ServerError {
    /// Create a new server error with the message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Query response.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Response {
    /// Data of query result.
    pub data: serde_json::Value,

    /// Errors.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ServerError>,
}

impl Response {
    /// Create a new successful response with the data.
    #[must_use]
    pub fn new(data: impl Into<serde_json::Value>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    /// Create a response from some errors.
    #[must_use]
    pub fn from_errors(errors: Vec<ServerError>) -> Self {
        Self {
            data: serde_json::Value::Null,
            errors,
        }
    }

    /// Returns `true` if the response is ok.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}
