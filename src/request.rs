use std::ops::{Deref, DerefMut};

use indexmap::IndexMap;
use serde::de::Error as _;
use serde::Serialize;

use crate::{ParseRequestError, Result, Value, VariablePath};

/// Variables of a GraphQL request.
///
/// Keys keep the order of the operations document. After injection some values are
/// [`Value::Upload`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Variables(IndexMap<String, Value>);

impl Variables {
    /// Get the variables as a [`Value::Object`].
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Borrow the slot `path` points to.
    pub fn resolve_mut(&mut self, path: &VariablePath) -> Result<&mut Value> {
        Ok(path.resolve_mut(&mut self.0)?)
    }
}

impl Deref for Variables {
    type Target = IndexMap<String, Value>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Variables {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<IndexMap<String, Value>> for Variables {
    fn from(variables: IndexMap<String, Value>) -> Self {
        Variables(variables)
    }
}

/// A GraphQL request assembled from an upload.
///
/// Once returned from [`receive_body`](crate::http::receive_body) it is ready to execute: every
/// file the client sent sits in `variables` where its placeholder was.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    /// The query source of the request.
    pub query: String,

    /// The operation name of the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,

    /// The variables of the request.
    pub variables: Variables,
}

impl UploadRequest {
    /// Create a request object with query source.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            operation_name: None,
            variables: Variables::default(),
        }
    }

    /// Specify the operation name of the request.
    pub fn operation_name<T: Into<String>>(self, name: T) -> Self {
        Self {
            operation_name: Some(name.into()),
            ..self
        }
    }

    /// Specify the variables.
    pub fn variables(self, variables: Variables) -> Self {
        Self { variables, ..self }
    }

    /// Parse the `operations` field.
    ///
    /// Text that is not JSON fails with [`ParseRequestError::InvalidJson`]; JSON without a
    /// non-empty `query` string fails with [`ParseRequestError::NoQuery`]. Missing or `null`
    /// variables become an empty object. A non-string `operationName` is dropped.
    pub fn from_operations(operations: impl AsRef<[u8]>) -> Result<Self> {
        let value: Value = serde_json::from_slice(operations.as_ref())
            .map_err(ParseRequestError::InvalidJson)?;
        let mut envelope = match value {
            Value::Object(obj) => obj,
            _ => return Err(ParseRequestError::NoQuery),
        };

        let query = match envelope.remove("query") {
            Some(Value::String(query)) if !query.is_empty() => query,
            _ => return Err(ParseRequestError::NoQuery),
        };

        let operation_name = match envelope.remove("operationName") {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };

        let variables = match envelope.remove("variables") {
            None | Some(Value::Null) => Variables::default(),
            Some(Value::Object(variables)) => Variables(variables),
            Some(_) => {
                return Err(ParseRequestError::InvalidJson(serde_json::Error::custom(
                    "`variables` must be an object",
                )))
            }
        };

        Ok(Self {
            query,
            operation_name,
            variables,
        })
    }
}
