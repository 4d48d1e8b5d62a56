use std::error::Error;
use std::fmt::{self, Display, Formatter};

use graphql_upload::ParseRequestError;
use warp::reject::Reject;
use warp::{Rejection, Reply};

/// Bad request error.
///
/// It's a wrapper of `graphql_upload::ParseRequestError`. It is also a `Reply` - by default it
/// just returns a response containing the error message in plain text.
#[derive(Debug)]
pub struct BadRequest(pub ParseRequestError);

impl Display for BadRequest {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Error for BadRequest {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

impl Reject for BadRequest {}

impl Reply for BadRequest {
    fn into_response(self) -> warp::reply::Response {
        warp::reply::with_status(self.0.response_body(), self.0.status()).into_response()
    }
}

/// Recover [`BadRequest`] rejections into `400` replies with a body such as
/// `400: No GraphQL query found in the request`. Other rejections pass through.
pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Rejection> {
    match err.find::<BadRequest>() {
        Some(BadRequest(err)) => {
            Ok(warp::reply::with_status(err.response_body(), err.status()).into_response())
        }
        None => Err(err),
    }
}
