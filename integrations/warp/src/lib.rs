//! graphql-upload for warp

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;

use std::convert::Infallible;

use futures_util::TryStreamExt;
use graphql_upload::http::receive_body;
use graphql_upload::{Executor, MultipartOptions, Response, UploadRequest};
use warp::reply::Response as WarpResponse;
use warp::{Buf, Filter, Rejection, Reply};

pub use error::{handle_rejection, BadRequest};

/// GraphQL upload request filter
///
/// It outputs an assembled [`UploadRequest`]: every file of a `multipart/form-data` body is
/// already injected into the variables. Protocol errors are rejected with [`BadRequest`], use
/// [`handle_rejection`] to turn them into `400` responses.
///
/// # Examples
///
/// ```no_run
/// use graphql_upload::{MultipartOptions, UploadRequest};
/// use graphql_upload_warp::handle_rejection;
/// use warp::Filter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let filter = graphql_upload_warp::graphql_upload(MultipartOptions::default())
///     .map(|request: UploadRequest| request.query)
///     .recover(handle_rejection);
/// warp::serve(filter).run(([0, 0, 0, 0], 8000)).await;
/// # }
/// ```
pub fn graphql_upload(
    opts: MultipartOptions,
) -> impl Filter<Extract = (UploadRequest,), Error = Rejection> + Clone {
    warp::post()
        .and(warp::header::optional::<String>("content-type"))
        .and(warp::body::stream())
        .and_then(move |content_type: Option<String>, body| async move {
            let body = TryStreamExt::map_ok(body, |mut buf| {
                let len = Buf::remaining(&buf);
                Buf::copy_to_bytes(&mut buf, len)
            });
            receive_body(content_type, body, opts)
                .await
                .map_err(|err| warp::reject::custom(BadRequest(err)))
        })
}

/// GraphQL upload endpoint
///
/// Assembles the request like [`graphql_upload`] and runs it on `executor`.
pub fn graphql_upload_executor<E: Executor>(
    executor: E,
    opts: MultipartOptions,
) -> impl Filter<Extract = (GraphQLResponse,), Error = Rejection> + Clone {
    graphql_upload(opts).and_then(move |request: UploadRequest| {
        let executor = executor.clone();
        async move { Ok::<_, Infallible>(GraphQLResponse::from(executor.execute(request).await)) }
    })
}

/// Reply for a GraphQL response
pub struct GraphQLResponse(pub Response);

impl From<Response> for GraphQLResponse {
    fn from(resp: Response) -> Self {
        GraphQLResponse(resp)
    }
}

impl Reply for GraphQLResponse {
    fn into_response(self) -> WarpResponse {
        warp::reply::json(&self.0).into_response()
    }
}
