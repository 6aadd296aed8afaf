use tracing::{event, Level};
use url::Url;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};
use warp::Rejection;

use crate::core::types::RedirectUri;

use super::error::AuthRejection;

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct WithState<T> {
    #[serde(flatten)]
    pub inner: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl<T> From<(T, Option<String>)> for WithState<T> {
    fn from((inner, state): (T, Option<String>)) -> Self {
        Self { inner, state }
    }
}

/// Redirect back to a client with `params` appended to its query.
#[derive(Debug, Clone)]
pub struct Redirect<T> {
    pub uri: RedirectUri,
    pub params: T,
}

impl<T> Redirect<T> {
    pub fn new(uri: RedirectUri, params: T) -> Self {
        Redirect { uri, params }
    }
}

#[derive(Debug, thiserror::Error)]
enum AppendError {
    #[error(transparent)]
    Url(#[from] url::ParseError),
    #[error(transparent)]
    Encode(#[from] serde_urlencoded::ser::Error),
}

fn append_params(r: &RedirectUri, p: impl serde::Serialize) -> Result<Url, AppendError> {
    let mut url = Url::parse(&r.0)?;
    let new_qs = serde_urlencoded::to_string(p)?;
    let pairs = form_urlencoded::parse(new_qs.as_bytes());
    url.query_pairs_mut().extend_pairs(pairs);
    Ok(url)
}

impl<T: serde::Serialize + Send> Reply for Redirect<T> {
    fn into_response(self) -> Response {
        match append_params(&self.uri, self.params) {
            Ok(url) => warp::reply::with_header(
                StatusCode::TEMPORARY_REDIRECT,
                "location",
                url.as_str(),
            )
            .into_response(),
            Err(e) => {
                event!(Level::ERROR, error = %e, uri = %self.uri.0, "Failed to build client redirect");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

pub fn json_encode(
    value: Result<impl serde::Serialize, impl Into<AuthRejection>>,
) -> Result<impl Reply, Rejection> {
    value
        .map(|v| warp::reply::json(&v))
        .map_err(|e| warp::reject::custom::<AuthRejection>(e.into()))
}

pub fn reply<T, E>(result: Result<T, E>) -> Result<Response, Rejection>
where
    T: Reply,
    E: Into<AuthRejection>,
{
    result
        .map(|t| t.into_response())
        .map_err(|e| warp::reject::custom(e.into()))
}
