use tracing::{event, Level};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::error::{ErrorKind, ErrorResponse};
use crate::auth::{Disposition, Error, GrantErrorHandler};
use crate::http::request::HttpRequest;
use crate::http::response::ResponseWriter;

#[derive(Debug, Clone)]
pub enum AuthRejection {
    BadRequest(String),
    ServerError(String),
}

impl warp::reject::Reject for AuthRejection {}

impl From<crate::auth::Error> for AuthRejection {
    fn from(error: crate::auth::Error) -> Self {
        Self::ServerError(error.to_string())
    }
}

impl AuthRejection {
    fn into_response(self) -> warp::reply::Response {
        let (status, kind, description) = match self {
            Self::BadRequest(d) => (StatusCode::BAD_REQUEST, ErrorKind::InvalidRequest, d),
            Self::ServerError(d) => (StatusCode::INTERNAL_SERVER_ERROR, ErrorKind::ServerError, d),
        };
        let body = ErrorResponse::new(kind, Some(description));
        warp::reply::with_status(warp::reply::json(&body), status).into_response()
    }
}

pub async fn handle_reject(err: Rejection) -> Result<impl Reply, Rejection> {
    match err.find::<AuthRejection>() {
        Some(e) => Ok(e.clone().into_response()),
        None => Err(err),
    }
}

/// Renders grant errors as an OAuth `server_error` JSON body.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGrantError;

impl GrantErrorHandler for JsonGrantError {
    fn grant_error(&self, err: Error, w: &mut ResponseWriter, req: &HttpRequest) -> Disposition {
        event!(Level::ERROR, error = %err, url = %req.url(), "Grant check failed");
        w.write(AuthRejection::ServerError(err.to_string()).into_response());
        Disposition::handled()
    }
}
