use tracing::{event, Level};
use url::Url;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

/// Response sink handed to grant handlers.
///
/// Holds at most one response. Handlers that write report it through
/// their return value so the caller knows not to produce another.
#[derive(Debug, Default)]
pub struct ResponseWriter {
    response: Option<Response>,
}

impl ResponseWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, reply: impl Reply) {
        if self.response.is_some() {
            event!(Level::WARN, "Overwriting an already written response");
        }
        self.response = Some(reply.into_response());
    }

    pub fn redirect(&mut self, location: &Url, status: StatusCode) {
        let reply = warp::reply::with_header(
            warp::reply::with_status(warp::reply(), status),
            "location",
            location.as_str(),
        );
        self.write(reply)
    }

    pub fn is_written(&self) -> bool {
        self.response.is_some()
    }

    pub fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    pub fn into_response(self) -> Option<Response> {
        self.response
    }
}
