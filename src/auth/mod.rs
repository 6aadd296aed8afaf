use crate::core::models::{Client, UserInfo};
use crate::core::types::{RedirectUri, Scope};
use crate::http::request::HttpRequest;
use crate::http::response::ResponseWriter;

pub mod error;
pub mod grant;
pub mod handlers;

pub use error::Error;
pub use grant::GrantCheck;
pub use handlers::*;

/// An authorize request in flight through the server.
///
/// `authorized` is the only field the grant layer writes.
#[derive(Debug, Clone)]
pub struct AuthorizeRequest {
    pub authorized: bool,
    pub user: Option<UserInfo>,
    pub client: Client,
    pub scope: Scope,
    /// Lifetime in seconds of what the request would issue.
    pub expiration: i64,
    pub redirect_uri: RedirectUri,
    pub state: Option<String>,
    pub http: HttpRequest,
}

/// Snapshot of the client, scope, expiration and redirect target of one
/// authorization attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Grant {
    client: Client,
    scope: Scope,
    expiration: i64,
    redirect_uri: RedirectUri,
}

impl Grant {
    pub fn from_request(req: &AuthorizeRequest) -> Self {
        Self {
            client: req.client.clone(),
            scope: req.scope.clone(),
            expiration: req.expiration,
            redirect_uri: req.redirect_uri.clone(),
        }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    pub fn redirect_uri(&self) -> &RedirectUri {
        &self.redirect_uri
    }
}

/// What a [`GrantHandler`] decided about a grant with no prior authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Approved,
    Denied,
    /// A response has been written; the caller must not write another.
    Deferred,
}

/// Whether a response was written, and the error to report, if any.
///
/// The two values are independent: an error handler may write a response
/// and still surface the error.
#[derive(Debug)]
pub struct Disposition {
    pub handled: bool,
    pub error: Option<Error>,
}

impl Disposition {
    pub fn unhandled() -> Self {
        Self {
            handled: false,
            error: None,
        }
    }

    pub fn handled() -> Self {
        Self {
            handled: true,
            error: None,
        }
    }

    pub fn failed(error: Error) -> Self {
        Self {
            handled: false,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Looks up whether a user already authorized a grant.
pub trait GrantChecker: Send + Sync {
    fn has_authorized_client(&self, user: &UserInfo, grant: &Grant) -> Result<bool, Error>;
}

/// Decides what to do about a grant that was never authorized.
pub trait GrantHandler: Send + Sync {
    fn grant_needed(
        &self,
        user: &UserInfo,
        grant: &Grant,
        w: &mut ResponseWriter,
        req: &HttpRequest,
    ) -> Result<Outcome, Error>;
}

/// Reports an error raised while checking a grant.
pub trait GrantErrorHandler: Send + Sync {
    fn grant_error(&self, err: Error, w: &mut ResponseWriter, req: &HttpRequest) -> Disposition;
}

impl<T: GrantChecker + ?Sized> GrantChecker for Box<T> {
    fn has_authorized_client(&self, user: &UserInfo, grant: &Grant) -> Result<bool, Error> {
        (**self).has_authorized_client(user, grant)
    }
}

impl<T: GrantHandler + ?Sized> GrantHandler for Box<T> {
    fn grant_needed(
        &self,
        user: &UserInfo,
        grant: &Grant,
        w: &mut ResponseWriter,
        req: &HttpRequest,
    ) -> Result<Outcome, Error> {
        (**self).grant_needed(user, grant, w, req)
    }
}

impl<T: GrantErrorHandler + ?Sized> GrantErrorHandler for Box<T> {
    fn grant_error(&self, err: Error, w: &mut ResponseWriter, req: &HttpRequest) -> Disposition {
        (**self).grant_error(err, w, req)
    }
}

impl<T: GrantChecker + ?Sized> GrantChecker for std::sync::Arc<T> {
    fn has_authorized_client(&self, user: &UserInfo, grant: &Grant) -> Result<bool, Error> {
        (**self).has_authorized_client(user, grant)
    }
}
