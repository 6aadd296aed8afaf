use tracing::{event, Level};
use url::Url;
use warp::http::StatusCode;

use crate::core::models::{Client, UserInfo};
use crate::core::types::GrantMethod;
use crate::http::request::HttpRequest;
use crate::http::response::ResponseWriter;

use super::{Disposition, Error, Grant, GrantErrorHandler, GrantHandler, Outcome};

/// Denies every grant without writing a response.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyGrant;

impl GrantHandler for EmptyGrant {
    fn grant_needed(
        &self,
        _user: &UserInfo,
        _grant: &Grant,
        _w: &mut ResponseWriter,
        _req: &HttpRequest,
    ) -> Result<Outcome, Error> {
        Ok(Outcome::Denied)
    }
}

/// Approves every grant without writing a response.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoGrant;

impl GrantHandler for AutoGrant {
    fn grant_needed(
        &self,
        _user: &UserInfo,
        _grant: &Grant,
        _w: &mut ResponseWriter,
        _req: &HttpRequest,
    ) -> Result<Outcome, Error> {
        Ok(Outcome::Approved)
    }
}

/// Redirects the user to an interactive consent page.
///
/// The consent page receives these query parameters:
///
/// * `then`: the original request URL, to resume the authorize call
/// * `client_id`: the requesting client
/// * `scopes`: the requested scope, verbatim
/// * `redirect_uri`: the redirect URI of the original request
#[derive(Debug, Clone)]
pub struct RedirectGrant {
    url: String,
}

impl RedirectGrant {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    fn consent_url(&self, grant: &Grant, req: &HttpRequest) -> Result<Url, Error> {
        let mut url = Url::parse(&self.url).map_err(|source| Error::RedirectUrl {
            url: self.url.clone(),
            source,
        })?;

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("then", req.url().as_str())
            .append_pair("client_id", grant.client().id.as_ref())
            .append_pair("scopes", grant.scope().as_str())
            .append_pair("redirect_uri", grant.redirect_uri().as_ref())
            .finish();
        url.set_query(Some(&query));

        Ok(url)
    }
}

impl GrantHandler for RedirectGrant {
    fn grant_needed(
        &self,
        _user: &UserInfo,
        grant: &Grant,
        w: &mut ResponseWriter,
        req: &HttpRequest,
    ) -> Result<Outcome, Error> {
        let url = self.consent_url(grant, req)?;
        w.redirect(&url, StatusCode::FOUND);
        Ok(Outcome::Deferred)
    }
}

/// Picks a handler from the grant method configured on the client, falling
/// back to a server-wide default when the client has none.
#[derive(Debug, Clone)]
pub struct PerClientGrant<P> {
    auto: AutoGrant,
    prompt: P,
    deny: EmptyGrant,
    default_method: GrantMethod,
}

impl<P: GrantHandler> PerClientGrant<P> {
    pub fn new(prompt: P, default_method: GrantMethod) -> Self {
        Self {
            auto: AutoGrant,
            prompt,
            deny: EmptyGrant,
            default_method,
        }
    }

    fn method_for(&self, client: &Client) -> Result<GrantMethod, Error> {
        match client.grant_method.as_deref() {
            None | Some("") => Ok(self.default_method),
            Some(method) => method.parse(),
        }
    }
}

impl<P: GrantHandler> GrantHandler for PerClientGrant<P> {
    fn grant_needed(
        &self,
        user: &UserInfo,
        grant: &Grant,
        w: &mut ResponseWriter,
        req: &HttpRequest,
    ) -> Result<Outcome, Error> {
        let method = self.method_for(grant.client())?;
        event!(Level::DEBUG, client_id = %grant.client().id.0, %method, "Resolved grant method");

        match method {
            GrantMethod::Auto => self.auto.grant_needed(user, grant, w, req),
            GrantMethod::Prompt => self.prompt.grant_needed(user, grant, w, req),
            GrantMethod::Deny => self.deny.grant_needed(user, grant, w, req),
        }
    }
}

/// Hands the error back to the caller without writing anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyGrantError;

impl GrantErrorHandler for EmptyGrantError {
    fn grant_error(&self, err: Error, _w: &mut ResponseWriter, _req: &HttpRequest) -> Disposition {
        Disposition::failed(err)
    }
}
