pub mod consent;
pub mod error;
pub mod registry;

use std::sync::Arc;

use tracing::{event, Level};
use warp::reply::Response;
use warp::Reply;

use crate::auth::error::{ErrorKind, ErrorResponse};
use crate::auth::{
    AuthorizeRequest, GrantCheck, GrantErrorHandler, GrantHandler, PerClientGrant, RedirectGrant,
};
use crate::core::models::{Consent, UserInfo};
use crate::core::types::{ClientId, GrantMethod, RedirectUri, Scope};
use crate::http::encoding::error::{AuthRejection, JsonGrantError};
use crate::http::encoding::reply::{Redirect, WithState};
use crate::http::request::HttpRequest;
use crate::http::response::ResponseWriter;

use consent::MemoryConsentStore;
use registry::ClientRegistry;

pub type ServerGrantCheck =
    GrantCheck<Arc<MemoryConsentStore>, Box<dyn GrantHandler>, Box<dyn GrantErrorHandler>>;

#[derive(Debug, Clone)]
#[derive(serde::Deserialize)]
pub struct AuthorizeQuery {
    pub client_id: ClientId,
    pub redirect_uri: RedirectUri,
    #[serde(default)]
    pub scope: Scope,
    pub state: Option<String>,
}

/// Body returned once the grant is settled and the server may go on to
/// issue a code or token.
#[derive(Debug, Clone, PartialEq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct GrantApproved {
    pub subject: String,
    pub client_id: ClientId,
    pub scope: Scope,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

#[derive(Debug)]
pub enum AuthorizeResponse {
    /// A grant handler already produced the response.
    Written(Response),
    Approved(GrantApproved),
    Denied(Redirect<WithState<ErrorResponse<ErrorKind>>>),
}

impl Reply for AuthorizeResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Written(r) => r,
            Self::Approved(a) => warp::reply::json(&a).into_response(),
            Self::Denied(r) => r.into_response(),
        }
    }
}

pub struct GrantProvider {
    clients: ClientRegistry,
    consents: Arc<MemoryConsentStore>,
    check: ServerGrantCheck,
    expiration: i64,
}

impl std::fmt::Debug for GrantProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "GrantProvider {{ clients: {}, .. }}", self.clients.len())
    }
}

impl GrantProvider {
    pub fn new(
        clients: ClientRegistry,
        consents: Arc<MemoryConsentStore>,
        handler: Box<dyn GrantHandler>,
        expiration: i64,
    ) -> Self {
        let check = GrantCheck::new(
            Arc::clone(&consents),
            handler,
            Box::new(JsonGrantError) as Box<dyn GrantErrorHandler>,
        );
        Self {
            clients,
            consents,
            check,
            expiration,
        }
    }

    /// Provider whose unknown grants are resolved per client, prompting
    /// through `consent_url` when that is the effective method.
    pub fn per_client(
        clients: ClientRegistry,
        consent_url: &str,
        default_method: GrantMethod,
        expiration: i64,
    ) -> Self {
        let handler = PerClientGrant::new(RedirectGrant::new(consent_url), default_method);
        Self::new(
            clients,
            Arc::new(MemoryConsentStore::new()),
            Box::new(handler),
            expiration,
        )
    }

    #[tracing::instrument(skip_all)]
    pub fn authorization_request(
        &self,
        query: AuthorizeQuery,
        user: Option<UserInfo>,
        http: HttpRequest,
    ) -> Result<AuthorizeResponse, AuthRejection> {
        let client = self
            .clients
            .get(&query.client_id)
            .ok_or_else(|| AuthRejection::BadRequest("unknown client".to_string()))?;

        if !self.clients.check_redirect_uri(&query.client_id, &query.redirect_uri) {
            return Err(AuthRejection::BadRequest("redirect_uri not registered".to_string()));
        }

        let mut req = AuthorizeRequest {
            authorized: true,
            user,
            client: client.clone(),
            scope: query.scope,
            expiration: self.expiration,
            redirect_uri: query.redirect_uri,
            state: query.state,
            http,
        };
        let mut w = ResponseWriter::new();

        let disposition = self.check.handle_authorize(&mut req, &mut w);

        if disposition.handled {
            return match w.into_response() {
                Some(response) => Ok(AuthorizeResponse::Written(response)),
                None => Err(AuthRejection::ServerError(
                    "grant handler reported a response but wrote none".to_string(),
                )),
            };
        }

        if let Some(e) = disposition.error {
            return Err(e.into());
        }

        event!(
            Level::DEBUG,
            client_id = ?req.client.id,
            authorized = req.authorized,
            "Grant decision reached"
        );

        match (req.authorized, req.user) {
            (true, Some(user)) => Ok(AuthorizeResponse::Approved(GrantApproved {
                subject: user.name,
                client_id: req.client.id,
                scope: req.scope,
                state: req.state,
            })),
            _ => {
                let error = ErrorResponse::new(ErrorKind::AccessDenied, None);
                Ok(AuthorizeResponse::Denied(Redirect::new(
                    req.redirect_uri,
                    (error, req.state).into(),
                )))
            }
        }
    }

    pub fn record_consent(&self, consent: Consent) -> Result<(), AuthRejection> {
        if self.clients.get(&consent.client_id).is_none() {
            return Err(AuthRejection::BadRequest("unknown client".to_string()));
        }
        self.consents.record(consent).map_err(Into::into)
    }

    pub fn get_consents(&self, subject: &str) -> Result<Vec<Consent>, AuthRejection> {
        self.consents.consents(subject).map_err(Into::into)
    }

    pub fn revoke_consent(&self, subject: &str, client_id: &ClientId) -> Result<bool, AuthRejection> {
        self.consents.revoke(subject, client_id).map_err(Into::into)
    }
}
