use tracing::{event, Level};

use crate::http::response::ResponseWriter;

use super::{
    AuthorizeRequest, Disposition, Grant, GrantChecker, GrantErrorHandler, GrantHandler, Outcome,
    Error,
};

/// Makes sure the scopes of an authorize request have been granted by the
/// user before the server goes on to issue anything.
pub struct GrantCheck<C, H, E> {
    check: C,
    handler: H,
    error_handler: E,
}

impl<C, H, E> GrantCheck<C, H, E>
where
    C: GrantChecker,
    H: GrantHandler,
    E: GrantErrorHandler,
{
    pub fn new(check: C, handler: H, error_handler: E) -> Self {
        Self {
            check,
            handler,
            error_handler,
        }
    }

    /// Runs the grant check for `req`.
    ///
    /// Only requests that already have `authorized` set are checked. The
    /// flag is cleared first and set again only when the grant was
    /// authorized before or the handler approves it now. When the returned
    /// disposition is `handled`, a response has been written to `w`.
    #[tracing::instrument(skip_all, fields(client_id = %req.client.id.0))]
    pub fn handle_authorize(&self, req: &mut AuthorizeRequest, w: &mut ResponseWriter) -> Disposition {
        if !req.authorized {
            return Disposition::unhandled();
        }

        req.authorized = false;

        let user = match &req.user {
            Some(user) => user,
            None => return self.fail(Error::MissingIdentity, w, req),
        };

        let grant = Grant::from_request(req);

        match self.check.has_authorized_client(user, &grant) {
            Err(e) => return self.fail(e, w, req),
            Ok(true) => {
                event!(Level::DEBUG, user = %user.name, "Grant previously authorized");
                req.authorized = true;
                return Disposition::unhandled();
            }
            Ok(false) => {}
        }

        // Handler errors are forwarded unchanged.
        let outcome = match self.handler.grant_needed(user, &grant, w, &req.http) {
            Ok(outcome) => outcome,
            Err(e) => {
                event!(Level::WARN, error = %e, "Grant handler failed");
                return Disposition::failed(e);
            }
        };

        event!(Level::DEBUG, user = %user.name, ?outcome, "Grant resolved by policy");

        match outcome {
            Outcome::Approved => {
                req.authorized = true;
                Disposition::unhandled()
            }
            Outcome::Denied => Disposition::unhandled(),
            Outcome::Deferred => Disposition::handled(),
        }
    }

    fn fail(&self, err: Error, w: &mut ResponseWriter, req: &AuthorizeRequest) -> Disposition {
        event!(Level::WARN, error = %err, "Grant check failed");
        self.error_handler.grant_error(err, w, &req.http)
    }
}
