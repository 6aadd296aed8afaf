use std::collections::HashMap;
use std::sync::RwLock;

use tracing::{event, Level};

use crate::auth::{Error, Grant, GrantChecker};
use crate::core::models::{Consent, UserInfo};
use crate::core::types::ClientId;

type Key = (String, ClientId);

/// Consents held in process memory.
///
/// A grant counts as authorized when the user's consent for the client
/// covers every requested scope token.
#[derive(Debug, Default)]
pub struct MemoryConsentStore {
    consents: RwLock<HashMap<Key, Consent>>,
}

fn poisoned<T>(_: T) -> Error {
    Error::checker("consent store lock poisoned")
}

impl MemoryConsentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `consent`, replacing an earlier one for the same user and client.
    pub fn record(&self, consent: Consent) -> Result<(), Error> {
        let key = (consent.subject.clone(), consent.client_id.clone());
        event!(
            Level::DEBUG,
            subject = %consent.subject,
            client_id = %consent.client_id.0,
            scope = %consent.scope.as_str(),
            "Recording consent"
        );
        self.consents.write().map_err(poisoned)?.insert(key, consent);
        Ok(())
    }

    pub fn revoke(&self, subject: &str, client_id: &ClientId) -> Result<bool, Error> {
        let key = (subject.to_string(), client_id.clone());
        let removed = self.consents.write().map_err(poisoned)?.remove(&key);
        Ok(removed.is_some())
    }

    pub fn consents(&self, subject: &str) -> Result<Vec<Consent>, Error> {
        let consents = self.consents.read().map_err(poisoned)?;
        let mut found: Vec<Consent> = consents
            .values()
            .filter(|c| c.subject == subject)
            .cloned()
            .collect();
        found.sort_by(|a, b| a.client_id.0.cmp(&b.client_id.0));
        Ok(found)
    }
}

impl GrantChecker for MemoryConsentStore {
    fn has_authorized_client(&self, user: &UserInfo, grant: &Grant) -> Result<bool, Error> {
        let key = (user.name.clone(), grant.client().id.clone());
        let consents = self.consents.read().map_err(poisoned)?;

        Ok(consents
            .get(&key)
            .map(|c| c.scope.contains_all(grant.scope()))
            .unwrap_or(false))
    }
}
