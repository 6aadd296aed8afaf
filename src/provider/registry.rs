use std::collections::HashMap;
use std::path::Path;

use crate::core::models::Client;
use crate::core::types::{ClientId, RedirectUri};

use super::error::Error;

/// Registered clients, read once at start-up.
#[derive(Debug, Default)]
pub struct ClientRegistry {
    clients: HashMap<ClientId, Client>,
}

impl ClientRegistry {
    pub fn new(clients: Vec<Client>) -> Result<Self, Error> {
        let mut map = HashMap::with_capacity(clients.len());
        for client in clients {
            let id = client.id.clone();
            if map.insert(id.clone(), client).is_some() {
                return Err(Error::DuplicateClient(id.0));
            }
        }
        Ok(Self { clients: map })
    }

    /// Parses a JSON array of client records.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let clients: Vec<Client> = serde_json::from_str(json)?;
        Self::new(clients)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn get(&self, client_id: &ClientId) -> Option<&Client> {
        self.clients.get(client_id)
    }

    pub fn check_redirect_uri(&self, client_id: &ClientId, uri: &RedirectUri) -> bool {
        self.get(client_id)
            .map(|c| c.redirect_uris.contains(uri))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
