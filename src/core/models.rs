use super::types::*;

/// A registered OAuth client as seen by the grant layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Client {
    pub id: ClientId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub redirect_uris: Vec<RedirectUri>,
    /// Raw grant method from the registry. Unset or empty means the
    /// server-wide default applies.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grant_method: Option<String>,
}

impl Client {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ClientId(id.into()),
            name: String::new(),
            redirect_uris: Vec::new(),
            grant_method: None,
        }
    }

    pub fn with_grant_method(mut self, method: impl Into<String>) -> Self {
        self.grant_method = Some(method.into());
        self
    }
}

/// Identity of the authenticated resource owner.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct UserInfo {
    pub name: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(mut self, groups: Vec<String>) -> Self {
        self.groups = groups;
        self
    }
}

/// A recorded consent of one user for one client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Deserialize, serde::Serialize)]
pub struct Consent {
    pub subject: String,
    pub client_id: ClientId,
    pub scope: Scope,
}
