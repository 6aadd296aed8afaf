use std::{fmt, str::FromStr};

use crate::auth::error::Error;

/// Scope exactly as it appeared on the authorize request.
///
/// The raw string is kept verbatim so it can be echoed back to consent
/// endpoints; token-level comparisons go through `as_parts`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct Scope(pub String);

impl Scope {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_parts(&self) -> impl Iterator<Item = &str> {
        self.0.split_whitespace()
    }

    pub fn contains(&self, scope: &str) -> bool {
        self.as_parts().any(|s| s == scope)
    }

    pub fn contains_all(&self, other: &Scope) -> bool {
        other.as_parts().all(|s| self.contains(s))
    }
}

impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, Eq, Hash, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl FromStr for ClientId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl AsRef<str> for ClientId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(transparent)]
pub struct RedirectUri(pub String);

impl AsRef<str> for RedirectUri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Policy applied when a grant has not been authorized before.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantMethod {
    /// Approve without asking.
    Auto,
    /// Send the user to the interactive consent endpoint.
    Prompt,
    /// Deny without asking.
    Deny,
}

impl GrantMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Prompt => "prompt",
            Self::Deny => "deny",
        }
    }
}

impl FromStr for GrantMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Self::Auto),
            "prompt" => Ok(Self::Prompt),
            "deny" => Ok(Self::Deny),
            other => Err(Error::UnrecognizedGrantMethod(other.to_string())),
        }
    }
}

impl fmt::Display for GrantMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_keeps_raw_string() {
        let scope: Scope = serde_json::from_str("\"read  write\"").unwrap();
        assert_eq!(scope.as_str(), "read  write");
        assert_eq!(scope.as_parts().collect::<Vec<_>>(), vec!["read", "write"]);
    }

    #[test]
    fn scope_covering() {
        let granted = Scope::new("read write admin");
        assert!(granted.contains_all(&Scope::new("write read")));
        assert!(granted.contains_all(&Scope::new("")));
        assert!(!granted.contains_all(&Scope::new("read delete")));
        assert!(!Scope::new("").contains_all(&Scope::new("read")));
    }

    #[test]
    fn grant_method_parsing() {
        assert_eq!("auto".parse::<GrantMethod>().unwrap(), GrantMethod::Auto);
        assert_eq!("prompt".parse::<GrantMethod>().unwrap(), GrantMethod::Prompt);
        assert_eq!("deny".parse::<GrantMethod>().unwrap(), GrantMethod::Deny);

        let err = "Auto".parse::<GrantMethod>().unwrap_err();
        assert!(matches!(err, Error::UnrecognizedGrantMethod(ref m) if m == "Auto"));
    }

    #[test]
    fn grant_method_serde_names() {
        let method: GrantMethod = serde_json::from_str("\"deny\"").unwrap();
        assert_eq!(method, GrantMethod::Deny);
        assert_eq!(serde_json::to_string(&GrantMethod::Prompt).unwrap(), "\"prompt\"");
        assert_eq!(GrantMethod::Auto.to_string(), "auto");
    }
}
