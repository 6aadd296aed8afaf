type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the grant decision step.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the provided user data is not a user identity")]
    MissingIdentity,

    #[error("failed to look up prior authorization: {0}")]
    Checker(#[source] BoxError),

    #[error("invalid grant redirect URL {url:?}: {source}")]
    RedirectUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("OAuth client grant method {0:?} unrecognized")]
    UnrecognizedGrantMethod(String),
}

impl Error {
    pub fn checker(e: impl Into<BoxError>) -> Self {
        Self::Checker(e.into())
    }
}

#[derive(Debug, Clone)]
#[derive(serde::Serialize)]
pub struct ErrorResponse<K> {
    #[serde(rename = "error")]
    pub kind: K,
    #[serde(rename = "error_description")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl<K> ErrorResponse<K> {
    pub fn new(kind: K, description: Option<String>) -> Self {
        Self { kind, description }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[derive(serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    InvalidRequest,
    AccessDenied,
    ServerError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrecognized_method_quotes_value() {
        let err = Error::UnrecognizedGrantMethod("bogus".to_string());
        assert_eq!(err.to_string(), "OAuth client grant method \"bogus\" unrecognized");
    }

    #[test]
    fn checker_error_keeps_source() {
        let err = Error::checker("store timeout");
        assert!(err.to_string().contains("store timeout"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn error_response_shape() {
        let body = ErrorResponse::new(ErrorKind::ServerError, Some("boom".to_string()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({"error": "server_error", "error_description": "boom"}));

        let bare = ErrorResponse::new(ErrorKind::AccessDenied, None);
        let json = serde_json::to_value(&bare).unwrap();
        assert_eq!(json, serde_json::json!({"error": "access_denied"}));
    }
}
