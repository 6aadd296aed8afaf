use std::net::SocketAddr;
use std::sync::Arc;

use warp::Filter;

use crate::provider::GrantProvider;

mod endpoints;

use endpoints::{consent::consent_endpoint, oauth::oauth_endpoint};

use super::encoding::error::handle_reject;

#[derive(Debug)]
pub struct Server {
    provider: Arc<GrantProvider>,
}

impl Server {
    pub fn new(provider: Arc<GrantProvider>) -> Self {
        Self {
            provider: Arc::clone(&provider),
        }
    }

    pub fn routes(
        &self,
    ) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
        let provider = self.provider.clone();

        let oauth = warp::path("oauth").and(oauth_endpoint(provider.clone()));

        let consent = warp::path("consent").and(consent_endpoint(provider));

        oauth
            .or(consent)
            .recover(handle_reject)
            .with(warp::log("http-api"))
    }

    pub async fn serve(self, addr: SocketAddr) {
        let cors = warp::cors().allow_any_origin();
        let routes = self.routes().with(cors);

        warp::serve(routes).run(addr).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::GrantMethod;
    use crate::provider::registry::ClientRegistry;
    use warp::http::StatusCode;

    const CLIENTS: &str = r#"[
        {"id": "console", "redirect_uris": ["https://console.example/cb"], "grant_method": "auto"},
        {"id": "app", "redirect_uris": ["https://app.example/cb"]}
    ]"#;

    fn server() -> Server {
        let provider = GrantProvider::per_client(
            ClientRegistry::from_json(CLIENTS).unwrap(),
            "https://as.example/consent/ui",
            GrantMethod::Prompt,
            600,
        );
        Server::new(Arc::new(provider))
    }

    const APP_AUTHORIZE: &str =
        "/oauth/v1/authorize?client_id=app&redirect_uri=https%3A%2F%2Fapp.example%2Fcb&scope=read+write&state=s1";

    #[tokio::test]
    async fn authorize_prompts_then_approves_after_consent() {
        let server = server();
        let routes = server.routes();

        let response = warp::test::request()
            .path(APP_AUTHORIZE)
            .header("host", "as.example")
            .header("x-remote-user", "alice")
            .reply(&routes)
            .await;
        assert_eq!(response.status(), StatusCode::FOUND);

        let location = response.headers()[warp::http::header::LOCATION].to_str().unwrap();
        let location = url::Url::parse(location).unwrap();
        let then = location
            .query_pairs()
            .find(|(k, _)| k == "then")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(then, format!("http://as.example{}", APP_AUTHORIZE));

        let recorded = warp::test::request()
            .method("POST")
            .path("/consent/v1/consent")
            .json(&serde_json::json!({"subject": "alice", "client_id": "app", "scope": "read write"}))
            .reply(&routes)
            .await;
        assert_eq!(recorded.status(), StatusCode::OK);

        let resumed = warp::test::request()
            .path(APP_AUTHORIZE)
            .header("host", "as.example")
            .header("x-remote-user", "alice")
            .reply(&routes)
            .await;
        assert_eq!(resumed.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(resumed.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"subject": "alice", "client_id": "app", "scope": "read write", "state": "s1"})
        );
    }

    #[tokio::test]
    async fn authorize_unknown_client_is_bad_request() {
        let response = warp::test::request()
            .path("/oauth/v1/authorize?client_id=nope&redirect_uri=https%3A%2F%2Fapp.example%2Fcb")
            .header("x-remote-user", "alice")
            .reply(&server().routes())
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "invalid_request");
    }

    #[tokio::test]
    async fn authorize_without_user_is_server_error() {
        let response = warp::test::request()
            .path("/oauth/v1/authorize?client_id=console&redirect_uri=https%3A%2F%2Fconsole.example%2Fcb")
            .reply(&server().routes())
            .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["error"], "server_error");
    }

    #[tokio::test]
    async fn consents_can_be_listed_and_revoked() {
        let server = server();
        let routes = server.routes();

        warp::test::request()
            .method("POST")
            .path("/consent/v1/consent")
            .json(&serde_json::json!({"subject": "alice", "client_id": "app", "scope": "read"}))
            .reply(&routes)
            .await;

        let listed = warp::test::request()
            .path("/consent/v1/consent/alice")
            .reply(&routes)
            .await;
        let body: serde_json::Value = serde_json::from_slice(listed.body()).unwrap();
        assert_eq!(
            body,
            serde_json::json!([{"subject": "alice", "client_id": "app", "scope": "read"}])
        );

        let revoked = warp::test::request()
            .method("DELETE")
            .path("/consent/v1/consent/alice/app")
            .reply(&routes)
            .await;
        let body: serde_json::Value = serde_json::from_slice(revoked.body()).unwrap();
        assert_eq!(body, serde_json::json!({"revoked": true}));
    }

    #[tokio::test]
    async fn consent_for_unknown_client_is_bad_request() {
        let response = warp::test::request()
            .method("POST")
            .path("/consent/v1/consent")
            .json(&serde_json::json!({"subject": "alice", "client_id": "nope", "scope": "read"}))
            .reply(&server().routes())
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
