use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{event, Level};
use url::Url;

use crate::core::types::GrantMethod;
use crate::http::server::Server;
use crate::provider::registry::ClientRegistry;
use crate::provider::GrantProvider;

#[derive(Debug, Parser)]
#[clap(
    name = "tomiko-grantd",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Options {
    /// Address to listen on
    #[clap(long, env = "TOMIKO_BIND", default_value = "127.0.0.1:8001")]
    pub bind: SocketAddr,
    /// JSON file listing the registered clients
    #[clap(long, env = "CLIENTS_FILE", parse(from_os_str))]
    pub clients_file: PathBuf,
    /// Interactive consent page users are sent to when prompted
    #[clap(long, env = "CONSENT_URL")]
    pub consent_url: String,
    /// Grant method for clients that do not set one (auto, prompt or deny)
    #[clap(long, env = "DEFAULT_GRANT_METHOD", default_value = "prompt")]
    pub default_grant_method: GrantMethod,
    /// Lifetime in seconds of what an approved request would issue
    #[clap(long, env = "GRANT_EXPIRATION", default_value = "600")]
    pub expiration: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Registry(#[from] crate::provider::error::Error),
    #[error("invalid consent URL {0:?}: {1}")]
    ConsentUrl(String, url::ParseError),
}

pub fn build_provider(opts: &Options) -> Result<GrantProvider, StartupError> {
    Url::parse(&opts.consent_url)
        .map_err(|e| StartupError::ConsentUrl(opts.consent_url.clone(), e))?;

    let clients = ClientRegistry::load(&opts.clients_file)?;
    event!(
        Level::INFO,
        clients = clients.len(),
        default_grant_method = %opts.default_grant_method,
        "Loaded client registry"
    );

    Ok(GrantProvider::per_client(
        clients,
        &opts.consent_url,
        opts.default_grant_method,
        opts.expiration,
    ))
}

pub async fn tomiko_grantd(opts: Options) -> Result<(), StartupError> {
    let provider = build_provider(&opts)?;
    let server = Server::new(Arc::new(provider));

    event!(Level::INFO, bind = %opts.bind, "Starting grant server");
    server.serve(opts.bind).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let opts = Options::try_parse_from(&[
            "tomiko-grantd",
            "--clients-file",
            "clients.json",
            "--consent-url",
            "https://example.com/consent",
        ])
        .unwrap();

        assert_eq!(opts.default_grant_method, GrantMethod::Prompt);
        assert_eq!(opts.expiration, 600);
        assert_eq!(opts.clients_file, PathBuf::from("clients.json"));
    }

    #[test]
    fn rejects_unknown_default_method() {
        let result = Options::try_parse_from(&[
            "tomiko-grantd",
            "--clients-file",
            "clients.json",
            "--consent-url",
            "https://example.com/consent",
            "--default-grant-method",
            "bogus",
        ]);

        assert!(result.is_err());
    }

    #[test]
    fn bad_consent_url_fails_startup() {
        let opts = Options::try_parse_from(&[
            "tomiko-grantd",
            "--clients-file",
            "/nonexistent/clients.json",
            "--consent-url",
            "not a url",
        ])
        .unwrap();

        assert!(matches!(build_provider(&opts), Err(StartupError::ConsentUrl(..))));
    }

    #[test]
    fn missing_registry_fails_startup() {
        let opts = Options::try_parse_from(&[
            "tomiko-grantd",
            "--clients-file",
            "/nonexistent/clients.json",
            "--consent-url",
            "https://example.com/consent",
        ])
        .unwrap();

        assert!(matches!(build_provider(&opts), Err(StartupError::Registry(_))));
    }
}
