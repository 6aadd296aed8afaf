use std::sync::Arc;

use warp::Filter;

use crate::core::models::Consent;
use crate::core::types::ClientId;
use crate::http::encoding::reply;
use crate::provider::GrantProvider;

#[derive(serde::Serialize)]
struct Recorded {
    ok: bool,
}

#[derive(serde::Serialize)]
struct Revoked {
    revoked: bool,
}

pub fn consent_endpoint(
    provider: Arc<GrantProvider>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_provider = warp::any().map(move || provider.clone());

    let all = warp::path!("consent" / String)
        .and(warp::get())
        .and(with_provider.clone())
        .and_then(|subject: String, provider: Arc<GrantProvider>| async move {
            reply::json_encode(provider.get_consents(&subject))
        });

    let set = warp::path!("consent")
        .and(warp::post())
        .and(warp::body::json())
        .and(with_provider.clone())
        .and_then(|consent: Consent, provider: Arc<GrantProvider>| async move {
            reply::json_encode(provider.record_consent(consent).map(|_| Recorded { ok: true }))
        });

    let revoke = warp::path!("consent" / String / ClientId)
        .and(warp::delete())
        .and(with_provider)
        .and_then(
            |subject: String, client_id: ClientId, provider: Arc<GrantProvider>| async move {
                reply::json_encode(
                    provider
                        .revoke_consent(&subject, &client_id)
                        .map(|revoked| Revoked { revoked }),
                )
            },
        );

    warp::path("v1").and(all.or(set).or(revoke))
}
