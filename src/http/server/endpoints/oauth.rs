use std::sync::Arc;

use warp::Filter;

use crate::http::encoding::{self, reply};
use crate::http::request::http_request;
use crate::provider::{AuthorizeQuery, GrantProvider};

pub fn oauth_endpoint(
    provider: Arc<GrantProvider>,
) -> impl warp::Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    let with_provider = warp::any().map(move || provider.clone());

    let authorize = warp::path("authorize")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_provider)
        .and(warp::filters::query::query())
        .and(encoding::remote_user())
        .and(http_request())
        .and_then(|provider: Arc<GrantProvider>, query: AuthorizeQuery, user, http| async move {
            reply::reply(provider.authorization_request(query, user, http))
        });

    warp::path("v1").and(authorize)
}
