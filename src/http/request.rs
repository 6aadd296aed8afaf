use url::Url;
use warp::http::Method;
use warp::path::FullPath;
use warp::{Filter, Rejection};

/// The parts of the inbound HTTP request the grant layer looks at.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    method: Method,
    url: Url,
}

impl HttpRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self { method, url }
    }

    pub fn get(url: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Method::GET, Url::parse(url)?))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full URL of the request, including its query.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

fn reconstruct_url(
    scheme: Option<String>,
    host: Option<String>,
    path: &FullPath,
    query: &str,
) -> Result<Url, url::ParseError> {
    let scheme = scheme.unwrap_or_else(|| "http".to_string());
    let host = host.unwrap_or_else(|| "localhost".to_string());
    let mut url = Url::parse(&format!("{}://{}{}", scheme, host, path.as_str()))?;
    if !query.is_empty() {
        url.set_query(Some(query));
    }
    Ok(url)
}

pub fn http_request() -> impl Filter<Extract = (HttpRequest,), Error = Rejection> + Clone {
    let query = warp::query::raw()
        .or(warp::any().map(String::new))
        .unify();

    warp::method()
        .and(warp::header::optional::<String>("x-forwarded-proto"))
        .and(warp::header::optional::<String>("host"))
        .and(warp::path::full())
        .and(query)
        .and_then(
            |method: Method, scheme, host, path: FullPath, query: String| async move {
                reconstruct_url(scheme, host, &path, &query)
                    .map(|url| HttpRequest::new(method, url))
                    .map_err(|_| warp::reject())
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rebuilds_full_url() {
        let req = warp::test::request()
            .method("GET")
            .path("/oauth/v1/authorize?client_id=abc&scope=read")
            .header("host", "as.example")
            .filter(&http_request())
            .await
            .unwrap();

        assert_eq!(req.method(), &Method::GET);
        assert_eq!(
            req.url().as_str(),
            "http://as.example/oauth/v1/authorize?client_id=abc&scope=read"
        );
    }

    #[tokio::test]
    async fn honours_forwarded_scheme() {
        let req = warp::test::request()
            .path("/authorize")
            .header("host", "as.example")
            .header("x-forwarded-proto", "https")
            .filter(&http_request())
            .await
            .unwrap();

        assert_eq!(req.url().as_str(), "https://as.example/authorize");
    }
}
