use crate::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str = concat!("sitecrawl/", env!("CARGO_PKG_VERSION"));

/// What came back from asking for a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTML body of a successful response.
    Page(String),
    /// Response status was 400 or above.
    HttpStatus(u16),
    /// Response was not HTML; carries the content type, if any was sent.
    NotHtml(Option<String>),
}

impl FetchOutcome {
    pub fn into_page(self) -> Option<String> {
        match self {
            FetchOutcome::Page(body) => Some(body),
            _ => None,
        }
    }
}

/// Source of page bodies for the crawl engine.
///
/// Network-level failures come back as `Err`; every other reason for not
/// having a page is a [`FetchOutcome`] variant.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch_html(&self, url: &str) -> Result<FetchOutcome>;
}

/// [`Fetcher`] backed by a reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_USER_AGENT, None)
    }

    /// No timeout is applied unless `timeout_secs` is given.
    pub fn with_config(user_agent: &str, timeout_secs: Option<u64>) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5));

        if let Some(secs) = timeout_secs {
            builder = builder
                .timeout(Duration::from_secs(secs))
                .connect_timeout(Duration::from_secs(secs.div_ceil(2)));
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch_html(&self, url: &str) -> Result<FetchOutcome> {
        debug!("Fetching {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            warn!("Got HTTP error {} fetching {}", status.as_u16(), url);
            return Ok(FetchOutcome::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let is_html = content_type
            .as_ref()
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);

        if !is_html {
            warn!("Skipping non-HTML response from {} ({:?})", url, content_type);
            return Ok(FetchOutcome::NotHtml(content_type));
        }

        let body = response.text().await?;
        Ok(FetchOutcome::Page(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_fetch_html_page() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/"))
            .and(header("user-agent", DEFAULT_USER_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html; charset=utf-8")
                    .set_body_bytes(b"<html><body><h1>Hi</h1></body></html>"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let outcome = fetcher.fetch_html(&mock_server.uri()).await.unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::Page("<html><body><h1>Hi</h1></body></html>".to_string())
        );
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(
                ResponseTemplate::new(404)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<h1>Not found</h1>"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let outcome = fetcher
            .fetch_html(&format!("{}/missing", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(outcome, FetchOutcome::HttpStatus(404));
        assert_eq!(outcome.into_page(), None);
    }

    #[tokio::test]
    async fn test_fetch_non_html() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_bytes(b"{}"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new().unwrap();
        let outcome = fetcher
            .fetch_html(&format!("{}/data.json", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            FetchOutcome::NotHtml(Some("application/json".to_string()))
        );
    }

    #[tokio::test]
    async fn test_fetch_network_failure() {
        // Nothing listens on port 1.
        let fetcher = HttpFetcher::with_config(DEFAULT_USER_AGENT, Some(5)).unwrap();
        let result = fetcher.fetch_html("http://127.0.0.1:1/").await;

        assert!(matches!(result, Err(ScanError::HttpError(_))));
    }

    #[tokio::test]
    async fn test_custom_user_agent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "custom-agent/2.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/html")
                    .set_body_bytes(b"<p>ok</p>"),
            )
            .expect(1)
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::with_config("custom-agent/2.0", None).unwrap();
        let outcome = fetcher.fetch_html(&mock_server.uri()).await.unwrap();

        assert_eq!(outcome.into_page().as_deref(), Some("<p>ok</p>"));
    }
}
