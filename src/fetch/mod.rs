//! Content fetcher
//!
//! Captures the HTML of pages found by the crawler. Transport failures are
//! retried with random backoff; HTTP errors and non-HTML responses are final.
//! Every successful capture is kept, keyed by URL, until [`ContentFetcher::reset`].

mod retry;

pub use retry::RetryPolicy;

use crate::config::FetcherConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Why a single fetch attempt did not produce HTML
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure; the only retryable kind
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP error {status}")]
    Http { status: u16 },

    #[error("non-HTML content: {content_type}")]
    UnexpectedContentType { content_type: String },
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

/// A captured page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    pub url: String,
    pub html: String,
}

/// Fetches page HTML and accumulates the successes
#[derive(Debug)]
pub struct ContentFetcher {
    client: Client,
    retry: RetryPolicy,
    pages: Vec<FetchedPage>,
    index: HashMap<String, usize>,
}

impl ContentFetcher {
    /// Builds a fetcher with its own HTTP client
    ///
    /// # Errors
    ///
    /// Returns an error if the user agent is not a valid header value or the
    /// client cannot be built.
    pub fn new(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout))
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self::with_client(client, RetryPolicy::from_config(config)))
    }

    pub fn with_client(client: Client, retry: RetryPolicy) -> Self {
        Self {
            client,
            retry,
            pages: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Fetches `url`, returning its HTML on success
    ///
    /// Failures are logged, never raised. A successful fetch of a URL that was
    /// captured before replaces the earlier HTML.
    pub async fn fetch(&mut self, url: &str) -> Option<String> {
        let mut retries = 0;

        loop {
            match self.attempt(url).await {
                Ok(html) => {
                    self.store(url, html.clone());
                    return Some(html);
                }
                Err(e) if e.is_retryable() && self.retry.should_retry(retries) => {
                    let wait = self.retry.backoff();
                    retries += 1;
                    tracing::warn!(
                        "Request failed for {}: {}. Retry {}/{} in {:.2}s",
                        url,
                        e,
                        retries,
                        self.retry.max_retries(),
                        wait.as_secs_f64()
                    );
                    tokio::time::sleep(wait).await;
                }
                Err(e) => {
                    tracing::warn!("Could not fetch {}: {}", url, e);
                    return None;
                }
            }
        }
    }

    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();
        if !content_type.contains("text/html") {
            return Err(FetchError::UnexpectedContentType { content_type });
        }

        Ok(response.text().await?)
    }

    fn store(&mut self, url: &str, html: String) {
        match self.index.get(url) {
            Some(&i) => self.pages[i].html = html,
            None => {
                self.index.insert(url.to_string(), self.pages.len());
                self.pages.push(FetchedPage {
                    url: url.to_string(),
                    html,
                });
            }
        }
    }

    /// Captured pages in the order they were first fetched
    pub fn results(&self) -> &[FetchedPage] {
        &self.pages
    }

    pub fn get(&self, url: &str) -> Option<&str> {
        self.index.get(url).map(|&i| self.pages[i].html.as_str())
    }

    /// Forgets all captured pages
    pub fn reset(&mut self) {
        self.pages.clear();
        self.index.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fetcher() -> ContentFetcher {
        let config = FetcherConfig {
            backoff_min: 0.0,
            backoff_max: 0.0,
            timeout: 5,
            ..FetcherConfig::default()
        };
        ContentFetcher::new(&config).unwrap()
    }

    fn html(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200)
            .insert_header("content-type", "text/html; charset=utf-8")
            .set_body_string(body)
    }

    #[tokio::test]
    async fn test_fetch_success_accumulates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/vacature/1"))
            .respond_with(html("<h1>Analist</h1>"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/vacature/2"))
            .respond_with(html("<h1>Ontwikkelaar</h1>"))
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        let first = format!("{}/vacature/1", server.uri());
        let second = format!("{}/vacature/2", server.uri());

        assert_eq!(fetcher.fetch(&first).await.as_deref(), Some("<h1>Analist</h1>"));
        assert!(fetcher.fetch(&second).await.is_some());

        let urls: Vec<&str> = fetcher.results().iter().map(|p| p.url.as_str()).collect();
        assert_eq!(urls, vec![first.as_str(), second.as_str()]);
        assert_eq!(fetcher.get(&second), Some("<h1>Ontwikkelaar</h1>"));
    }

    #[tokio::test]
    async fn test_sends_browser_headers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(header("accept-language", "en-US,en;q=0.5"))
            .respond_with(html("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        assert!(fetcher.fetch(&server.uri()).await.is_some());
    }

    #[tokio::test]
    async fn test_http_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        assert!(fetcher.fetch(&format!("{}/gone", server.uri())).await.is_none());
        assert!(fetcher.results().is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        assert!(fetcher.fetch(&server.uri()).await.is_none());
    }

    #[tokio::test]
    async fn test_non_html_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "application/json")
                    .set_body_string("{}"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        assert!(fetcher.fetch(&server.uri()).await.is_none());
        assert!(fetcher.results().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_gives_up() {
        let mut fetcher = fetcher();
        assert!(fetcher.fetch("http://127.0.0.1:1/").await.is_none());
        assert!(fetcher.results().is_empty());
    }

    #[tokio::test]
    async fn test_timeouts_are_retried_up_to_the_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html("slow").set_delay(Duration::from_secs(1)))
            .expect(3)
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let mut fetcher = ContentFetcher::with_client(client, RetryPolicy::new(2, 0.0, 0.0));

        // one attempt plus two retries
        assert!(fetcher.fetch(&format!("{}/slow", server.uri())).await.is_none());
        assert!(fetcher.results().is_empty());
    }

    #[tokio::test]
    async fn test_http_error_ignores_retry_budget() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .unwrap();
        let mut fetcher = ContentFetcher::with_client(client, RetryPolicy::new(2, 0.0, 0.0));

        assert!(fetcher.fetch(&format!("{}/broken", server.uri())).await.is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(html("<p>x</p>"))
            .mount(&server)
            .await;

        let mut fetcher = fetcher();
        fetcher.fetch(&server.uri()).await;
        assert_eq!(fetcher.results().len(), 1);

        fetcher.reset();
        assert!(fetcher.results().is_empty());
        assert_eq!(fetcher.get(&server.uri()), None);
    }

    #[test]
    fn test_error_classification() {
        assert!(!FetchError::Http { status: 500 }.is_retryable());
        assert!(!FetchError::UnexpectedContentType {
            content_type: "image/png".to_string()
        }
        .is_retryable());
    }
}
