//! Link discovery over HTTP
//!
//! The crawl engine only needs the outgoing links of a page, so it talks to a
//! [`LinkSource`]. [`HttpLinkSource`] is the production implementation; tests
//! swap in in-memory sources.

use crate::crawler::parser::extract_links;
use async_trait::async_trait;
use reqwest::{header::CONTENT_TYPE, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// User agent sent during link discovery
pub const CRAWLER_USER_AGENT: &str = concat!("job-scout/", env!("CARGO_PKG_VERSION"));

/// Errors raised while discovering links on a page
///
/// None of these are fatal to a session; the engine logs them and moves on.
#[derive(Debug, Error)]
pub enum LinkDiscoveryError {
    #[error("timed out fetching {url}")]
    Timeout { url: String },

    #[error("HTTP {status} fetching {url}")]
    Http { url: String, status: u16 },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },
}

/// A fetched page and the links found on it
#[derive(Debug, Clone, Default)]
pub struct DiscoveredPage {
    /// Page body, absent when the response was not HTML
    pub html: Option<String>,

    /// Absolute links in document order, not yet normalized
    pub links: Vec<String>,
}

/// Something that can fetch a page and list its links
#[async_trait]
pub trait LinkSource: Send + Sync {
    /// Fetches `url` and extracts its links, giving up after `timeout`
    async fn fetch_for_links(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<DiscoveredPage, LinkDiscoveryError>;
}

/// Builds the HTTP client used for robots.txt, link discovery and sitemaps
///
/// Redirects are followed; per-request timeouts are set by the caller.
pub fn build_crawl_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(CRAWLER_USER_AGENT)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`LinkSource`] backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpLinkSource {
    client: Client,
}

impl HttpLinkSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkSource for HttpLinkSource {
    async fn fetch_for_links(
        &self,
        url: &Url,
        timeout: Duration,
    ) -> Result<DiscoveredPage, LinkDiscoveryError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LinkDiscoveryError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_ascii_lowercase();

        // A missing header is treated as HTML; anything else declared is skipped
        if !content_type.is_empty() && !content_type.contains("html") {
            tracing::debug!("Skipping link extraction for {} ({})", url, content_type);
            return Ok(DiscoveredPage::default());
        }

        let body = response.text().await.map_err(|e| classify(url, e))?;
        let links = extract_links(&body, url);

        Ok(DiscoveredPage {
            html: Some(body),
            links,
        })
    }
}

fn classify(url: &Url, error: reqwest::Error) -> LinkDiscoveryError {
    if error.is_timeout() {
        LinkDiscoveryError::Timeout {
            url: url.to_string(),
        }
    } else {
        LinkDiscoveryError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
