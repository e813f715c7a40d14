//! Sitemap enumeration
//!
//! Sitemap locations come from the `Sitemap:` lines of robots.txt, falling
//! back to `/sitemap.xml` on the start URL's origin. Sitemap indexes are
//! followed a few levels deep. Gzipped sitemaps (`.xml.gz`) are inflated.
//! Enumeration never fails: an unreachable or malformed sitemap contributes no
//! URLs and is logged.

use crate::url::origin_of;
use async_trait::async_trait;
use flate2::read::GzDecoder;
use reqwest::Client;
use std::collections::{HashSet, VecDeque};
use std::io::Read;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// How many index levels below the root sitemaps are followed
pub const MAX_SITEMAP_DEPTH: usize = 3;

/// Upper bound on sitemap documents fetched per session
pub const MAX_SITEMAP_DOCUMENTS: usize = 50;

const SITEMAP_TIMEOUT: Duration = Duration::from_secs(30);

/// Uncompressed size limit of one sitemap document (50 MiB)
const MAX_SITEMAP_BYTES: u64 = 50 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Something that can list the page URLs a site advertises
#[async_trait]
pub trait SitemapSource: Send + Sync {
    /// All page URLs advertised for the site of `start_url`, in document order
    async fn enumerate(&self, start_url: &Url) -> Vec<String>;
}

#[derive(Debug, Error)]
enum SitemapError {
    #[error("HTTP {0}")]
    Http(u16),

    #[error("{0}")]
    Network(#[from] reqwest::Error),

    #[error("corrupt gzip data: {0}")]
    Gzip(#[from] std::io::Error),
}

/// [`SitemapSource`] that downloads sitemap XML over HTTP
#[derive(Debug, Clone)]
pub struct HttpSitemapSource {
    client: Client,
    declared: Vec<String>,
}

impl HttpSitemapSource {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            declared: Vec::new(),
        }
    }

    /// Uses the sitemap locations declared in robots.txt instead of the default
    pub fn with_declared(mut self, declared: Vec<String>) -> Self {
        self.declared = declared;
        self
    }

    fn roots(&self, start_url: &Url) -> Vec<String> {
        if !self.declared.is_empty() {
            return self.declared.clone();
        }
        origin_of(start_url)
            .map(|origin| vec![format!("{}/sitemap.xml", origin)])
            .unwrap_or_default()
    }

    async fn fetch_document(&self, url: &str) -> Result<String, SitemapError> {
        let response = self
            .client
            .get(url)
            .timeout(SITEMAP_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Http(status.as_u16()));
        }

        let body = response.bytes().await?;
        if body.starts_with(&GZIP_MAGIC) {
            tracing::debug!("Sitemap {} is gzipped, inflating", url);
            return inflate(&body);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Decompresses a gzipped sitemap, truncating at [`MAX_SITEMAP_BYTES`]
///
/// A `.gz` sitemap served with `Content-Encoding: gzip` is already inflated by
/// the client, so only the payload's magic bytes decide.
fn inflate(body: &[u8]) -> Result<String, SitemapError> {
    let mut inflated = Vec::new();
    GzDecoder::new(body)
        .take(MAX_SITEMAP_BYTES)
        .read_to_end(&mut inflated)?;
    Ok(String::from_utf8_lossy(&inflated).into_owned())
}

#[async_trait]
impl SitemapSource for HttpSitemapSource {
    async fn enumerate(&self, start_url: &Url) -> Vec<String> {
        let mut queue: VecDeque<(String, usize)> =
            self.roots(start_url).into_iter().map(|u| (u, 0)).collect();
        let mut fetched: HashSet<String> = HashSet::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut pages = Vec::new();

        while let Some((location, depth)) = queue.pop_front() {
            if fetched.len() >= MAX_SITEMAP_DOCUMENTS {
                tracing::warn!(
                    "Sitemap document limit ({}) reached, {} left unread",
                    MAX_SITEMAP_DOCUMENTS,
                    queue.len() + 1
                );
                break;
            }
            if !fetched.insert(location.clone()) {
                continue;
            }

            let document = match self.fetch_document(&location).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Could not read sitemap {}: {}", location, e);
                    continue;
                }
            };

            let locs = extract_locs(&document);
            if is_sitemap_index(&document) {
                if depth >= MAX_SITEMAP_DEPTH {
                    tracing::warn!("Sitemap index {} nested too deep, skipping", location);
                    continue;
                }
                tracing::debug!("Sitemap index {} lists {} sitemaps", location, locs.len());
                queue.extend(locs.into_iter().map(|child| (child, depth + 1)));
            } else {
                tracing::debug!("Sitemap {} lists {} pages", location, locs.len());
                for loc in locs {
                    if seen.insert(loc.clone()) {
                        pages.push(loc);
                    }
                }
            }
        }

        pages
    }
}

fn is_sitemap_index(document: &str) -> bool {
    document.contains("<sitemapindex")
}

/// Extracts the text of every `<loc>` element, in document order
pub fn extract_locs(document: &str) -> Vec<String> {
    let mut locs = Vec::new();
    let mut rest = document;

    while let Some(start) = rest.find("<loc>") {
        let after = &rest[start + "<loc>".len()..];
        let Some(end) = after.find("</loc>") else {
            break;
        };

        let value = unwrap_cdata(after[..end].trim());
        let value = unescape_xml(value.trim());
        if !value.is_empty() {
            locs.push(value);
        }

        rest = &after[end + "</loc>".len()..];
    }

    locs
}

fn unwrap_cdata(value: &str) -> &str {
    value
        .strip_prefix("<![CDATA[")
        .and_then(|v| v.strip_suffix("]]>"))
        .unwrap_or(value)
}

fn unescape_xml(value: &str) -> String {
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
