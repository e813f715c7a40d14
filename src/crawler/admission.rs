//! Admission policy: legality, relevance and depth estimate for a URL
//!
//! Every predicate here is pure. Nothing is cached and nothing in the session
//! is mutated, so repeated calls with the same URL give the same answer.

use crate::crawler::session::CrawlSession;
use crate::robots::RobotsPolicy;
use crate::url::extract_netloc;
use regex::Regex;
use url::Url;

/// Legality and relevance rules for one session
#[derive(Debug, Clone)]
pub struct AdmissionPolicy {
    start_url: String,
    keywords: Vec<Regex>,
    robots: RobotsPolicy,
    start_depth: i64,
}

impl AdmissionPolicy {
    pub fn new(session: &CrawlSession, robots: RobotsPolicy) -> Self {
        let start_url = session.start_url().to_string();
        let start_depth = structural_marks(&start_url);

        Self {
            start_url,
            keywords: session.keywords().to_vec(),
            robots,
            start_depth,
        }
    }

    /// True if robots.txt lets the wildcard agent fetch `url`
    ///
    /// The start URL is always allowed.
    pub fn is_allowed(&self, url: &str) -> bool {
        url == self.start_url || self.robots.can_fetch(url)
    }

    /// True if `url` is relevant to the crawl
    ///
    /// The start URL is always relevant, as is everything when no keywords are
    /// configured. Otherwise a keyword must match the URL's network location
    /// or its path.
    pub fn is_target(&self, url: &str) -> bool {
        if url == self.start_url || self.keywords.is_empty() {
            return true;
        }

        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        let netloc = extract_netloc(&parsed).unwrap_or_default();
        let path = parsed.path();

        self.keywords
            .iter()
            .any(|keyword| keyword.is_match(&netloc) || keyword.is_match(path))
    }

    /// Structural depth of `url` relative to the start URL
    ///
    /// Counts `/` and `#` characters. This is a cheap proxy for link distance,
    /// not a graph measure, and may be negative.
    pub fn estimate_depth(&self, url: &str) -> i64 {
        structural_marks(url) - self.start_depth
    }
}

fn structural_marks(url: &str) -> i64 {
    url.chars().filter(|&c| c == '/' || c == '#').count() as i64
}
