//! Crawl session configuration
//!
//! A [`CrawlSession`] is built once, before the crawl starts, and is never
//! mutated by the engine afterwards.

use crate::config::{compile_keywords, SessionConfig, DEFAULT_DELAY_SECS, DEFAULT_LINK_TIMEOUT_SECS};
use crate::robots::{RobotsFailurePolicy, RobotsPolicy};
use crate::url::{extract_netloc, normalize_url};
use crate::{ConfigError, ScoutError, UrlError};
use regex::Regex;
use std::time::Duration;
use url::Url;

/// Immutable configuration of one crawl session
#[derive(Debug, Clone)]
pub struct CrawlSession {
    start_url: Url,
    domain: String,
    keywords: Vec<Regex>,
    max_visits: usize,
    delay: Option<Duration>,
    use_robots_delay: bool,
    hesitancy: Option<u32>,
    add_sitemap: bool,
    link_timeout: Duration,
    robots_failure: RobotsFailurePolicy,
}

impl CrawlSession {
    /// Creates a session with default settings for `start_url`
    ///
    /// Defaults: no keywords, 100 visits, robots.txt delay (falling back to
    /// 2 s), no hesitancy, sitemap merge on, fail-open robots loading.
    ///
    /// # Errors
    ///
    /// Returns an error if `start_url` cannot be parsed or has no host.
    pub fn new(start_url: &str) -> Result<Self, ScoutError> {
        let start_url = normalize_url(start_url)?;
        let domain = extract_netloc(&start_url).ok_or(UrlError::MissingDomain)?;

        Ok(Self {
            start_url,
            domain,
            keywords: Vec::new(),
            max_visits: 100,
            delay: None,
            use_robots_delay: true,
            hesitancy: None,
            add_sitemap: true,
            link_timeout: Duration::from_secs(DEFAULT_LINK_TIMEOUT_SECS),
            robots_failure: RobotsFailurePolicy::default(),
        })
    }

    /// Builds a session from the `[session]` configuration table
    pub fn from_config(config: &SessionConfig) -> Result<Self, ScoutError> {
        let mut session = Self::new(&config.start_url)?
            .with_keywords(compile_keywords(&config.keywords)?)
            .with_max_visits(config.max_visits)
            .with_robots_delay(config.use_robots_delay)
            .with_hesitancy(config.hesitancy)
            .with_sitemap(config.add_sitemap)
            .with_link_timeout(Duration::from_secs(config.link_timeout))
            .with_robots_failure(config.robots_failure);

        if let Some(seconds) = config.delay {
            let delay = Duration::try_from_secs_f64(seconds).map_err(|e| {
                ConfigError::Validation(format!("delay {} is not a valid duration: {}", seconds, e))
            })?;
            session = session.with_delay(delay);
        }

        Ok(session)
    }

    pub fn with_keywords(mut self, keywords: Vec<Regex>) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_max_visits(mut self, max_visits: usize) -> Self {
        self.max_visits = max_visits;
        self
    }

    /// Sets an explicit politeness delay; it always wins over robots.txt
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_robots_delay(mut self, use_robots_delay: bool) -> Self {
        self.use_robots_delay = use_robots_delay;
        self
    }

    /// Enables (Some) or disables (None) the hesitant relaxation policy
    pub fn with_hesitancy(mut self, hesitancy: Option<u32>) -> Self {
        self.hesitancy = hesitancy;
        self
    }

    pub fn with_sitemap(mut self, add_sitemap: bool) -> Self {
        self.add_sitemap = add_sitemap;
        self
    }

    pub fn with_link_timeout(mut self, timeout: Duration) -> Self {
        self.link_timeout = timeout;
        self
    }

    pub fn with_robots_failure(mut self, policy: RobotsFailurePolicy) -> Self {
        self.robots_failure = policy;
        self
    }

    /// Normalized start URL
    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    /// Network location of the start URL; the only one ever enqueued
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn keywords(&self) -> &[Regex] {
        &self.keywords
    }

    pub fn max_visits(&self) -> usize {
        self.max_visits
    }

    pub fn hesitancy(&self) -> Option<u32> {
        self.hesitancy
    }

    pub fn add_sitemap(&self) -> bool {
        self.add_sitemap
    }

    pub fn link_timeout(&self) -> Duration {
        self.link_timeout
    }

    pub fn robots_failure(&self) -> RobotsFailurePolicy {
        self.robots_failure
    }

    /// Politeness delay for this session
    ///
    /// An explicit delay wins; otherwise the robots.txt Crawl-delay is used if
    /// enabled and present; otherwise the 2 second default. A Crawl-delay too
    /// large for a [`Duration`] counts as absent.
    pub fn resolve_delay(&self, robots: &RobotsPolicy) -> Duration {
        if let Some(delay) = self.delay {
            return delay;
        }

        if self.use_robots_delay {
            if let Some(seconds) = robots.crawl_delay() {
                match Duration::try_from_secs_f64(seconds) {
                    Ok(delay) => return delay,
                    Err(e) => tracing::warn!(
                        "Ignoring robots.txt Crawl-delay {} for {}: {}",
                        seconds,
                        self.domain,
                        e
                    ),
                }
            }
        }

        Duration::from_secs_f64(DEFAULT_DELAY_SECS)
    }
}
