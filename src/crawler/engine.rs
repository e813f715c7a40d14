//! Crawl engine
//!
//! Sequential breadth-first traversal of a single site. Each iteration takes
//! one URL off the frontier, checks it against robots.txt and the relevance
//! strategy, fetches it for links, sleeps for the politeness delay and then
//! decides whether the page becomes a result. After the traversal the
//! site's sitemap can be merged into the results.

use crate::crawler::admission::AdmissionPolicy;
use crate::crawler::fetcher::LinkSource;
use crate::crawler::frontier::Frontier;
use crate::crawler::session::CrawlSession;
use crate::crawler::sitemap::SitemapSource;
use crate::crawler::strategy::{strategy_for, CrawlStrategy};
use crate::results::{ResultRecord, ResultStore};
use crate::robots::RobotsPolicy;
use crate::state::SessionState;
use crate::url::{is_same_netloc, normalize_url};
use crate::ScoutError;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Runs one crawl session and owns its results
pub struct CrawlEngine {
    session: CrawlSession,
    admission: AdmissionPolicy,
    strategy: Box<dyn CrawlStrategy>,
    frontier: Frontier,
    results: ResultStore,
    links: Arc<dyn LinkSource>,
    sitemap: Option<Arc<dyn SitemapSource>>,
    delay: Duration,
    state: SessionState,
}

impl CrawlEngine {
    /// Creates an engine for `session` using the already loaded robots policy
    ///
    /// The strategy follows the session's hesitancy setting and the
    /// politeness delay is resolved once, here.
    pub fn new(session: CrawlSession, robots: RobotsPolicy, links: Arc<dyn LinkSource>) -> Self {
        let delay = session.resolve_delay(&robots);
        let strategy = strategy_for(session.hesitancy());
        let admission = AdmissionPolicy::new(&session, robots);

        Self {
            session,
            admission,
            strategy,
            frontier: Frontier::new(),
            results: ResultStore::new(),
            links,
            sitemap: None,
            delay,
            state: SessionState::Init,
        }
    }

    /// Sets the source used by the post-traversal sitemap merge
    pub fn with_sitemap_source(mut self, sitemap: Arc<dyn SitemapSource>) -> Self {
        self.sitemap = Some(sitemap);
        self
    }

    /// Replaces the relevance strategy chosen from the session's hesitancy
    pub fn with_strategy(mut self, strategy: Box<dyn CrawlStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn session(&self) -> &CrawlSession {
        &self.session
    }

    pub fn admission(&self) -> &AdmissionPolicy {
        &self.admission
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Politeness delay in force between visits
    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn results(&self) -> &ResultStore {
        &self.results
    }

    pub fn into_results(self) -> ResultStore {
        self.results
    }

    /// Number of URLs fetched for links so far
    pub fn visited_count(&self) -> usize {
        self.frontier.visited_count()
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.frontier.is_visited(url)
    }

    /// Crawls the site from the start URL
    ///
    /// With `targeted` set, irrelevant pages are skipped and not recorded
    /// (subject to the strategy). The loop stops when the frontier is empty or
    /// more than `max_visits` pages have been visited. Page-level failures are
    /// logged and never abort the crawl.
    ///
    /// # Errors
    ///
    /// Returns [`ScoutError::InvalidTransition`] if the engine has already run.
    pub async fn crawl(&mut self, targeted: bool) -> Result<(), ScoutError> {
        self.transition(SessionState::Running)?;

        let start = self.session.start_url().to_string();
        let max_visits = self.session.max_visits();
        self.frontier.enqueue(start.clone());

        tracing::info!(
            "Crawling {} ({} strategy, targeted: {}, max visits: {}, delay: {:?})",
            start,
            self.strategy.name(),
            targeted,
            max_visits,
            self.delay
        );

        while !self.frontier.is_empty() && self.frontier.visited_count() <= max_visits {
            let Some(current) = self.frontier.dequeue() else {
                break;
            };

            if self.frontier.is_visited(&current) {
                continue;
            }

            if !self.admission.is_allowed(&current) {
                tracing::debug!("URL {} disallowed by robots.txt", current);
                continue;
            }

            if self
                .strategy
                .skip_as_irrelevant(&self.admission, &current, targeted)
            {
                tracing::debug!("URL {} skipped as irrelevant", current);
                continue;
            }

            self.visit(&current).await;

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            if let Some(record) = self.strategy.admit_result(&self.admission, &current, targeted) {
                tracing::debug!("Recording {} (targeted: {})", record.url, record.targeted);
                self.results.insert(record);
            }
        }

        tracing::info!(
            "Crawl led to {} visits and {} results",
            self.frontier.visited_count(),
            self.results.len()
        );

        self.transition(SessionState::Done)?;

        if self.session.add_sitemap() {
            self.merge_sitemap().await;
        }

        Ok(())
    }

    /// Marks `url` visited, fetches it and enqueues its same-site links
    async fn visit(&mut self, url: &str) {
        self.frontier.mark_visited(url);

        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Cannot visit malformed URL {}: {}", url, e);
                return;
            }
        };

        let page = match self
            .links
            .fetch_for_links(&parsed, self.session.link_timeout())
            .await
        {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Link discovery failed: {}", e);
                return;
            }
        };

        let mut added = 0;
        for link in page.links {
            let normalized = match normalize_url(&link) {
                Ok(normalized) => normalized,
                Err(e) => {
                    tracing::debug!("Failed to normalize URL {}: {}", link, e);
                    continue;
                }
            };

            if !is_same_netloc(&normalized, self.session.domain()) {
                continue;
            }

            if self.frontier.enqueue(normalized.to_string()) {
                added += 1;
            }
        }

        tracing::debug!("Visited {}, {} new links queued", url, added);
    }

    /// Adds sitemap URLs that were not visited and pass both admission checks
    ///
    /// Runs after the traversal and does not count against `max_visits`.
    /// A URL already in the results keeps its crawl record.
    pub async fn merge_sitemap(&mut self) {
        let Some(source) = self.sitemap.clone() else {
            tracing::warn!("Sitemap merge requested but no sitemap source configured");
            return;
        };

        let before = self.results.len();
        let urls = source.enumerate(self.session.start_url()).await;
        tracing::debug!("Sitemap lists {} URLs", urls.len());

        for raw in urls {
            let url = match normalize_url(&raw) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    tracing::debug!("Ignoring sitemap entry {}: {}", raw, e);
                    continue;
                }
            };

            if self.frontier.is_visited(&url) {
                continue;
            }

            if self.admission.is_allowed(&url) && self.admission.is_target(&url) {
                self.frontier.mark_visited(&url);
                self.results.insert(ResultRecord::from_sitemap(url));
            }
        }

        tracing::info!(
            "Sitemap raised number of results from {} to {}",
            before,
            self.results.len()
        );
    }

    fn transition(&mut self, to: SessionState) -> Result<(), ScoutError> {
        if !self.state.can_transition_to(to) {
            return Err(ScoutError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        tracing::debug!("Session {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }
}
