//! Crawler module for vacancy page discovery
//!
//! This module contains the core crawling logic, including:
//! - Per-URL admission (robots.txt, keyword relevance, depth estimate)
//! - The breadth-first frontier and the crawl engine
//! - The base and hesitant relevance strategies
//! - HTTP link discovery and sitemap enumeration

mod admission;
mod engine;
mod fetcher;
mod frontier;
mod parser;
mod session;
mod sitemap;
mod strategy;

pub use admission::AdmissionPolicy;
pub use engine::CrawlEngine;
pub use fetcher::{
    build_crawl_client, DiscoveredPage, HttpLinkSource, LinkDiscoveryError, LinkSource,
    CRAWLER_USER_AGENT,
};
pub use frontier::Frontier;
pub use parser::extract_links;
pub use session::CrawlSession;
pub use sitemap::{
    extract_locs, HttpSitemapSource, SitemapSource, MAX_SITEMAP_DEPTH, MAX_SITEMAP_DOCUMENTS,
};
pub use strategy::{strategy_for, BasePolicy, CrawlStrategy, HesitantPolicy};

use crate::robots::load_robots;
use std::sync::Arc;

/// Runs a complete crawl session over HTTP
///
/// This is the main entry point for discovering vacancy pages. It will:
/// 1. Build the HTTP client
/// 2. Load robots.txt for the start URL's site
/// 3. Crawl breadth-first from the start URL
/// 4. Merge the sitemap, if enabled
///
/// # Returns
///
/// * `Ok(CrawlEngine)` - The finished engine, holding the results
/// * `Err(ScoutError)` - robots.txt loading aborted the session, or the
///   HTTP client could not be built
pub async fn run_session(session: CrawlSession, targeted: bool) -> crate::Result<CrawlEngine> {
    let client = build_crawl_client()?;
    let robots = load_robots(&client, session.start_url(), session.robots_failure()).await?;

    let sitemap = HttpSitemapSource::new(client.clone()).with_declared(robots.sitemaps());
    let links = HttpLinkSource::new(client);

    let mut engine = CrawlEngine::new(session, robots, Arc::new(links))
        .with_sitemap_source(Arc::new(sitemap));
    engine.crawl(targeted).await?;

    Ok(engine)
}
