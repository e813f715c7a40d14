//! Session statistics
//!
//! Summarises a finished crawl for the end-of-run report.

use crate::crawler::CrawlEngine;
use crate::results::ResultSource;
use std::time::Duration;

/// Crawl statistics summary
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Normalized start URL
    pub start_url: String,

    /// Pages fetched for link discovery
    pub visits: usize,

    /// Total number of results
    pub results: usize,

    /// Results found by the traversal loop
    pub crawl_results: usize,

    /// Results added by the sitemap merge
    pub sitemap_results: usize,

    /// Results whose URL matched the keywords
    pub targeted_results: usize,

    /// Pages whose HTML was captured, if content capture ran
    pub pages_captured: Option<usize>,

    /// Wall-clock time of the session
    pub elapsed: Duration,
}

impl CrawlStatistics {
    /// Collects statistics from a finished engine
    pub fn collect(engine: &CrawlEngine, pages_captured: Option<usize>, elapsed: Duration) -> Self {
        let results = engine.results();

        Self {
            start_url: engine.session().start_url().to_string(),
            visits: engine.visited_count(),
            results: results.len(),
            crawl_results: results.count_by_source(ResultSource::Crawl),
            sitemap_results: results.count_by_source(ResultSource::Sitemap),
            targeted_results: results.iter().filter(|r| r.targeted).count(),
            pages_captured,
            elapsed,
        }
    }

    /// Share of results whose HTML was captured, as a percentage
    pub fn capture_rate(&self) -> Option<f64> {
        let captured = self.pages_captured?;
        if self.results == 0 {
            return Some(0.0);
        }
        Some(captured as f64 / self.results as f64 * 100.0)
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Start URL: {}", stats.start_url);
    println!("  Pages visited: {}", stats.visits);
    println!("  Duration: {:.1}s", stats.elapsed.as_secs_f64());
    println!();

    println!("Results ({}):", stats.results);
    println!("  From crawl: {}", stats.crawl_results);
    println!("  From sitemap: {}", stats.sitemap_results);
    println!("  Matching keywords: {}", stats.targeted_results);
    println!();

    if let (Some(captured), Some(rate)) = (stats.pages_captured, stats.capture_rate()) {
        println!(
            "Content Capture: {:.1}% ({} / {} pages captured)",
            rate, captured, stats.results
        );
    }
}
