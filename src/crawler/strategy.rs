//! Relevance strategies plugged into the crawl engine
//!
//! The engine asks its strategy two questions per URL: whether to skip it as
//! irrelevant before visiting, and whether to keep it as a result after the
//! visit. Legality (robots.txt) and deduplication stay in the engine.

use crate::crawler::admission::AdmissionPolicy;
use crate::results::ResultRecord;

/// Skip and record rules for a crawl
pub trait CrawlStrategy: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// True if `url` must not be visited because it is irrelevant
    fn skip_as_irrelevant(&self, policy: &AdmissionPolicy, url: &str, targeted: bool) -> bool;

    /// The record to store for a visited `url`, if any
    fn admit_result(
        &self,
        policy: &AdmissionPolicy,
        url: &str,
        targeted: bool,
    ) -> Option<ResultRecord>;
}

/// Strict relevance: in a targeted crawl only matching pages are visited and kept
#[derive(Debug, Clone, Copy, Default)]
pub struct BasePolicy;

impl CrawlStrategy for BasePolicy {
    fn name(&self) -> &'static str {
        "base"
    }

    fn skip_as_irrelevant(&self, policy: &AdmissionPolicy, url: &str, targeted: bool) -> bool {
        targeted && !policy.is_target(url)
    }

    fn admit_result(
        &self,
        policy: &AdmissionPolicy,
        url: &str,
        targeted: bool,
    ) -> Option<ResultRecord> {
        let is_target = policy.is_target(url);
        if targeted && !is_target {
            return None;
        }
        Some(ResultRecord::crawled(url, is_target))
    }
}

/// Relaxed relevance: irrelevant pages shallower than `hesitancy` are still
/// visited so their links can lead to relevant pages deeper in the site
#[derive(Debug, Clone, Copy)]
pub struct HesitantPolicy {
    hesitancy: u32,
}

impl HesitantPolicy {
    pub fn new(hesitancy: u32) -> Self {
        Self { hesitancy }
    }

    pub fn hesitancy(&self) -> u32 {
        self.hesitancy
    }
}

impl CrawlStrategy for HesitantPolicy {
    fn name(&self) -> &'static str {
        "hesitant"
    }

    fn skip_as_irrelevant(&self, policy: &AdmissionPolicy, url: &str, targeted: bool) -> bool {
        targeted
            && policy.estimate_depth(url) >= i64::from(self.hesitancy)
            && !policy.is_target(url)
    }

    fn admit_result(
        &self,
        policy: &AdmissionPolicy,
        url: &str,
        targeted: bool,
    ) -> Option<ResultRecord> {
        let is_target = policy.is_target(url);
        if !is_target && targeted {
            return None;
        }
        let depth = policy.estimate_depth(url);
        Some(ResultRecord::crawled(url, is_target).with_depth(depth, self.hesitancy))
    }
}

/// Picks the strategy for a session's hesitancy setting
pub fn strategy_for(hesitancy: Option<u32>) -> Box<dyn CrawlStrategy> {
    match hesitancy {
        Some(threshold) => Box::new(HesitantPolicy::new(threshold)),
        None => Box::new(BasePolicy),
    }
}
