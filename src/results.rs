//! Result store for a crawl session
//!
//! Records are keyed by URL. The first record stored for a URL wins; later
//! attempts to store the same URL are ignored, whatever their source. Records
//! iterate in the order they were added.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    /// Visited by the traversal loop
    Crawl,

    /// Added by the post-traversal sitemap merge
    Sitemap,
}

impl fmt::Display for ResultSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Crawl => write!(f, "crawl"),
            Self::Sitemap => write!(f, "sitemap"),
        }
    }
}

/// A page kept by the crawl
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRecord {
    pub url: String,
    pub source: ResultSource,

    /// Whether the URL matched the target keywords
    pub targeted: bool,

    /// Structural depth estimate, recorded by the hesitant policy
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_depth: Option<i64>,

    /// Hesitancy threshold in force when the record was made
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hesitancy: Option<u32>,
}

impl ResultRecord {
    /// A record produced by the traversal loop
    pub fn crawled(url: impl Into<String>, targeted: bool) -> Self {
        Self {
            url: url.into(),
            source: ResultSource::Crawl,
            targeted,
            estimated_depth: None,
            hesitancy: None,
        }
    }

    /// A record produced by the sitemap merge; sitemap URLs always matched
    pub fn from_sitemap(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            source: ResultSource::Sitemap,
            targeted: true,
            estimated_depth: None,
            hesitancy: None,
        }
    }

    /// Attaches the hesitant policy's depth estimate and threshold
    pub fn with_depth(mut self, estimated_depth: i64, hesitancy: u32) -> Self {
        self.estimated_depth = Some(estimated_depth);
        self.hesitancy = Some(hesitancy);
        self
    }
}

/// Accumulates the result records of one session
#[derive(Debug, Default)]
pub struct ResultStore {
    records: Vec<ResultRecord>,
    index: HashMap<String, usize>,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record; returns false if the URL is already present
    pub fn insert(&mut self, record: ResultRecord) -> bool {
        if self.index.contains_key(&record.url) {
            return false;
        }
        self.index.insert(record.url.clone(), self.records.len());
        self.records.push(record);
        true
    }

    pub fn contains(&self, url: &str) -> bool {
        self.index.contains_key(url)
    }

    pub fn get(&self, url: &str) -> Option<&ResultRecord> {
        self.index.get(url).map(|&i| &self.records[i])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &ResultRecord> {
        self.records.iter()
    }

    /// URLs in insertion order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }

    /// Number of records from the given source
    pub fn count_by_source(&self, source: ResultSource) -> usize {
        self.records.iter().filter(|r| r.source == source).count()
    }
}
