//! Output module for captured pages and crawl reports
//!
//! This module handles:
//! - Writing captured HTML as JSON lines
//! - Summarising a crawl session for the end-of-run report

mod jsonl;
pub mod stats;

pub use jsonl::{output_file_name, JsonLinesWriter};
pub use stats::{print_statistics, CrawlStatistics};

use thiserror::Error;

/// Errors raised while writing output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
