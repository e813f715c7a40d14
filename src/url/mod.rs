//! URL handling module for Job-Scout
//!
//! This module provides URL normalization and network-location extraction.
//! Normalized URL strings are the identity used for frontier deduplication, and
//! the network location decides whether a discovered link stays in the crawl.

mod netloc;
mod normalize;

pub use netloc::{extract_netloc, origin_of};
pub use normalize::normalize_url;

use ::url::Url;

/// Returns true if `url` lives on the given network location
pub fn is_same_netloc(url: &Url, netloc: &str) -> bool {
    extract_netloc(url).as_deref() == Some(netloc)
}
