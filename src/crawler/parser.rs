//! Link extraction from HTML pages
//!
//! Anchors and canonical links are followed. Anchors flagged `download`,
//! pseudo-scheme hrefs (`javascript:`, `mailto:`, `tel:`, `data:`) and
//! same-page fragments are dropped. `rel="nofollow"` is ignored, so those
//! links are followed too.

use scraper::{Html, Selector};
use url::Url;

const SKIPPED_SCHEMES: [&str; 4] = ["javascript:", "mailto:", "tel:", "data:"];

/// Extracts absolute http(s) links from `html`, resolved against `base_url`
///
/// Links are returned in document order, anchors first and canonical links
/// after, and are not deduplicated or normalized.
///
/// # Example
///
/// ```
/// use job_scout::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/careers/").unwrap();
/// let links = extract_links(r#"<a href="analyst">Analyst</a>"#, &base);
/// assert_eq!(links, vec!["https://example.com/careers/analyst".to_string()]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(anchors) = Selector::parse("a[href]") {
        for element in document.select(&anchors) {
            if element.value().attr("download").is_some() {
                continue;
            }
            if let Some(link) = element.value().attr("href").and_then(|h| resolve_link(h, base_url)) {
                links.push(link);
            }
        }
    }

    if let Ok(canonical) = Selector::parse("link[rel='canonical'][href]") {
        for element in document.select(&canonical) {
            if let Some(link) = element.value().attr("href").and_then(|h| resolve_link(h, base_url)) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves `href` against `base_url`; None if the link is not followable
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|scheme| lowered.starts_with(scheme)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}
