//! Robots.txt handling module
//!
//! robots.txt is fetched once per session, before the crawl loop starts, and
//! the resulting [`RobotsPolicy`] is immutable for the rest of the session.

mod parser;

pub use parser::{RobotsPolicy, WILDCARD_AGENT};

use crate::url::{extract_netloc, origin_of};
use crate::ScoutError;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use url::Url;

/// What to do when robots.txt cannot be retrieved
///
/// A missing robots.txt (4xx other than 401/403) is never a failure; this only
/// governs transport errors and server errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RobotsFailurePolicy {
    /// Treat the site as fully permissive and carry on
    #[default]
    Allow,

    /// Abort the session
    Abort,
}

/// Fetches and parses robots.txt for the domain of `start_url`
///
/// | Response | Policy |
/// |----------|--------|
/// | 2xx | parsed content |
/// | 401, 403 | disallow all |
/// | other 4xx | allow all |
/// | 5xx, network error | per `on_failure` |
///
/// # Returns
///
/// * `Ok(RobotsPolicy)` - The policy to use for the session
/// * `Err(ScoutError::Robots)` - Loading failed and `on_failure` is `Abort`
pub async fn load_robots(
    client: &Client,
    start_url: &Url,
    on_failure: RobotsFailurePolicy,
) -> Result<RobotsPolicy, ScoutError> {
    let domain = extract_netloc(start_url).unwrap_or_default();
    let origin = origin_of(start_url).ok_or(crate::UrlError::MissingDomain)?;
    let robots_url = format!("{}/robots.txt", origin);

    tracing::debug!("Fetching robots.txt from {}", robots_url);

    let failure = match client.get(&robots_url).send().await {
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                match response.text().await {
                    Ok(body) => {
                        tracing::info!("Loaded robots.txt for {}", domain);
                        return Ok(RobotsPolicy::from_content(&body));
                    }
                    Err(e) => format!("failed to read body: {}", e),
                }
            } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                tracing::warn!(
                    "robots.txt for {} answered HTTP {}, treating site as disallowed",
                    domain,
                    status.as_u16()
                );
                return Ok(RobotsPolicy::disallow_all());
            } else if status.is_client_error() {
                tracing::info!(
                    "No robots.txt for {} (HTTP {}), allowing all",
                    domain,
                    status.as_u16()
                );
                return Ok(RobotsPolicy::allow_all());
            } else {
                format!("HTTP {}", status.as_u16())
            }
        }
        Err(e) => e.to_string(),
    };

    match on_failure {
        RobotsFailurePolicy::Allow => {
            tracing::warn!(
                "Could not load robots.txt for {} ({}), continuing as allow-all",
                domain,
                failure
            );
            Ok(RobotsPolicy::allow_all())
        }
        RobotsFailurePolicy::Abort => Err(ScoutError::Robots {
            domain,
            message: failure,
        }),
    }
}
