use crate::robots::RobotsFailurePolicy;
use serde::Deserialize;

/// Default politeness delay between visits, in seconds
pub const DEFAULT_DELAY_SECS: f64 = 2.0;

/// Default timeout for the link-discovery fetch, in seconds
pub const DEFAULT_LINK_TIMEOUT_SECS: u64 = 10;

/// Default browser-like user agent for content capture
pub const DEFAULT_FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Job-Scout
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub session: SessionConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl session configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SessionConfig {
    /// URL the crawl starts from; its network location is the crawl domain
    pub start_url: String,

    /// Regex patterns matched against a URL's host and path
    #[serde(default)]
    pub keywords: Vec<String>,

    /// Visit budget for the traversal loop
    #[serde(default = "default_max_visits")]
    pub max_visits: usize,

    /// Explicit politeness delay in seconds; overrides robots.txt when set
    #[serde(default)]
    pub delay: Option<f64>,

    /// Use the robots.txt Crawl-delay when no explicit delay is set
    #[serde(default = "default_true")]
    pub use_robots_delay: bool,

    /// Structural depth below which irrelevant pages are still traversed;
    /// absent means no relaxation
    #[serde(default)]
    pub hesitancy: Option<u32>,

    /// Merge sitemap URLs into the results after the traversal
    #[serde(default = "default_true")]
    pub add_sitemap: bool,

    /// Keep only keyword-matching pages
    #[serde(default = "default_true")]
    pub targeted: bool,

    /// Timeout for each link-discovery request (seconds)
    #[serde(default = "default_link_timeout")]
    pub link_timeout: u64,

    /// Behaviour when robots.txt cannot be retrieved
    #[serde(default)]
    pub robots_failure: RobotsFailurePolicy,
}

/// Content fetcher configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent when capturing page content
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Request timeout (seconds)
    #[serde(default = "default_fetch_timeout")]
    pub timeout: u64,

    /// Retries after a transport failure
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Lower bound of the random backoff between retries (seconds)
    #[serde(default = "default_backoff_min")]
    pub backoff_min: f64,

    /// Upper bound of the random backoff between retries (seconds)
    #[serde(default = "default_backoff_max")]
    pub backoff_max: f64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout: default_fetch_timeout(),
            max_retries: default_max_retries(),
            backoff_min: default_backoff_min(),
            backoff_max: default_backoff_max(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Directory the JSON-lines file is written to
    #[serde(default = "default_output_directory")]
    pub directory: String,

    /// File name prefix; a timestamp and `.jsonl` are appended
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            file_prefix: default_file_prefix(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_visits() -> usize {
    100
}

fn default_link_timeout() -> u64 {
    DEFAULT_LINK_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    DEFAULT_FETCH_USER_AGENT.to_string()
}

fn default_fetch_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_backoff_min() -> f64 {
    1.0
}

fn default_backoff_max() -> f64 {
    5.0
}

fn default_output_directory() -> String {
    "./output".to_string()
}

fn default_file_prefix() -> String {
    "vacancies".to_string()
}
