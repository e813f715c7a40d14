//! Robots.txt policy implementation
//!
//! Allow/deny matching is delegated to the robotstxt crate; crawl delay and
//! sitemap declarations are read directly from the file.

use robotstxt::DefaultMatcher;

/// The only user agent this crawler identifies as when consulting robots.txt
pub const WILDCARD_AGENT: &str = "*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Rules {
    AllowAll,
    DisallowAll,
    Content(String),
}

/// Parsed robots.txt policy bound to one domain
///
/// Loaded once at session start and read-only afterwards.
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    rules: Rules,
}

impl RobotsPolicy {
    /// Creates a policy from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            rules: Rules::Content(content.to_string()),
        }
    }

    /// Creates a permissive policy that allows everything
    ///
    /// Used when the site has no robots.txt, or when loading failed and the
    /// session runs fail-open.
    pub fn allow_all() -> Self {
        Self {
            rules: Rules::AllowAll,
        }
    }

    /// Creates a policy that denies everything (robots.txt answered 401/403)
    pub fn disallow_all() -> Self {
        Self {
            rules: Rules::DisallowAll,
        }
    }

    /// Returns the raw robots.txt content, if any was parsed
    pub fn content(&self) -> Option<&str> {
        match &self.rules {
            Rules::Content(content) => Some(content),
            _ => None,
        }
    }

    /// Checks if the wildcard agent may fetch `url`
    ///
    /// `url` may be a full URL or a path.
    pub fn can_fetch(&self, url: &str) -> bool {
        match &self.rules {
            Rules::AllowAll => true,
            Rules::DisallowAll => false,
            Rules::Content(content) if content.trim().is_empty() => true,
            Rules::Content(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, WILDCARD_AGENT, url)
            }
        }
    }

    /// Gets the crawl delay, in seconds, declared for the wildcard agent
    pub fn crawl_delay(&self) -> Option<f64> {
        let content = self.content()?;

        let mut group_agents: Vec<String> = Vec::new();
        let mut group_open = false;
        let mut delay = None;

        for (key, value) in directives(content) {
            match key.as_str() {
                "user-agent" => {
                    // A user-agent line after rules starts a new group
                    if !group_open {
                        group_agents.clear();
                        group_open = true;
                    }
                    group_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    group_open = false;
                    if group_agents.iter().any(|ua| ua == WILDCARD_AGENT) {
                        if let Ok(seconds) = value.parse::<f64>() {
                            if seconds.is_finite() && seconds >= 0.0 {
                                delay = Some(seconds);
                            }
                        }
                    }
                }
                _ => group_open = false,
            }
        }

        delay
    }

    /// Lists the sitemap URLs declared with `Sitemap:` lines
    pub fn sitemaps(&self) -> Vec<String> {
        match self.content() {
            Some(content) => directives(content)
                .filter(|(key, value)| key == "sitemap" && !value.is_empty())
                .map(|(_, value)| value)
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Iterates over `key: value` lines, skipping comments and blanks
fn directives(content: &str) -> impl Iterator<Item = (String, String)> + '_ {
    content.lines().filter_map(|line| {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            return None;
        }
        let (key, value) = line.split_once(':')?;
        Some((key.trim().to_lowercase(), value.trim().to_string()))
    })
}
