/// Session state definitions for tracking a crawl's lifecycle
///
/// A crawl session moves strictly forward: it is created in `Init`, enters
/// `Running` when the traversal starts, and ends in the terminal `Done` state
/// once the frontier is exhausted or the visit budget is spent.
use std::fmt;

/// Represents the lifecycle state of a crawl session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Session configured, robots.txt loaded, nothing visited yet
    Init,

    /// Traversal loop in progress
    Running,

    /// Traversal (and optional sitemap merge) finished; results are read-only
    Done,
}

impl SessionState {
    /// Returns true if this is the terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (Self::Init, Self::Running) | (Self::Running, Self::Done)
        )
    }

    /// Short lowercase label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
