//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `SessionState`: lifecycle of a crawl session (init, running, done)

mod session_state;

pub use session_state::SessionState;
