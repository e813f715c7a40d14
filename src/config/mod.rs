//! Configuration module for Job-Scout
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use job_scout::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Crawl starts at: {}", config.session.start_url);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{
    Config, FetcherConfig, OutputConfig, SessionConfig, DEFAULT_DELAY_SECS,
    DEFAULT_FETCH_USER_AGENT, DEFAULT_LINK_TIMEOUT_SECS,
};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::compile_keywords;
