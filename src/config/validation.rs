use crate::config::types::{Config, FetcherConfig, OutputConfig, SessionConfig};
use crate::url::normalize_url;
use crate::ConfigError;
use regex::Regex;
use std::time::Duration;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_session_config(&config.session)?;
    validate_fetcher_config(&config.fetcher)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawl session configuration
fn validate_session_config(config: &SessionConfig) -> Result<(), ConfigError> {
    normalize_url(&config.start_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid start-url '{}': {}", config.start_url, e))
    })?;

    compile_keywords(&config.keywords)?;

    if let Some(delay) = config.delay {
        validate_seconds("delay", delay)?;
    }

    if config.link_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "link-timeout must be >= 1 second, got {}",
            config.link_timeout
        )));
    }

    Ok(())
}

/// Validates content fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fetcher user-agent cannot be empty".to_string(),
        ));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "fetcher timeout must be >= 1 second, got {}",
            config.timeout
        )));
    }

    validate_seconds("backoff-min", config.backoff_min)?;
    validate_seconds("backoff-max", config.backoff_max)?;

    if config.backoff_min > config.backoff_max {
        return Err(ConfigError::Validation(format!(
            "backoff-min ({}) must not exceed backoff-max ({})",
            config.backoff_min, config.backoff_max
        )));
    }

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.directory.is_empty() {
        return Err(ConfigError::Validation(
            "output directory cannot be empty".to_string(),
        ));
    }

    if config.file_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "file-prefix cannot be empty".to_string(),
        ));
    }

    if !config
        .file_prefix
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::Validation(format!(
            "file-prefix must contain only alphanumeric characters, hyphens and underscores, got '{}'",
            config.file_prefix
        )));
    }

    Ok(())
}

/// Compiles keyword patterns, rejecting the first invalid one
pub fn compile_keywords(keywords: &[String]) -> Result<Vec<Regex>, ConfigError> {
    keywords
        .iter()
        .map(|keyword| {
            if keyword.is_empty() {
                return Err(ConfigError::InvalidPattern(
                    "keyword pattern cannot be empty".to_string(),
                ));
            }
            Regex::new(keyword)
                .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", keyword, e)))
        })
        .collect()
}

/// Rejects negative, non-finite and unrepresentable durations
fn validate_seconds(name: &str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a non-negative number of seconds, got {}",
            name, value
        )));
    }
    if Duration::try_from_secs_f64(value).is_err() {
        return Err(ConfigError::Validation(format!(
            "{} is too large to be a duration, got {}",
            name, value
        )));
    }
    Ok(())
}
