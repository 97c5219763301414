//! Configuration validation.
//!
//! Serde handles the syntactic side; this module runs the semantic checks
//! before a config is accepted into the system. All violations are
//! collected and reported together, not just the first one found.

use thiserror::Error;
use url::Url;

use crate::config::schema::RedirectorConfig;

/// A single semantic violation found in a configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("headers cannot be empty")]
    EmptyHeaders,

    #[error("header name cannot be empty")]
    EmptyHeaderName,

    #[error("invalid decision service URL '{0}'")]
    InvalidDecisionUrl(String),

    #[error("decision timeout must be greater than zero")]
    ZeroDecisionTimeout,

    #[error("template delimiters cannot be empty")]
    EmptyDelimiter,

    #[error("cache TTL must be greater than zero when the cache is enabled")]
    ZeroCacheTtl,
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &RedirectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.headers.is_empty() {
        errors.push(ValidationError::EmptyHeaders);
    }
    if config.headers.keys().any(|name| name.is_empty()) {
        errors.push(ValidationError::EmptyHeaderName);
    }

    if Url::parse(&config.decision.base_url).is_err() {
        errors.push(ValidationError::InvalidDecisionUrl(
            config.decision.base_url.clone(),
        ));
    }
    if config.decision.timeout_secs == 0 {
        errors.push(ValidationError::ZeroDecisionTimeout);
    }

    if config.template.open_delimiter.is_empty() || config.template.close_delimiter.is_empty() {
        errors.push(ValidationError::EmptyDelimiter);
    }

    if config.cache.enabled && config.cache.ttl_secs == 0 {
        errors.push(ValidationError::ZeroCacheTtl);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
