//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the
//! redirector. All types derive Serde traits for deserialization from
//! config files.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Root configuration for the redirection middleware.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RedirectorConfig {
    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Header name -> template string. Each entry is rendered against the
    /// incoming request and set on it before the redirect decision is made.
    /// Must not be empty.
    pub headers: HashMap<String, String>,

    /// Template delimiter markers.
    pub template: TemplateConfig,

    /// Redirection decision service settings.
    pub decision: DecisionServiceConfig,

    /// Decision memoization settings.
    pub cache: CacheConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Delimiter markers for header templates.
///
/// Non-default markers so templates survive layers that themselves use
/// `{{`/`}}` (config interpolation, other proxies in the chain).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Opening marker for template expressions.
    pub open_delimiter: String,

    /// Closing marker for template expressions.
    pub close_delimiter: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            open_delimiter: "[[".to_string(),
            close_delimiter: "]]".to_string(),
        }
    }
}

/// Redirection decision service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DecisionServiceConfig {
    /// Base URL of the decision service. Queried with `host` and `url`
    /// parameters; a 200 body is the redirect target, any other status
    /// means "no rule".
    pub base_url: String,

    /// Timeout for the decision call in seconds. Expiry is treated the
    /// same as an unreachable service: the request is forwarded.
    pub timeout_secs: u64,
}

impl Default for DecisionServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://redirection-service:8086/".to_string(),
            timeout_secs: 5,
        }
    }
}

/// Decision memoization configuration.
///
/// Off by default; when enabled, outcomes are cached per (host, path) for
/// `ttl_secs`. Service-unavailable outcomes are never cached.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable decision memoization.
    pub enabled: bool,

    /// Entry lifetime in seconds.
    pub ttl_secs: u64,

    /// Interval between sweeps of expired entries, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            ttl_secs: 300,
            sweep_interval_secs: 600,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
