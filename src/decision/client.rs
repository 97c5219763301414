//! Client for the redirection decision service.

use std::time::{Duration, Instant};

use url::Url;

use crate::config::DecisionServiceConfig;
use crate::decision::key::LookupKey;

/// Outcome of one decision lookup. Transient; never stored except by the
/// optional memoization layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The service returned 200; the body is the redirect target, verbatim.
    Redirect(String),

    /// The service answered with a non-200 status: no rule, pass through.
    PassThrough,

    /// The service could not be reached or its body could not be read.
    /// Always degrades to forwarding, never to a client-visible error.
    Unavailable,
}

/// HTTP client for the decision endpoint.
pub struct DecisionClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DecisionClient {
    /// Build a client with the configured endpoint and timeout.
    pub fn new(config: &DecisionServiceConfig) -> Result<Self, ClientError> {
        let base_url = Url::parse(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { http, base_url })
    }

    /// Ask the service whether `key` should redirect.
    ///
    /// `started` is the start of the whole request-handling call, so the
    /// logged elapsed time covers header rendering too. Every failure mode
    /// folds into [`Outcome::Unavailable`] — the caller fails open.
    pub async fn lookup(&self, key: &LookupKey, started: Instant) -> Outcome {
        let request = self
            .http
            .get(self.base_url.clone())
            .query(&[("host", key.host.as_str()), ("url", key.path.as_str())]);

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "Error calling redirection service");
                return Outcome::Unavailable;
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(error) => {
                tracing::warn!(%error, "Error reading response from redirection service");
                return Outcome::Unavailable;
            }
        };

        let elapsed = started.elapsed();
        tracing::info!(
            host = %key.host,
            path = %key.path,
            body = %body,
            elapsed = ?elapsed,
            "Redirection lookup"
        );

        if status == reqwest::StatusCode::OK {
            Outcome::Redirect(body)
        } else {
            Outcome::PassThrough
        }
    }
}

/// Failure to construct the decision client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid decision service URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("HTTP client setup failed: {0}")]
    Http(#[from] reqwest::Error),
}
