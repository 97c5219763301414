//! Redirect middleware.
//!
//! The core request path: render the configured header templates, ask the
//! decision service whether the (host, path) pair has a redirect rule, then
//! either answer 301 or hand the request to the next handler.
//!
//! The flow is a fixed linear sequence, kept as an explicit state enum so
//! each transition matches the contract and future states (for example a
//! cache-hit shortcut) stay additive:
//!
//! ```text
//! RenderHeaders ──ok──▶ QueryDecision ──200──▶ Redirect (301, stop)
//!       │                     │
//!      err                 other status / unavailable
//!       ▼                     ▼
//!   Abort (500, stop)      Forward (next handler)
//! ```

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::validation::{validate_config, ValidationError};
use crate::config::RedirectorConfig;
use crate::decision::{ClientError, DecisionCache, DecisionClient, LookupKey, Outcome};
use crate::headers::{HeaderRenderer, RenderError};

/// Failure to construct the middleware state.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid configuration: {}", format_violations(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("template syntax setup failed: {0}")]
    Template(#[from] minijinja::Error),

    #[error(transparent)]
    Client(#[from] ClientError),
}

fn format_violations(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Immutable per-route state shared by all concurrent invocations.
pub struct RedirectState {
    renderer: HeaderRenderer,
    client: DecisionClient,
    cache: Option<DecisionCache>,
}

impl RedirectState {
    /// Build the middleware state from a configuration. Fails if the config
    /// is semantically invalid — in particular if the header map is empty.
    pub fn new(config: &RedirectorConfig) -> Result<Self, SetupError> {
        validate_config(config).map_err(SetupError::InvalidConfig)?;

        let renderer = HeaderRenderer::new(config.headers.clone(), &config.template)?;
        let client = DecisionClient::new(&config.decision)?;
        let cache = config
            .cache
            .enabled
            .then(|| DecisionCache::new(Duration::from_secs(config.cache.ttl_secs)));

        Ok(Self {
            renderer,
            client,
            cache,
        })
    }

    /// The memoization cache, when enabled.
    pub fn cache(&self) -> Option<&DecisionCache> {
        self.cache.as_ref()
    }

    async fn decide(&self, key: &LookupKey, started: Instant) -> Outcome {
        if let Some(cache) = &self.cache {
            if let Some(outcome) = cache.get(key) {
                tracing::debug!(host = %key.host, path = %key.path, "Decision served from cache");
                return outcome;
            }
        }

        let outcome = self.client.lookup(key, started).await;

        if let Some(cache) = &self.cache {
            cache.insert(key.clone(), &outcome);
        }
        outcome
    }
}

/// States of the per-request decision sequence.
enum Flow {
    RenderHeaders,
    QueryDecision,
    Redirect(String),
    Forward,
    Abort(RenderError),
}

/// The middleware entry point, for use with
/// `axum::middleware::from_fn_with_state`.
pub async fn redirect_middleware(
    State(state): State<Arc<RedirectState>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let started = Instant::now();
    let mut flow = Flow::RenderHeaders;

    loop {
        flow = match flow {
            Flow::RenderHeaders => match state.renderer.apply(&mut req) {
                Ok(()) => Flow::QueryDecision,
                Err(error) => Flow::Abort(error),
            },

            Flow::QueryDecision => {
                let key = LookupKey::from_request(&req);
                match state.decide(&key, started).await {
                    Outcome::Redirect(target) => Flow::Redirect(target),
                    Outcome::PassThrough | Outcome::Unavailable => Flow::Forward,
                }
            }

            Flow::Redirect(target) => match moved_permanently(&target) {
                Some(response) => return response,
                None => {
                    tracing::warn!(
                        target = %target,
                        "Redirect target is not a usable Location value, forwarding instead"
                    );
                    Flow::Forward
                }
            },

            Flow::Forward => return next.run(req).await,

            Flow::Abort(error) => {
                tracing::error!(%error, "Header rendering failed");
                return (StatusCode::INTERNAL_SERVER_ERROR, error.to_string()).into_response();
            }
        };
    }
}

/// A 301 response pointing at `target`, or None if `target` cannot be
/// carried in a Location header.
fn moved_permanently(target: &str) -> Option<Response> {
    let location = HeaderValue::from_str(target).ok()?;
    let mut response = StatusCode::MOVED_PERMANENTLY.into_response();
    response.headers_mut().insert(header::LOCATION, location);
    Some(response)
}
