//! Request inspection helpers.
//!
//! # Responsibilities
//! - Extract routing-relevant information (host, path)
//! - Host comes from the request URI when it is in absolute form,
//!   falling back to the Host header otherwise

use axum::http::{header, Request};

/// The host a request is addressed to.
///
/// Absolute-form URIs carry their own authority; origin-form requests only
/// have the Host header. Empty string if neither is present.
pub fn host<B>(req: &Request<B>) -> String {
    if let Some(host) = req.uri().host() {
        return host.to_string();
    }
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

/// The path component of the request URI.
pub fn path<B>(req: &Request<B>) -> String {
    req.uri().path().to_string()
}
