//! Lookup key derivation.

use axum::http::Request;

use crate::http::request;

/// The (host, path) pair a redirect decision is keyed by.
///
/// Derived transiently per request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupKey {
    pub host: String,
    pub path: String,
}

impl LookupKey {
    /// Derive the key from a request: URI host when present, Host header
    /// otherwise; URI path verbatim.
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            host: request::host(req),
            path: request::path(req),
        }
    }
}
