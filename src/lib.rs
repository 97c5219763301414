//! HTTP redirection middleware.
//!
//! Sits in front of an upstream handler, renders configured header
//! templates onto each request, asks an external decision service whether
//! the request's (host, path) has a redirect rule, and either answers with
//! a 301 or forwards the request unchanged.

pub mod config;
pub mod decision;
pub mod headers;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::RedirectorConfig;
pub use http::middleware::{redirect_middleware, RedirectState};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
