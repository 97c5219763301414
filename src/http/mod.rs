//! HTTP subsystem: server wiring, middleware, request helpers.

pub mod middleware;
pub mod request;
pub mod server;

pub use server::HttpServer;
