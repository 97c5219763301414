//! Header templating subsystem.
//!
//! Runs first on every request: configured templates are rendered against
//! the request and the results set as request headers, visible to the
//! redirect decision and to the next handler if the request is forwarded.

pub mod renderer;

pub use renderer::{HeaderRenderer, RenderError};
