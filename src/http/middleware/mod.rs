//! Request-path middleware.

pub mod redirect;

pub use redirect::{redirect_middleware, RedirectState, SetupError};
