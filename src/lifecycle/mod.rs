//! Lifecycle management.
//!
//! Startup order lives in `main.rs` (config first, then subsystems, then
//! the listener); this module owns shutdown coordination and the signal
//! listener that triggers it.

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
