//! Redirect decision subsystem.
//!
//! # Data Flow
//! ```text
//! request → key.rs (derive (host, path))
//!     → cache.rs (optional memoized outcome)
//!     → client.rs (GET decision service, bounded timeout)
//!     → Outcome { Redirect | PassThrough | Unavailable }
//! ```
//!
//! # Design Decisions
//! - Every service failure (unreachable, timeout, unreadable body) folds
//!   into `Unavailable`, which the middleware treats as "no rule" — a
//!   decision-service outage must never break normal traffic
//! - Non-200 statuses are not errors; they are the "no rule" answer

pub mod cache;
pub mod client;
pub mod key;

pub use cache::DecisionCache;
pub use client::{ClientError, DecisionClient, Outcome};
pub use key::LookupKey;
