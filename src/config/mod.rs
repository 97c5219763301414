//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RedirectorConfig (validated, immutable)
//!     → shared via Arc to the request path
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults except the header map, which must be
//!   populated for the middleware to have any work to do
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    CacheConfig, DecisionServiceConfig, ListenerConfig, ObservabilityConfig, RedirectorConfig,
    TemplateConfig,
};
