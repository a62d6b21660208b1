//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → directives.rs (apply each scope's directives)
//!     → scope.rs (merge parents into children)
//!     → Configuration (validated, immutable)
//!     → shared via Arc to request handling
//!
//! On reload:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → atomic swap of Arc<Configuration>
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod directives;
pub mod loader;
pub mod schema;
pub mod scope;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, ConfigError, Configuration};
pub use schema::{ListenerConfig, LogFormat, ObservabilityConfig, ScopeConfig, ServerConfig, TimeoutConfig};
