//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (host, path)
//!     → router.rs (walk the scope tree)
//!     → matcher.rs (evaluate match conditions)
//!     → Return: innermost matching Scope (root if none)
//!
//! Scope Compilation (at startup / reload):
//!     ScopeConfig tree
//!     → config::scope (apply directives, merge parents into children)
//!     → Freeze as immutable ScopeRouter
//! ```
//!
//! # Design Decisions
//! - Scopes compiled at load time, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same input always resolves to the same scope

pub mod matcher;
pub mod router;

pub use router::ScopeRouter;
