//! Accept-Language negotiation library and server.
//!
//! The core is [`negotiation`]: given the raw `Accept-Language` value and a
//! scope's ordered language tags, pick the first tag that prefixes a client
//! range, in the client's order, or fall back to the first tag. The other
//! modules host it: configuration scopes and directives, request variables,
//! scope routing and an HTTP server.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod negotiation;
pub mod observability;
pub mod routing;
pub mod variables;

pub use config::{Configuration, ServerConfig};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use negotiation::{negotiate, LanguageTag, Negotiation, TagList};
