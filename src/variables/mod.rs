//! Request-scoped variables.
//!
//! # Data Flow
//! ```text
//! Configuration load:
//!     directives register names → registry.rs (name → provider)
//!     add_header / return values → template.rs (parsed templates)
//!
//! Per request:
//!     template.rs render
//!     → request.rs (lazy, cached per request)
//!     → provider (e.g. accept_language.rs) computes on first read
//! ```

pub mod accept_language;
pub mod registry;
pub mod request;
pub mod template;

pub use accept_language::AcceptLanguageVariable;
pub use registry::{
    RequestView, Variable, VariableError, VariableIndex, VariableProvider, VariableRegistry,
    VariableValue,
};
pub use request::RequestVariables;
pub use template::{Template, TemplateError};
