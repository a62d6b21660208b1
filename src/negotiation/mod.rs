//! Content-language negotiation.
//!
//! # Data Flow
//! ```text
//! Accept-Language value (raw bytes, or absent)
//!     → range.rs (split into ranges, skip ;q= suffixes)
//!     → engine.rs (first range prefixed by a configured tag wins)
//!     → Negotiation (selected tag index, or NotFound)
//!
//! Configuration load:
//!     set_from_accept_language arguments
//!     → tag.rs (TagList per scope)
//!     → TagList::merge (child inherits parent when it has none)
//! ```

pub mod engine;
pub mod range;
pub mod tag;

pub use engine::{negotiate, Negotiation, Outcome};
pub use range::{LanguageRange, LanguageRanges};
pub use tag::{LanguageTag, TagError, TagList};
