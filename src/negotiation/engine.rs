//! Negotiation engine.
//!
//! # Responsibilities
//! - Walk the client's language ranges in header order
//! - Pick the first configured tag that prefixes the current range
//! - Fall back to the first configured tag when nothing matches
//!
//! # Design Decisions
//! - Preference is by position: client order dominates, configured order
//!   only breaks ties inside one range
//! - Pure function over borrowed inputs; nothing is cached or mutated
//! - Cost is O(header length × tag count)

use crate::negotiation::range::LanguageRanges;
use crate::negotiation::tag::{LanguageTag, TagList};

/// Why a tag was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A client range matched a configured tag.
    Matched,
    /// The header was present but no range matched; default tag used.
    NoMatch,
    /// No header on the request; default tag used.
    HeaderAbsent,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Matched => "matched",
            Outcome::NoMatch => "no_match",
            Outcome::HeaderAbsent => "header_absent",
        }
    }
}

/// Result of one negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Negotiation<'a> {
    /// The scope has no configured tags; there is nothing to select.
    NotFound,
    /// A configured tag was selected.
    Selected {
        index: usize,
        tag: &'a LanguageTag,
        outcome: Outcome,
    },
}

impl<'a> Negotiation<'a> {
    pub fn tag(&self) -> Option<&'a LanguageTag> {
        match self {
            Negotiation::NotFound => None,
            Negotiation::Selected { tag, .. } => Some(tag),
        }
    }

    pub fn index(&self) -> Option<usize> {
        match self {
            Negotiation::NotFound => None,
            Negotiation::Selected { index, .. } => Some(*index),
        }
    }

    /// Label used in logs and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Negotiation::NotFound => "not_found",
            Negotiation::Selected { outcome, .. } => outcome.as_str(),
        }
    }
}

/// Select the configured tag that best fits an `Accept-Language` value.
///
/// `header` is the raw value of the first `Accept-Language` header, or
/// `None` when the request carries none.
pub fn negotiate<'a>(header: Option<&[u8]>, tags: &'a TagList) -> Negotiation<'a> {
    let Some(default) = tags.default_tag() else {
        return Negotiation::NotFound;
    };

    let Some(header) = header else {
        return Negotiation::Selected {
            index: 0,
            tag: default,
            outcome: Outcome::HeaderAbsent,
        };
    };

    for range in LanguageRanges::new(header) {
        let found = tags
            .iter()
            .enumerate()
            .find(|(_, tag)| tag.is_prefix_of(range.as_bytes()));

        if let Some((index, tag)) = found {
            return Negotiation::Selected {
                index,
                tag,
                outcome: Outcome::Matched,
            };
        }
    }

    Negotiation::Selected {
        index: 0,
        tag: default,
        outcome: Outcome::NoMatch,
    }
}
