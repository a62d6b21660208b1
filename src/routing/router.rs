//! Scope lookup.
//!
//! # Responsibilities
//! - Store the compiled scope tree
//! - Find the most specific scope for a request
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Descends one level at a time; among matching siblings the longest
//!   path prefix wins, then declaration order
//! - Always yields a scope: the root matches every request

use axum::body::Body;
use axum::http::Request;

use crate::config::scope::Scope;

#[derive(Debug, Default)]
pub struct ScopeRouter {
    root: Scope,
}

impl ScopeRouter {
    pub fn new(root: Scope) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Scope {
        &self.root
    }

    /// Find the innermost scope matching `req`.
    pub fn resolve(&self, req: &Request<Body>) -> &Scope {
        let mut current = &self.root;

        loop {
            let mut best: Option<&Scope> = None;
            for child in current.children() {
                if !child.matches(req) {
                    continue;
                }
                if best.map_or(true, |b| child.prefix_len() > b.prefix_len()) {
                    best = Some(child);
                }
            }

            match best {
                Some(next) => current = next,
                None => return current,
            }
        }
    }
}
