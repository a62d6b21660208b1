//! Scope compilation and inheritance.
//!
//! # Responsibilities
//! - Apply each scope's directives through the directive table
//! - Resolve inheritance from parent to child in one pass afterwards
//! - Freeze the result as an immutable scope tree
//!
//! # Design Decisions
//! - Two passes: every directive of every scope is applied before any
//!   merge, so variable registration is complete before inheritance runs
//! - Language tags and `add_header` lists inherit all-or-nothing
//! - `return` never inherits

use axum::body::Body;
use axum::http::{HeaderName, Request, StatusCode};

use crate::config::directives::{self, DirectiveContext};
use crate::config::schema::ScopeConfig;
use crate::config::validation::ValidationError;
use crate::negotiation::{TagError, TagList};
use crate::routing::matcher::{AndMatcher, HostMatcher, Matcher, PathPrefixMatcher};
use crate::variables::{Template, VariableRegistry};

/// Name of the root scope.
pub const ROOT_SCOPE: &str = "http";

/// `add_header NAME VALUE`
#[derive(Debug, Clone)]
pub struct AddHeader {
    pub name: HeaderName,
    pub value: Template,
}

/// `return CODE [TEXT]`
#[derive(Debug, Clone)]
pub struct Respond {
    pub status: StatusCode,
    pub text: Option<Template>,
}

/// Directive-controlled settings of one scope.
#[derive(Debug, Clone, Default)]
pub struct ScopeDirectives {
    pub accept_language: TagList,
    pub add_headers: Vec<AddHeader>,
    pub respond: Option<Respond>,
}

impl ScopeDirectives {
    /// Resolve a child's settings against its already resolved parent.
    pub fn merge(parent: &ScopeDirectives, child: ScopeDirectives) -> Result<Self, TagError> {
        let add_headers = if child.add_headers.is_empty() {
            parent.add_headers.clone()
        } else {
            child.add_headers
        };

        Ok(Self {
            accept_language: TagList::merge(&parent.accept_language, child.accept_language)?,
            add_headers,
            respond: child.respond,
        })
    }
}

/// A scope with its own directives applied, before inheritance.
#[derive(Debug)]
struct ScopeNode {
    name: String,
    host: Option<String>,
    path_prefix: Option<String>,
    directives: ScopeDirectives,
    children: Vec<ScopeNode>,
}

impl ScopeNode {
    fn build(
        config: &ScopeConfig,
        name: String,
        variables: &mut VariableRegistry,
        errors: &mut Vec<ValidationError>,
    ) -> Self {
        let mut conf = ScopeDirectives::default();
        let mut ctx = DirectiveContext {
            variables: &mut *variables,
            scope: &name,
        };

        for entry in &config.directives {
            if let Err(source) = directives::apply(&mut ctx, &mut conf, entry) {
                errors.push(ValidationError::Directive {
                    scope: name.clone(),
                    source,
                });
            }
        }

        let children = config
            .locations
            .iter()
            .enumerate()
            .map(|(i, location)| {
                let child = location
                    .name
                    .clone()
                    .or_else(|| location.path_prefix.clone())
                    .or_else(|| location.host.clone())
                    .unwrap_or_else(|| format!("{}[{}]", name, i));
                ScopeNode::build(location, child, variables, errors)
            })
            .collect();

        Self {
            name,
            host: config.host.clone(),
            path_prefix: config.path_prefix.clone(),
            directives: conf,
            children,
        }
    }

    fn resolve(self, parent: &ScopeDirectives, errors: &mut Vec<ValidationError>) -> Scope {
        let directives = match ScopeDirectives::merge(parent, self.directives) {
            Ok(merged) => merged,
            Err(source) => {
                errors.push(ValidationError::Merge {
                    scope: self.name.clone(),
                    source,
                });
                ScopeDirectives::default()
            }
        };

        let mut matchers: Vec<Box<dyn Matcher>> = Vec::new();
        if let Some(host) = &self.host {
            matchers.push(Box::new(HostMatcher::new(host.as_str())));
        }
        if let Some(prefix) = &self.path_prefix {
            matchers.push(Box::new(PathPrefixMatcher::new(prefix.as_str())));
        }

        let children = self
            .children
            .into_iter()
            .map(|child| child.resolve(&directives, errors))
            .collect();

        Scope {
            name: self.name,
            matcher: AndMatcher::new(matchers),
            prefix_len: self.path_prefix.map_or(0, |p| p.len()),
            directives,
            children,
        }
    }
}

/// A resolved, immutable request-processing scope.
#[derive(Debug, Default)]
pub struct Scope {
    name: String,
    matcher: AndMatcher,
    prefix_len: usize,
    directives: ScopeDirectives,
    children: Vec<Scope>,
}

impl Scope {
    /// Compile the root scope and everything nested in it.
    ///
    /// Variables named by directives are registered in `variables`.
    pub fn compile(
        config: &ScopeConfig,
        variables: &mut VariableRegistry,
    ) -> Result<Scope, Vec<ValidationError>> {
        let mut errors = Vec::new();
        let root = ScopeNode::build(config, ROOT_SCOPE.to_string(), variables, &mut errors);
        let scope = root.resolve(&ScopeDirectives::default(), &mut errors);

        if errors.is_empty() {
            Ok(scope)
        } else {
            Err(errors)
        }
    }

    /// Replace this scope's language tags.
    pub fn with_accept_language(mut self, tags: TagList) -> Self {
        self.directives.accept_language = tags;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved language tags; empty when negotiation is off for the scope.
    pub fn accept_language(&self) -> &TagList {
        &self.directives.accept_language
    }

    pub fn add_headers(&self) -> &[AddHeader] {
        &self.directives.add_headers
    }

    pub fn respond(&self) -> Option<&Respond> {
        self.directives.respond.as_ref()
    }

    pub fn children(&self) -> &[Scope] {
        &self.children
    }

    pub fn matches(&self, req: &Request<Body>) -> bool {
        self.matcher.matches(req)
    }

    /// Length of the path prefix this scope matches on; longer is more specific.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }
}
