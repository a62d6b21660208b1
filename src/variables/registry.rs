//! Named, request-scoped computed values.
//!
//! # Responsibilities
//! - Register variable names at configuration time
//! - Attach the provider that computes a variable's value
//! - Evaluate a variable for one request
//!
//! # Design Decisions
//! - Names are case-insensitive and stored lowercased
//! - Registering an existing name is not an error; the first provider
//!   attached to a name is the one that stays
//! - Providers are pulled on read, never pushed

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::HeaderMap;
use bytes::Bytes;

use crate::config::scope::Scope;

/// Index of a registered variable.
pub type VariableIndex = usize;

/// Errors raised while registering variables.
#[derive(Debug, thiserror::Error)]
pub enum VariableError {
    #[error("invalid variable name \"{0}\"")]
    InvalidName(String),
}

/// Value produced by a provider for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableValue {
    pub data: Bytes,
    pub valid: bool,
    /// The value must be recomputed on every read.
    pub no_cacheable: bool,
    pub not_found: bool,
}

impl VariableValue {
    /// A determined value that may be cached for the rest of the request.
    pub fn found(data: Bytes) -> Self {
        Self {
            data,
            valid: true,
            no_cacheable: false,
            not_found: false,
        }
    }

    /// No value; reads render as empty and are never cached.
    pub fn not_found() -> Self {
        Self {
            data: Bytes::new(),
            valid: false,
            no_cacheable: true,
            not_found: true,
        }
    }
}

/// What a provider can see of the current request.
#[derive(Debug, Clone, Copy)]
pub struct RequestView<'r> {
    pub headers: &'r HeaderMap,
    pub scope: &'r Scope,
}

/// Computes a variable's value on demand.
pub trait VariableProvider: Send + Sync + fmt::Debug {
    fn evaluate(&self, request: &RequestView<'_>) -> VariableValue;
}

/// A registered variable.
#[derive(Debug)]
pub struct Variable {
    name: String,
    provider: Option<Arc<dyn VariableProvider>>,
}

impl Variable {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Attach `provider` unless one is already attached.
    ///
    /// Returns true if the provider was installed.
    pub fn set_provider_if_absent(&mut self, provider: Arc<dyn VariableProvider>) -> bool {
        if self.provider.is_some() {
            return false;
        }
        self.provider = Some(provider);
        true
    }
}

/// All variables known to a configuration.
#[derive(Debug, Default)]
pub struct VariableRegistry {
    variables: Vec<Variable>,
    by_name: HashMap<String, VariableIndex>,
}

impl VariableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`, or return the existing variable of that name.
    pub fn add(&mut self, name: &str) -> Result<&mut Variable, VariableError> {
        if name.is_empty() {
            return Err(VariableError::InvalidName(format!("${}", name)));
        }

        let key = name.to_ascii_lowercase();
        let index = match self.by_name.get(&key) {
            Some(&index) => index,
            None => {
                let index = self.variables.len();
                self.variables.push(Variable {
                    name: key.clone(),
                    provider: None,
                });
                self.by_name.insert(key, index);
                index
            }
        };

        Ok(&mut self.variables[index])
    }

    pub fn lookup(&self, name: &str) -> Option<VariableIndex> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn get(&self, index: VariableIndex) -> Option<&Variable> {
        self.variables.get(index)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// Evaluate one variable. Unknown indices and variables without a
    /// provider read as not found.
    pub fn evaluate(&self, index: VariableIndex, request: &RequestView<'_>) -> VariableValue {
        match self.variables.get(index).and_then(|v| v.provider.as_ref()) {
            Some(provider) => provider.evaluate(request),
            None => VariableValue::not_found(),
        }
    }
}
