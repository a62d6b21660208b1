//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check scope matchers are well formed
//! - Check templates only read registered variables
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::directives::DirectiveError;
use crate::config::schema::{ScopeConfig, ServerConfig};
use crate::config::scope::Scope;
use crate::negotiation::TagError;
use crate::variables::VariableRegistry;

/// A single semantic problem in the configuration.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid {field} \"{value}\"")]
    Address { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("root scope cannot set host or path_prefix")]
    RootMatcher,

    #[error("scope \"{scope}\": path_prefix \"{prefix}\" must start with '/'")]
    PathPrefix { scope: String, prefix: String },

    #[error("scope \"{scope}\": {source}")]
    Directive {
        scope: String,
        #[source]
        source: DirectiveError,
    },

    #[error("scope \"{scope}\": unknown variable \"${variable}\"")]
    UnknownVariable { scope: String, variable: String },

    #[error("scope \"{scope}\": {source}")]
    Merge {
        scope: String,
        #[source]
        source: TagError,
    },
}

/// Validate the parts of the configuration that do not need compiling.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::Address {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::Zero {
            field: "listener.max_connections",
        });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::Zero {
            field: "timeouts.request_secs",
        });
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::Address {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    if config.http.host.is_some() || config.http.path_prefix.is_some() {
        errors.push(ValidationError::RootMatcher);
    }
    validate_locations(&config.http, "http", &mut errors);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_locations(scope: &ScopeConfig, name: &str, errors: &mut Vec<ValidationError>) {
    for location in &scope.locations {
        let child = location.name.as_deref().unwrap_or(name);
        if let Some(prefix) = &location.path_prefix {
            if !prefix.starts_with('/') {
                errors.push(ValidationError::PathPrefix {
                    scope: child.to_string(),
                    prefix: prefix.clone(),
                });
            }
        }
        validate_locations(location, child, errors);
    }
}

/// Check every template in the compiled scope tree against the registry.
pub fn validate_templates(root: &Scope, variables: &VariableRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_scope(root, variables, &mut errors);
    errors
}

fn check_scope(scope: &Scope, variables: &VariableRegistry, errors: &mut Vec<ValidationError>) {
    let templates = scope
        .add_headers()
        .iter()
        .map(|h| &h.value)
        .chain(scope.respond().and_then(|r| r.text.as_ref()));

    for template in templates {
        for name in template.variables() {
            if variables.lookup(name).is_none() {
                errors.push(ValidationError::UnknownVariable {
                    scope: scope.name().to_string(),
                    variable: name.to_string(),
                });
            }
        }
    }

    for child in scope.children() {
        check_scope(child, variables, errors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServerConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServerConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.timeouts.request_secs = 0;
        config.http.path_prefix = Some("/".into());
        config.http.locations.push(ScopeConfig {
            name: Some("docs".into()),
            path_prefix: Some("docs".into()),
            ..Default::default()
        });

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors[3].to_string(),
            "scope \"docs\": path_prefix \"docs\" must start with '/'"
        );
    }
}
