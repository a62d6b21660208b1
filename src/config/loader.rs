//! Configuration loading from disk.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::config::schema::ServerConfig;
use crate::config::scope::Scope;
use crate::config::validation::{validate_config, validate_templates, ValidationError};
use crate::routing::ScopeRouter;
use crate::variables::VariableRegistry;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", ValidationErrors(.0))]
    Validation(Vec<ValidationError>),
}

struct ValidationErrors<'a>(&'a [ValidationError]);

impl fmt::Display for ValidationErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

/// A validated, compiled configuration. Immutable once built.
#[derive(Debug)]
pub struct Configuration {
    server: ServerConfig,
    variables: VariableRegistry,
    router: ScopeRouter,
}

impl Configuration {
    /// Validate and compile a parsed configuration.
    pub fn compile(server: ServerConfig) -> Result<Self, ConfigError> {
        validate_config(&server).map_err(ConfigError::Validation)?;

        let mut variables = VariableRegistry::new();
        let root = Scope::compile(&server.http, &mut variables).map_err(ConfigError::Validation)?;

        let errors = validate_templates(&root, &variables);
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }

        tracing::debug!(
            variables = variables.len(),
            default_tags = root.accept_language().len(),
            "Configuration compiled"
        );

        Ok(Self {
            server,
            variables,
            router: ScopeRouter::new(root),
        })
    }

    pub fn server(&self) -> &ServerConfig {
        &self.server
    }

    pub fn variables(&self) -> &VariableRegistry {
        &self.variables
    }

    pub fn router(&self) -> &ScopeRouter {
        &self.router
    }
}

/// Read and parse a TOML file without compiling it.
pub fn read_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Load, validate and compile configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<Configuration, ConfigError> {
    Configuration::compile(read_config(path)?)
}
