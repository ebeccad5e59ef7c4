//! Connection configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ArelError, ArelResult};
use crate::transpiler::Dialect;

/// Settings for the default connection collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Dialect used for quoting and clause layout
    #[serde(default)]
    pub dialect: Dialect,

    /// Keep bind values out of line (`$1`, `?`) instead of inlining them
    #[serde(default = "default_true")]
    pub prepared_statements: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            prepared_statements: true,
        }
    }
}

impl ConnectionConfig {
    /// Create a new configuration builder
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::default()
    }

    /// Parse a configuration from TOML text.
    ///
    /// ```toml
    /// dialect = "postgres"
    /// prepared_statements = false
    /// ```
    pub fn from_toml_str(content: &str) -> ArelResult<Self> {
        toml::from_str(content).map_err(|e| ArelError::Config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> ArelResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            dialect = ?config.dialect,
            "loaded connection config"
        );
        Ok(config)
    }
}

/// Builder for ConnectionConfig
#[derive(Debug, Default)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Set the dialect
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.config.dialect = dialect;
        self
    }

    /// Toggle out-of-line binds
    pub fn prepared_statements(mut self, enabled: bool) -> Self {
        self.config.prepared_statements = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}
