/**
 * config.rs
 * Client configuration (YAML format)
 *
 * Format:
 * ```yaml
 * endpoint: http://localhost:3030/roadnet/sparql
 * timeoutSecs: 30
 * userAgent: roadnet/0.1
 * ```
 *
 * `ROADNET_SPARQL_ENDPOINT` overrides the endpoint when set.
 */

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::errors::RoadnetError;

/// Default SPARQL endpoint (local Fuseki dataset)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:3030/roadnet/sparql";

/// Environment variable overriding the configured endpoint
pub const ENDPOINT_ENV_VAR: &str = "ROADNET_SPARQL_ENDPOINT";

/// SPARQL client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout; no timeout when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: None,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at the given endpoint, everything else default
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Default configuration with the environment override applied
    pub fn from_env() -> Self {
        Self::default().apply_env()
    }

    /// Load configuration from a YAML file
    ///
    /// # Example
    /// ```no_run
    /// use roadnet_sparql::ClientConfig;
    ///
    /// let config = ClientConfig::load("roadnet.yaml").unwrap();
    /// println!("{}", config.endpoint);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RoadnetError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(RoadnetError::FileNotFound(path.to_string_lossy().to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: ClientConfig = serde_yaml::from_str(&content)?;

        config.validate()?;

        Ok(config)
    }

    /// Replace the endpoint with `ROADNET_SPARQL_ENDPOINT` when it is set and non-empty
    pub fn apply_env(self) -> Self {
        match std::env::var(ENDPOINT_ENV_VAR) {
            Ok(endpoint) if !endpoint.trim().is_empty() => Self {
                endpoint: endpoint.trim().to_string(),
                ..self
            },
            _ => self,
        }
    }

    /// Ensures the endpoint is non-empty and a configured timeout is positive.
    /// The endpoint is otherwise passed through untouched.
    pub fn validate(&self) -> Result<(), RoadnetError> {
        if self.endpoint.trim().is_empty() {
            return Err(RoadnetError::ValidationError(
                "endpoint cannot be empty".to_string(),
            ));
        }

        if self.timeout_secs == Some(0) {
            return Err(RoadnetError::ValidationError(
                "timeoutSecs must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration as YAML
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), RoadnetError> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path.as_ref(), yaml)?;
        Ok(())
    }
}
