//! Error types for roadnet-sparql

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadnetError {
    /// The endpoint answered with a non-success status
    #[error("SPARQL query failed: {status} {reason}")]
    Request { status: u16, reason: String },

    #[error("SPARQL transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("SPARQL results parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid node id: {0:?}")]
    InvalidNodeId(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("RDF store error: {0}")]
    Store(String),
}

impl RoadnetError {
    /// Build a request error from an HTTP status
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        RoadnetError::Request {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown Status").to_string(),
        }
    }
}

impl From<oxigraph::store::StorageError> for RoadnetError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        RoadnetError::Store(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoadnetError>;
