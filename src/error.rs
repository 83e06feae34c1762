// ABOUTME: Application-wide error types for edge-deploy.
// ABOUTME: Only validation and reporting failures reach the process exit path.

use thiserror::Error;

use crate::config::ConfigError;
use crate::http::TransportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to initialize HTTP client: {0}")]
    Transport(#[from] TransportError),

    #[error("failed to set output {name}: {source}")]
    Output {
        name: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode outputs: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
