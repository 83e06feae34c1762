// ABOUTME: Error types for registry operations.
// ABOUTME: Non-retryable HTTP statuses surface with their status and body.

use crate::http::HttpError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Http(#[from] HttpError),

    #[error("upload failed with status {status}: {body}")]
    UploadFailed { status: u16, body: String },

    #[error("failed to retrieve package with status {status}: {body}")]
    LookupFailed { status: u16, body: String },

    #[error("package not found: {name}:{tag}")]
    PackageNotFound { name: String, tag: String },

    #[error("unexpected response from {endpoint}: {source}")]
    InvalidResponse {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read package archive {path}: {source}")]
    ReadArchive {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
