// ABOUTME: Error types for package archiving and manifest validation.
// ABOUTME: Manifest failures carry the reason surfaced to the workflow caller.

use std::path::PathBuf;
use thiserror::Error;

/// Errors building a package archive.
#[derive(Debug, Error)]
pub enum PackageError {
    #[error("package path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("package path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("failed to walk package directory: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("failed to add {path} to archive: {source}")]
    AddFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons a package archive fails manifest validation.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("edge.json file not found at root level of package")]
    NotFound,

    #[error("invalid JSON in edge.json: {0}")]
    InvalidSyntax(#[source] serde_json::Error),

    #[error("edge.json must be a JSON object")]
    NotAnObject,

    #[error("edge.json must contain 'script_path' key")]
    MissingScriptPath,

    #[error("script_path must be a string")]
    ScriptPathNotString,

    #[error("script_path cannot be empty")]
    EmptyScriptPath,

    #[error("script file '{0}' not found in package")]
    ScriptNotFound(String),

    #[error("failed to read package archive: {0}")]
    Io(#[from] std::io::Error),
}

impl ManifestError {
    /// Human-readable reason for the validation failure.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
