// ABOUTME: Input validation errors raised before any workflow step runs.
// ABOUTME: Every variant aborts the process with a non-zero exit.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("Invalid workflow step: {step}. Valid steps: push, upload, deploy")]
    InvalidStep { step: String },

    #[error("workflow contains no steps")]
    EmptyWorkflow,

    #[error("package_path, package_name, and package_tag are required for upload/push workflows")]
    MissingPackageInputs,

    #[error("{inputs} required for deploy workflow")]
    MissingDeployInputs { inputs: &'static str },

    #[error("include_patterns and exclude_patterns are mutually exclusive")]
    ConflictingPatterns,

    #[error("invalid {name}: {reason}")]
    InvalidInput { name: &'static str, reason: String },
}

impl ConfigError {
    pub(crate) fn invalid(name: &'static str, reason: impl ToString) -> Self {
        ConfigError::InvalidInput {
            name,
            reason: reason.to_string(),
        }
    }
}
