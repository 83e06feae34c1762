// ABOUTME: Workflow step names and parsing of the comma-separated step list.
// ABOUTME: Input order is execution order; repeated steps run again.

use nonempty::NonEmpty;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStep {
    Push,
    Upload,
    Deploy,
}

impl WorkflowStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Push => "push",
            WorkflowStep::Upload => "upload",
            WorkflowStep::Deploy => "deploy",
        }
    }

    /// Steps that read the package directory.
    pub fn needs_package_source(&self) -> bool {
        matches!(self, WorkflowStep::Push | WorkflowStep::Upload)
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStep {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "push" => Ok(WorkflowStep::Push),
            "upload" => Ok(WorkflowStep::Upload),
            "deploy" => Ok(WorkflowStep::Deploy),
            other => Err(ConfigError::InvalidStep {
                step: other.to_string(),
            }),
        }
    }
}

/// Parse `"upload, deploy"` into an ordered step list.
///
/// Tokens are trimmed and blank tokens skipped. Any unknown token is an error.
pub fn parse_workflow(input: &str) -> Result<NonEmpty<WorkflowStep>, ConfigError> {
    let steps = input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(WorkflowStep::from_str)
        .collect::<Result<Vec<_>, _>>()?;

    NonEmpty::from_vec(steps).ok_or(ConfigError::EmptyWorkflow)
}
