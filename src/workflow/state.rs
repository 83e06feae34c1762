// ABOUTME: Workflow state marker types for the type state pattern.
// ABOUTME: Each state carries the data that exists at that point of a run.

use crate::config::{RawInputs, WorkflowConfig};
use crate::diagnostics::Diagnostics;

use super::result::WorkflowResults;

/// Inputs received, nothing checked yet.
/// Available actions: `validate()`
#[derive(Debug)]
pub struct Pending {
    pub(crate) inputs: RawInputs,
}

/// Inputs validated into an immutable config.
/// Available actions: `run()`
#[derive(Debug)]
pub struct Validated {
    pub(crate) config: WorkflowConfig,
}

/// Every requested step has been attempted.
/// Available actions: `results()`, `outputs()`
#[derive(Debug)]
pub struct Finished {
    pub(crate) config: WorkflowConfig,
    pub(crate) results: WorkflowResults,
    pub(crate) diagnostics: Diagnostics,
}
