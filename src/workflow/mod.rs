// ABOUTME: Workflow orchestration using the type state pattern.
// ABOUTME: Exports state markers, the Workflow struct, steps, results, and outputs.

mod orchestrator;
mod outputs;
mod result;
mod state;
mod steps;

pub use orchestrator::Workflow;
pub use outputs::{StepOutput, step_outputs};
pub use result::{
    DeployReport, DeploymentOutcome, NodeStatus, StepResult, StepStatus, WorkflowResults,
};
pub use state::{Finished, Pending, Validated};
pub use steps::{StepError, deploy_step, push_step, upload_step};
