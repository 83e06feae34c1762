// ABOUTME: Maps workflow results to the named outputs reported to the caller.
// ABOUTME: Structured values are JSON-encoded strings.

use serde::Serialize;

use crate::config::WorkflowStep;

use super::result::{StepResult, StepStatus, WorkflowResults};

/// One `name=value` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutput {
    pub name: &'static str,
    pub value: String,
}

impl StepOutput {
    fn new(name: &'static str, value: impl ToString) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// Outputs for every recorded step, in result order.
pub fn step_outputs(results: &WorkflowResults) -> Result<Vec<StepOutput>, serde_json::Error> {
    let mut outputs = Vec::new();

    for (step, result) in results.iter() {
        match (step, result) {
            (WorkflowStep::Upload, StepResult::Upload(package)) => {
                outputs.push(StepOutput::new("upload_package_id", &package.package_id));
                outputs.push(StepOutput::new("upload_package_url", &package.package_url));
                outputs.push(StepOutput::new("upload_status", StepStatus::Success));
                outputs.push(StepOutput::new("upload_was_updated", package.was_updated));
            }
            (WorkflowStep::Upload, _) => {
                outputs.push(StepOutput::new("upload_status", result.status()));
            }
            (WorkflowStep::Deploy, StepResult::Deploy(report)) => {
                outputs.push(StepOutput::new(
                    "deploy_deployment_ids",
                    serde_json::to_string(&report.deployment_ids())?,
                ));
                outputs.push(StepOutput::new(
                    "deploy_deployment_summary",
                    serde_json::to_string(&report.outcomes)?,
                ));
                outputs.push(StepOutput::new("deploy_status", report.status));
            }
            (WorkflowStep::Deploy, _) => {
                outputs.push(StepOutput::new("deploy_status", result.status()));
            }
            (WorkflowStep::Push, _) => {
                outputs.push(StepOutput::new("push_status", result.status()));
            }
        }
    }

    Ok(outputs)
}
