// ABOUTME: Step results, per-node deployment outcomes, and the results accumulator.
// ABOUTME: Steps return values instead of raising; the orchestrator records them.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::{WorkflowStep, ZeroSuccessStatus};
use crate::registry::{DeploymentRecord, UploadedPackage};
use crate::types::{DeploymentId, NodeId, PackageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Success,
    Failed,
    Skipped,
    Partial,
}

impl StepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Success => "success",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
            StepStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    Success,
    Failed,
}

/// What happened on one deploy target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeploymentOutcome {
    pub node_id: NodeId,
    pub deployment_id: Option<DeploymentId>,
    pub status: NodeStatus,
    /// Raw deployment record returned by the registry.
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeploymentOutcome {
    pub fn succeeded(node_id: NodeId, record: DeploymentRecord) -> Self {
        Self {
            node_id,
            deployment_id: record.id,
            status: NodeStatus::Success,
            result: Some(record.raw),
            error: None,
        }
    }

    pub fn failed(node_id: NodeId, error: Option<String>) -> Self {
        Self {
            node_id,
            deployment_id: None,
            status: NodeStatus::Failed,
            result: None,
            error,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == NodeStatus::Success
    }
}

/// Aggregated result of the deploy fan-out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeployReport {
    pub package_id: PackageId,
    pub status: StepStatus,
    pub outcomes: Vec<DeploymentOutcome>,
}

impl DeployReport {
    /// Aggregate per-node outcomes.
    ///
    /// `success` when every node succeeded, `partial` when at least one did,
    /// and `zero_success` when none did.
    pub fn aggregate(
        package_id: PackageId,
        outcomes: Vec<DeploymentOutcome>,
        zero_success: ZeroSuccessStatus,
    ) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.is_success()).count();

        let status = if succeeded == outcomes.len() {
            StepStatus::Success
        } else if succeeded > 0 {
            StepStatus::Partial
        } else {
            match zero_success {
                ZeroSuccessStatus::Failed => StepStatus::Failed,
                ZeroSuccessStatus::Partial => StepStatus::Partial,
            }
        };

        Self {
            package_id,
            status,
            outcomes,
        }
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn total_count(&self) -> usize {
        self.outcomes.len()
    }

    /// IDs of created deployments, in node order. Nodes without an ID are skipped.
    pub fn deployment_ids(&self) -> Vec<&DeploymentId> {
        self.outcomes
            .iter()
            .filter_map(|o| o.deployment_id.as_ref())
            .collect()
    }
}

/// Result of executing one workflow step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    Skipped { message: String },
    Upload(UploadedPackage),
    Deploy(DeployReport),
    Failed { error: String },
}

impl StepResult {
    pub fn status(&self) -> StepStatus {
        match self {
            StepResult::Skipped { .. } => StepStatus::Skipped,
            StepResult::Upload(_) => StepStatus::Success,
            StepResult::Deploy(report) => report.status,
            StepResult::Failed { .. } => StepStatus::Failed,
        }
    }

    /// Package ID produced by a successful upload.
    pub fn uploaded_package_id(&self) -> Option<&PackageId> {
        match self {
            StepResult::Upload(package) => Some(&package.package_id),
            _ => None,
        }
    }
}

/// Results keyed by step, in first-execution order.
///
/// Recording a step again replaces its entry in place. Every execution is
/// also appended to [`WorkflowResults::executions`].
#[derive(Debug, Default)]
pub struct WorkflowResults {
    entries: Vec<(WorkflowStep, StepResult)>,
    executions: Vec<(WorkflowStep, StepStatus)>,
}

impl WorkflowResults {
    pub fn record(&mut self, step: WorkflowStep, result: StepResult) {
        self.executions.push((step, result.status()));

        match self.entries.iter_mut().find(|(s, _)| *s == step) {
            Some(entry) => entry.1 = result,
            None => self.entries.push((step, result)),
        }
    }

    pub fn get(&self, step: WorkflowStep) -> Option<&StepResult> {
        self.entries
            .iter()
            .find(|(s, _)| *s == step)
            .map(|(_, result)| result)
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkflowStep, &StepResult)> {
        self.entries.iter().map(|(step, result)| (*step, result))
    }

    /// Every step execution in run order, repeats included.
    pub fn executions(&self) -> &[(WorkflowStep, StepStatus)] {
        &self.executions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Package ID from the most recent upload, if it succeeded.
    pub fn uploaded_package_id(&self) -> Option<&PackageId> {
        self.get(WorkflowStep::Upload)
            .and_then(StepResult::uploaded_package_id)
    }
}
