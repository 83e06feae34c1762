// ABOUTME: Workflow struct parameterized by state marker.
// ABOUTME: Validation and execution consume self and return the next state.

use tracing::info;

use crate::config::{ConfigError, RawInputs, WorkflowConfig, WorkflowStep};
use crate::diagnostics::Diagnostics;
use crate::registry::PackageRegistry;

use super::outputs::{StepOutput, step_outputs};
use super::result::{StepResult, WorkflowResults};
use super::state::{Finished, Pending, Validated};
use super::steps::{deploy_step, push_step, upload_step};

/// One invocation of the action, parameterized by its current state.
///
/// `Pending` holds raw inputs, `Validated` an immutable config, and
/// `Finished` the results of every requested step. A validation failure
/// aborts the run before any step executes.
#[derive(Debug)]
pub struct Workflow<S> {
    state: S,
}

impl Workflow<Pending> {
    pub fn new(inputs: RawInputs) -> Self {
        Workflow {
            state: Pending { inputs },
        }
    }

    /// Check every input and freeze the configuration.
    pub fn validate(self) -> Result<Workflow<Validated>, ConfigError> {
        let config = WorkflowConfig::from_inputs(&self.state.inputs)?;
        Ok(Workflow::from_config(config))
    }
}

impl Workflow<Validated> {
    /// Start from an already validated config.
    pub fn from_config(config: WorkflowConfig) -> Self {
        Workflow {
            state: Validated { config },
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.state.config
    }

    /// Execute the steps in the order given, repeats included.
    ///
    /// Every step runs even when an earlier one failed.
    pub async fn run<R>(self, registry: &R) -> Workflow<Finished>
    where
        R: PackageRegistry + ?Sized,
    {
        let config = self.state.config;
        let mut results = WorkflowResults::default();
        let mut diagnostics = Diagnostics::default();

        let names: Vec<&str> = config.steps().iter().map(WorkflowStep::as_str).collect();
        info!("Executing workflow steps: {}", names.join(", "));

        for step in config.steps().iter().copied() {
            info!("Executing step: {step}");
            let result = match step {
                WorkflowStep::Push => push_step(),
                WorkflowStep::Upload => upload_step(&config, registry, &mut diagnostics).await,
                WorkflowStep::Deploy => {
                    deploy_step(&config, registry, &results, &mut diagnostics).await
                }
            };
            info!("Step {step} finished: {}", result.status());
            results.record(step, result);
        }

        Workflow {
            state: Finished {
                config,
                results,
                diagnostics,
            },
        }
    }
}

impl Workflow<Finished> {
    pub fn config(&self) -> &WorkflowConfig {
        &self.state.config
    }

    pub fn results(&self) -> &WorkflowResults {
        &self.state.results
    }

    pub fn result(&self, step: WorkflowStep) -> Option<&StepResult> {
        self.state.results.get(step)
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.state.diagnostics
    }

    /// Named outputs for the caller.
    pub fn outputs(&self) -> Result<Vec<StepOutput>, serde_json::Error> {
        step_outputs(&self.state.results)
    }
}
