// ABOUTME: Run command implementation.
// ABOUTME: Validates inputs, executes the workflow, and publishes step outputs.

use edge_deploy::config::RawInputs;
use edge_deploy::error::{Error, Result};
use edge_deploy::http::ReqwestTransport;
use edge_deploy::output::Output;
use edge_deploy::registry::RegistryClient;
use edge_deploy::workflow::Workflow;
use tracing::info;

/// Run the requested workflow steps against the Edge Platform API.
///
/// Step failures are reported through outputs and do not fail the command;
/// only invalid inputs and output errors do.
pub async fn run(inputs: RawInputs, output: &mut Output) -> Result<()> {
    output.start_timer();

    let workflow = Workflow::new(inputs).validate()?;

    let config = workflow.config();
    info!("Starting Edge Action");
    let steps: Vec<&str> = config.steps().iter().map(|s| s.as_str()).collect();
    output.progress(&format!("Workflow: {}", steps.join(",")));
    output.progress(&format!("Base URL: {}", config.base_url()));

    let registry = RegistryClient::from_config(ReqwestTransport::new()?, config);
    let finished = workflow.run(&registry).await;

    for (step, result) in finished.results().iter() {
        output.progress(&format!("  {step}: {}", result.status()));
    }

    for warning in finished.diagnostics().warnings() {
        output.warning(&warning.message);
    }

    for entry in finished.outputs()? {
        output
            .set_output(entry.name, &entry.value)
            .map_err(|source| Error::Output {
                name: entry.name.to_string(),
                source,
            })?;
    }

    output.success("Edge Action completed successfully");
    Ok(())
}
