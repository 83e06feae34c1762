// ABOUTME: The three workflow steps: push (placeholder), upload, deploy.
// ABOUTME: Each step converts its own failures into a failed StepResult.

use thiserror::Error;
use tracing::{debug, error, info};

use crate::config::WorkflowConfig;
use crate::diagnostics::{Diagnostics, Warning};
use crate::package::{ArchiveBuilder, ManifestError, ManifestValidator, PackageError};
use crate::registry::{PackageRegistry, RegistryError, UploadedPackage};
use crate::types::PackageId;

use super::result::{DeployReport, DeploymentOutcome, StepResult, WorkflowResults};

/// Why a step failed. Rendered into [`StepResult::Failed`].
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Package(#[from] PackageError),

    #[error("package validation failed: {0}")]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}

const PUSH_MESSAGE: &str = "Registry push is a future feature";

/// Registry push is not implemented; always reports `skipped`.
pub fn push_step() -> StepResult {
    info!("Registry push functionality is not yet implemented");
    StepResult::Skipped {
        message: PUSH_MESSAGE.to_string(),
    }
}

/// Archive the package directory, validate its manifest, upload it.
///
/// The temporary archive is removed whatever the outcome; a failed removal
/// is recorded as a warning.
pub async fn upload_step<R>(
    config: &WorkflowConfig,
    registry: &R,
    diagnostics: &mut Diagnostics,
) -> StepResult
where
    R: PackageRegistry + ?Sized,
{
    match upload(config, registry, diagnostics).await {
        Ok(package) => StepResult::Upload(package),
        Err(e) => {
            error!("Package upload failed: {e}");
            StepResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn upload<R>(
    config: &WorkflowConfig,
    registry: &R,
    diagnostics: &mut Diagnostics,
) -> Result<UploadedPackage, StepError>
where
    R: PackageRegistry + ?Sized,
{
    let root = config
        .package_path()
        .ok_or(StepError::NotConfigured("package_path"))?;
    let package = config
        .package()
        .ok_or(StepError::NotConfigured("package_name/package_tag"))?;

    let archive = ArchiveBuilder::new(root, config.patterns()).build(package)?;

    let outcome = match ManifestValidator::validate(archive.path()) {
        Ok(manifest) => {
            debug!(script_path = manifest.script_path(), "manifest valid");
            registry
                .upload_package(archive.path(), archive.file_name(), package)
                .await
                .map_err(StepError::from)
        }
        Err(e) => Err(e.into()),
    };

    let archive_path = archive.path().to_path_buf();
    if let Err(e) = archive.close() {
        diagnostics.warn(Warning::archive_cleanup(format!(
            "failed to remove temporary archive {}: {e}",
            archive_path.display()
        )));
    }

    outcome
}

/// Deploy the package to every configured node, one at a time.
///
/// Uses the package ID from an earlier successful upload in this run when
/// there is one, otherwise looks the package up by name and tag. A failing
/// node never stops the remaining nodes.
pub async fn deploy_step<R>(
    config: &WorkflowConfig,
    registry: &R,
    results: &WorkflowResults,
    diagnostics: &mut Diagnostics,
) -> StepResult
where
    R: PackageRegistry + ?Sized,
{
    match deploy(config, registry, results, diagnostics).await {
        Ok(report) => StepResult::Deploy(report),
        Err(e) => {
            error!("Deployment failed: {e}");
            StepResult::Failed {
                error: e.to_string(),
            }
        }
    }
}

async fn deploy<R>(
    config: &WorkflowConfig,
    registry: &R,
    results: &WorkflowResults,
    diagnostics: &mut Diagnostics,
) -> Result<DeployReport, StepError>
where
    R: PackageRegistry + ?Sized,
{
    let nodes = config
        .node_ids()
        .ok_or(StepError::NotConfigured("node_ids"))?;

    let package_id = resolve_package_id(config, registry, results).await?;

    let mut outcomes = Vec::with_capacity(nodes.len());
    for node_id in nodes.iter() {
        info!("Deploying to node: {node_id}");

        let outcome = match registry.create_deployment(&package_id, node_id).await {
            Ok(Some(record)) => DeploymentOutcome::succeeded(node_id.clone(), record),
            Ok(None) => {
                diagnostics.warn(Warning::node_deployment(format!(
                    "node {node_id}: deployment was not created"
                )));
                DeploymentOutcome::failed(node_id.clone(), None)
            }
            Err(e) => {
                error!("Deployment to node {node_id} failed: {e}");
                diagnostics.warn(Warning::node_deployment(format!("node {node_id}: {e}")));
                DeploymentOutcome::failed(node_id.clone(), Some(e.to_string()))
            }
        };
        outcomes.push(outcome);
    }

    let report = DeployReport::aggregate(package_id, outcomes, config.zero_success_status());
    info!(
        "Deployed to {}/{} node(s), status {}",
        report.success_count(),
        report.total_count(),
        report.status
    );

    Ok(report)
}

async fn resolve_package_id<R>(
    config: &WorkflowConfig,
    registry: &R,
    results: &WorkflowResults,
) -> Result<PackageId, StepError>
where
    R: PackageRegistry + ?Sized,
{
    if let Some(id) = results.uploaded_package_id() {
        info!("Using package ID from upload: {id}");
        return Ok(id.clone());
    }

    let package = config
        .package()
        .ok_or(StepError::NotConfigured("package_name/package_tag"))?;
    let id = registry.find_package_id(package).await?;
    info!("Retrieved package ID by name/tag: {id}");
    Ok(id)
}
