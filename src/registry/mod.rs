// ABOUTME: Client for the Edge Platform package registry.
// ABOUTME: The PackageRegistry trait is the seam the workflow runs against.

mod client;
mod error;
mod types;

pub use client::{ApiEndpoints, PackageRegistry, RegistryClient};
pub use error::RegistryError;
pub use types::{DeploymentRecord, PackageList, PackageRecord, UploadedPackage};
