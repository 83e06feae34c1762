// ABOUTME: Registry operations: upload package, look up package, create deployment.
// ABOUTME: All calls carry a bearer token and go through the resilient HTTP client.

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Value, json};
use std::path::Path;
use tracing::{error, info};

use crate::config::WorkflowConfig;
use crate::http::{FilePart, HttpRequest, HttpTransport, MultipartBody, ResilientClient};
use crate::types::{NodeId, PackageId, PackageRef};

use super::error::RegistryError;
use super::types::{DeploymentRecord, PackageList, UploadedPackage};

const ARCHIVE_CONTENT_TYPE: &str = "application/gzip";

/// Remote operations the workflow needs from the registry.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Upload (upsert) a package archive under `package`'s name and tag.
    ///
    /// `file_name` is the name the archive is uploaded as.
    async fn upload_package(
        &self,
        archive: &Path,
        file_name: &str,
        package: &PackageRef,
    ) -> Result<UploadedPackage, RegistryError>;

    /// Resolve the ID of an already uploaded package.
    async fn find_package_id(&self, package: &PackageRef) -> Result<PackageId, RegistryError>;

    /// Create a deployment of `package_id` on one node.
    ///
    /// Returns `Ok(None)` when the registry refuses the deployment; the
    /// refusal is logged and only affects this node.
    async fn create_deployment(
        &self,
        package_id: &PackageId,
        node_id: &NodeId,
    ) -> Result<Option<DeploymentRecord>, RegistryError>;
}

/// Endpoint URLs derived from the base URL and API prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiEndpoints {
    root: String,
}

impl ApiEndpoints {
    pub fn new(base_url: &str, api_prefix: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        let prefix = api_prefix.trim_matches('/');
        let root = if prefix.is_empty() {
            base.to_string()
        } else {
            format!("{base}/{prefix}")
        };
        Self { root }
    }

    pub fn packages(&self) -> String {
        format!("{}/packages/", self.root)
    }

    pub fn deployments(&self) -> String {
        format!("{}/deployments/", self.root)
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    id: PackageId,
    package_file: String,
}

/// HTTP client for the package registry API.
#[derive(Debug)]
pub struct RegistryClient<T> {
    http: ResilientClient<T>,
    endpoints: ApiEndpoints,
    token: String,
}

impl<T: HttpTransport> RegistryClient<T> {
    pub fn new(http: ResilientClient<T>, endpoints: ApiEndpoints, token: impl Into<String>) -> Self {
        Self {
            http,
            endpoints,
            token: token.into(),
        }
    }

    /// Build a client for the registry described by `config`.
    pub fn from_config(transport: T, config: &WorkflowConfig) -> Self {
        Self::new(
            ResilientClient::new(transport, *config.retry_policy()),
            ApiEndpoints::new(config.base_url(), config.api_prefix()),
            config.api_token(),
        )
    }

    pub fn endpoints(&self) -> &ApiEndpoints {
        &self.endpoints
    }

    fn authorized(&self, request: HttpRequest) -> HttpRequest {
        request
            .header("Authorization", &format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }
}

#[async_trait]
impl<T: HttpTransport> PackageRegistry for RegistryClient<T> {
    async fn upload_package(
        &self,
        archive: &Path,
        file_name: &str,
        package: &PackageRef,
    ) -> Result<UploadedPackage, RegistryError> {
        let bytes = tokio::fs::read(archive)
            .await
            .map_err(|source| RegistryError::ReadArchive {
                path: archive.to_path_buf(),
                source,
            })?;

        let form = MultipartBody::default()
            .text("name", package.name())
            .text("tag", package.tag())
            .text("upsert", "true")
            .file(FilePart {
                field: "package_file".to_string(),
                file_name: file_name.to_string(),
                content_type: ARCHIVE_CONTENT_TYPE.to_string(),
                bytes: Bytes::from(bytes),
            });

        let request = self
            .authorized(HttpRequest::post(self.endpoints.packages()))
            .multipart(form);
        let response = self.http.send(&request).await?;

        let was_updated = match response.status {
            201 => false,
            200 => true,
            status => {
                return Err(RegistryError::UploadFailed {
                    status,
                    body: response.body,
                });
            }
        };

        let invalid = |source| RegistryError::InvalidResponse {
            endpoint: "packages",
            source,
        };
        let body: Value = response.json().map_err(invalid)?;
        let parsed = UploadResponse::deserialize(&body).map_err(invalid)?;

        let action = if was_updated { "updated" } else { "created" };
        info!("Package {} {} successfully. Package ID: {}", package, action, parsed.id);

        Ok(UploadedPackage {
            package_id: parsed.id,
            package_url: parsed.package_file,
            was_updated,
            response: body,
        })
    }

    async fn find_package_id(&self, package: &PackageRef) -> Result<PackageId, RegistryError> {
        let request = self
            .authorized(HttpRequest::get(self.endpoints.packages()))
            .query("name", package.name())
            .query("tag", package.tag());
        let response = self.http.send(&request).await?;

        if response.status != 200 {
            return Err(RegistryError::LookupFailed {
                status: response.status,
                body: response.body,
            });
        }

        let list: PackageList =
            response
                .json()
                .map_err(|source| RegistryError::InvalidResponse {
                    endpoint: "packages",
                    source,
                })?;

        if list.count == 0 {
            return Err(not_found(package));
        }

        list.results
            .into_iter()
            .next()
            .map(|record| record.id)
            .ok_or_else(|| not_found(package))
    }

    async fn create_deployment(
        &self,
        package_id: &PackageId,
        node_id: &NodeId,
    ) -> Result<Option<DeploymentRecord>, RegistryError> {
        let request = self
            .authorized(HttpRequest::post(self.endpoints.deployments()))
            .json(json!({
                "package_id": package_id.to_json(),
                "node_id": node_id.as_str(),
            }));
        let response = self.http.send(&request).await?;

        if response.status != 201 {
            error!(
                "Deployment to node {} failed with status {}: {}",
                node_id, response.status, response.body
            );
            return Ok(None);
        }

        let record = response
            .json()
            .and_then(DeploymentRecord::from_value)
            .map_err(|source| RegistryError::InvalidResponse {
                endpoint: "deployments",
                source,
            })?;

        match &record.id {
            Some(id) => info!("Deployment created for node {}. Deployment ID: {}", node_id, id),
            None => info!("Deployment created for node {} (no deployment ID returned)", node_id),
        }

        Ok(Some(record))
    }
}

fn not_found(package: &PackageRef) -> RegistryError {
    RegistryError::PackageNotFound {
        name: package.name().to_string(),
        tag: package.tag().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_join_base_and_prefix() {
        let endpoints = ApiEndpoints::new("https://edge.example.com/", "/public/sun/open-api/v1");
        assert_eq!(
            endpoints.packages(),
            "https://edge.example.com/public/sun/open-api/v1/packages/"
        );
        assert_eq!(
            endpoints.deployments(),
            "https://edge.example.com/public/sun/open-api/v1/deployments/"
        );
    }

    #[test]
    fn endpoints_without_prefix() {
        let endpoints = ApiEndpoints::new("http://localhost:8000", "");
        assert_eq!(endpoints.packages(), "http://localhost:8000/packages/");
    }
}
