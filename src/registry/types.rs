// ABOUTME: Wire records exchanged with the package registry API.
// ABOUTME: Unknown response fields are preserved for reporting.

use crate::types::{DeploymentId, PackageId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A package as returned by the packages endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackageRecord {
    pub id: PackageId,
    #[serde(default)]
    pub package_file: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Paginated package lookup response.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageList {
    pub count: u64,
    #[serde(default)]
    pub results: Vec<PackageRecord>,
}

/// Result of uploading a package.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadedPackage {
    pub package_id: PackageId,
    pub package_url: String,
    /// True when an existing `name:tag` package was replaced (HTTP 200),
    /// false when a new package was created (HTTP 201).
    pub was_updated: bool,
    pub response: Value,
}

/// A deployment created on one node.
#[derive(Debug, Clone, PartialEq)]
pub struct DeploymentRecord {
    pub id: Option<DeploymentId>,
    pub raw: Value,
}

impl DeploymentRecord {
    /// Build from a response body, picking out `id` when present.
    pub fn from_value(raw: Value) -> Result<Self, serde_json::Error> {
        let id = match raw.get("id") {
            Some(Value::Null) | None => None,
            Some(id) => Some(DeploymentId::deserialize(id)?),
        };
        Ok(Self { id, raw })
    }
}
