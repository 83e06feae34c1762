// ABOUTME: Test support utilities.
// ABOUTME: Provides a scripted HTTP transport, an in-memory registry, and package fixtures.

use async_trait::async_trait;
use edge_deploy::http::{HttpError, HttpRequest, HttpResponse, HttpTransport, TransportError};
use edge_deploy::registry::{DeploymentRecord, PackageRegistry, RegistryError, UploadedPackage};
use edge_deploy::types::{NodeId, PackageId, PackageRef};
use flate2::read::GzDecoder;
use parking_lot::Mutex;
use serde_json::json;
use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("edge_deploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// Write `files` (relative path, contents) under `root`, creating directories.
#[allow(dead_code)]
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}

/// A minimal valid package: manifest plus entry script.
#[allow(dead_code)]
pub fn valid_package(root: &Path) {
    write_tree(
        root,
        &[
            ("edge.json", r#"{"script_path": "main.sh"}"#),
            ("main.sh", "#!/bin/sh\necho hello\n"),
        ],
    );
}

/// Names of the regular-file entries in a `.tar.gz`, in archive order.
#[allow(dead_code)]
pub fn archive_entries(path: &Path) -> Vec<String> {
    let file = fs::File::open(path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|entry| entry.unwrap())
        .filter(|entry| entry.header().entry_type().is_file())
        .map(|entry| entry.path().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Write a gzipped tar archive containing exactly `entries`.
#[allow(dead_code)]
pub fn write_archive(path: &Path, entries: &[(&str, &[u8])]) {
    let file = fs::File::create(path).unwrap();
    let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        builder.append_data(&mut header, name, *data).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Scripted {
    Status(u16, String),
    Timeout,
    ConnectionRefused,
}

#[derive(Default)]
struct ScriptState {
    script: VecDeque<Scripted>,
    requests: Vec<HttpRequest>,
}

/// Transport that replays a fixed script and records every request.
///
/// Clones share the same script, so a test can keep a handle after moving
/// one into a client.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

#[allow(dead_code)]
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Scripted::Status(status, body.into()))
    }

    pub fn timeout(self) -> Self {
        self.push(Scripted::Timeout)
    }

    pub fn connection_refused(self) -> Self {
        self.push(Scripted::ConnectionRefused)
    }

    fn push(self, step: Scripted) -> Self {
        self.state.lock().script.push_back(step);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    pub fn remaining(&self) -> usize {
        self.state.lock().script.len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        request: &HttpRequest,
        timeout: Duration,
    ) -> Result<HttpResponse, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());
        match state.script.pop_front() {
            Some(Scripted::Status(status, body)) => Ok(HttpResponse::new(status, body)),
            Some(Scripted::Timeout) => Err(TransportError::Timeout(timeout)),
            Some(Scripted::ConnectionRefused) => {
                Err(TransportError::Connect("connection refused".to_string()))
            }
            None => panic!("unexpected request: {} {}", request.method, request.url),
        }
    }
}

#[derive(Default)]
struct RegistryState {
    packages: Vec<(PackageRef, PackageId)>,
    next_id: u64,
    rejecting: HashSet<String>,
    unreachable: HashSet<String>,
    uploads: usize,
    lookups: usize,
    deployments: Vec<(PackageId, NodeId)>,
    uploaded_entries: Vec<Vec<String>>,
    uploaded_paths: Vec<PathBuf>,
    uploaded_file_names: Vec<String>,
}

/// In-memory registry that upserts packages by name and tag.
#[allow(dead_code)]
#[derive(Default)]
pub struct FakeRegistry {
    state: Mutex<RegistryState>,
}

#[allow(dead_code)]
impl FakeRegistry {
    pub fn new() -> Self {
        let registry = Self::default();
        registry.state.lock().next_id = 100;
        registry
    }

    /// Seed an already uploaded package.
    pub fn with_package(self, name: &str, tag: &str, id: u64) -> Self {
        let package = PackageRef::new(name, tag).unwrap();
        self.state
            .lock()
            .packages
            .push((package, PackageId::from_number(id)));
        self
    }

    /// Deployments to `node` are refused (non-201).
    pub fn rejecting(self, node: &str) -> Self {
        self.state.lock().rejecting.insert(node.to_string());
        self
    }

    /// Deployments to `node` fail at the transport level after retries.
    pub fn unreachable(self, node: &str) -> Self {
        self.state.lock().unreachable.insert(node.to_string());
        self
    }

    pub fn uploads(&self) -> usize {
        self.state.lock().uploads
    }

    pub fn lookups(&self) -> usize {
        self.state.lock().lookups
    }

    pub fn deployments(&self) -> Vec<(PackageId, NodeId)> {
        self.state.lock().deployments.clone()
    }

    /// Entry names of each uploaded archive, read at upload time.
    pub fn uploaded_entries(&self) -> Vec<Vec<String>> {
        self.state.lock().uploaded_entries.clone()
    }

    /// File names the archives were uploaded as.
    pub fn uploaded_file_names(&self) -> Vec<String> {
        self.state.lock().uploaded_file_names.clone()
    }

    /// Paths of the archives handed to `upload_package`.
    pub fn uploaded_paths(&self) -> Vec<PathBuf> {
        self.state.lock().uploaded_paths.clone()
    }
}

#[async_trait]
impl PackageRegistry for FakeRegistry {
    async fn upload_package(
        &self,
        archive: &Path,
        file_name: &str,
        package: &PackageRef,
    ) -> Result<UploadedPackage, RegistryError> {
        let entries = archive_entries(archive);
        let mut state = self.state.lock();
        state.uploads += 1;
        state.uploaded_file_names.push(file_name.to_string());
        state.uploaded_entries.push(entries);
        state.uploaded_paths.push(archive.to_path_buf());

        let existing = state
            .packages
            .iter()
            .find(|(p, _)| p == package)
            .map(|(_, id)| id.clone());

        let (package_id, was_updated) = match existing {
            Some(id) => (id, true),
            None => {
                state.next_id += 1;
                let id = PackageId::from_number(state.next_id);
                state.packages.push((package.clone(), id.clone()));
                (id, false)
            }
        };

        let package_url = format!("https://files.example.com/packages/{file_name}");
        Ok(UploadedPackage {
            package_id: package_id.clone(),
            package_url: package_url.clone(),
            was_updated,
            response: json!({ "id": package_id, "package_file": package_url }),
        })
    }

    async fn find_package_id(&self, package: &PackageRef) -> Result<PackageId, RegistryError> {
        let mut state = self.state.lock();
        state.lookups += 1;
        state
            .packages
            .iter()
            .find(|(p, _)| p == package)
            .map(|(_, id)| id.clone())
            .ok_or_else(|| RegistryError::PackageNotFound {
                name: package.name().to_string(),
                tag: package.tag().to_string(),
            })
    }

    async fn create_deployment(
        &self,
        package_id: &PackageId,
        node_id: &NodeId,
    ) -> Result<Option<DeploymentRecord>, RegistryError> {
        let mut state = self.state.lock();
        if state.unreachable.contains(node_id.as_str()) {
            return Err(RegistryError::Http(HttpError::RequestFailed {
                attempts: 3,
                source: TransportError::Connect("connection refused".to_string()),
            }));
        }
        if state.rejecting.contains(node_id.as_str()) {
            return Ok(None);
        }

        state.deployments.push((package_id.clone(), node_id.clone()));
        let id = 1000 + state.deployments.len() as u64;
        let record = DeploymentRecord::from_value(json!({
            "id": id,
            "node_id": node_id,
            "package_id": package_id,
            "status": "pending",
        }))
        .unwrap();
        Ok(Some(record))
    }
}
