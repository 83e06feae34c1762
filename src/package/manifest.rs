// ABOUTME: Validates the edge.json manifest inside a package archive.
// ABOUTME: Reads entries in memory only; nothing is extracted to disk.

use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use super::error::ManifestError;

pub const MANIFEST_FILE: &str = "edge.json";

/// Parsed root-level `edge.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct PackageManifest {
    script_path: String,
    raw: Map<String, Value>,
}

impl PackageManifest {
    pub fn parse(bytes: &[u8]) -> Result<Self, ManifestError> {
        let value: Value = serde_json::from_slice(bytes).map_err(ManifestError::InvalidSyntax)?;
        let Value::Object(raw) = value else {
            return Err(ManifestError::NotAnObject);
        };

        let script_path = match raw.get("script_path") {
            None => return Err(ManifestError::MissingScriptPath),
            Some(Value::Null) => return Err(ManifestError::EmptyScriptPath),
            Some(Value::String(s)) if s.is_empty() => return Err(ManifestError::EmptyScriptPath),
            Some(Value::String(s)) => s.clone(),
            Some(_) => return Err(ManifestError::ScriptPathNotString),
        };

        Ok(Self { script_path, raw })
    }

    /// Archive path of the package entry script.
    pub fn script_path(&self) -> &str {
        &self.script_path
    }

    /// All manifest fields, including ones this tool does not interpret.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }
}

/// Checks that a package archive carries a usable manifest.
pub struct ManifestValidator;

impl ManifestValidator {
    /// Validate a `.tar.gz` package archive on disk.
    pub fn validate(archive: &Path) -> Result<PackageManifest, ManifestError> {
        let file = File::open(archive)?;
        Self::validate_reader(GzDecoder::new(BufReader::new(file)))
    }

    /// Validate an uncompressed tar stream.
    ///
    /// The manifest must be a root-level `edge.json` (or `./edge.json`) and
    /// its `script_path` must name another entry of the same archive.
    pub fn validate_reader<R: Read>(reader: R) -> Result<PackageManifest, ManifestError> {
        let mut archive = tar::Archive::new(reader);
        let mut manifest_bytes: Option<Vec<u8>> = None;
        let mut names = HashSet::new();

        for entry in archive.entries()? {
            let mut entry = entry?;
            let name = normalize_entry_name(&entry.path()?.to_string_lossy()).to_string();
            let entry_type = entry.header().entry_type();

            if entry_type.is_dir() {
                continue;
            }

            if manifest_bytes.is_none() && name == MANIFEST_FILE {
                let mut bytes = Vec::new();
                entry.read_to_end(&mut bytes)?;
                manifest_bytes = Some(bytes);
            }

            names.insert(name);
        }

        let bytes = manifest_bytes.ok_or(ManifestError::NotFound)?;
        let manifest = PackageManifest::parse(&bytes)?;

        if !names.contains(normalize_entry_name(manifest.script_path())) {
            return Err(ManifestError::ScriptNotFound(
                manifest.script_path().to_string(),
            ));
        }

        Ok(manifest)
    }
}

/// Strip any leading `./` so `./run.sh` and `run.sh` name the same entry.
fn normalize_entry_name(name: &str) -> &str {
    let mut name = name;
    while let Some(rest) = name.strip_prefix("./") {
        name = rest;
    }
    name
}
