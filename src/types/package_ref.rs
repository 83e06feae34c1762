// ABOUTME: Package name and tag pair identifying a package in the registry.
// ABOUTME: The registry upserts packages keyed by this pair.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PackageRefError {
    #[error("package name cannot be empty")]
    EmptyName,

    #[error("package tag cannot be empty")]
    EmptyTag,
}

/// A `name:tag` reference to a package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageRef {
    name: String,
    tag: String,
}

impl PackageRef {
    pub fn new(name: &str, tag: &str) -> Result<Self, PackageRefError> {
        let name = name.trim();
        let tag = tag.trim();

        if name.is_empty() {
            return Err(PackageRefError::EmptyName);
        }
        if tag.is_empty() {
            return Err(PackageRefError::EmptyTag);
        }

        Ok(Self {
            name: name.to_string(),
            tag: tag.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// File stem used for the uploaded archive: `{name}-{tag}`.
    ///
    /// Path separators and control characters become `_` so the stem is
    /// always a single file name component, e.g. `app-release_1.0` for tag
    /// `release/1.0`. Name and tag themselves are sent unchanged.
    pub fn archive_stem(&self) -> String {
        format!("{}-{}", self.name, self.tag)
            .chars()
            .map(|c| {
                if c == '/' || c == '\\' || c.is_control() {
                    '_'
                } else {
                    c
                }
            })
            .collect()
    }
}

impl fmt::Display for PackageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.tag)
    }
}
