// ABOUTME: Builds the gzip-compressed tar archive uploaded to the registry.
// ABOUTME: Walks the package root and stores selected files under their relative paths.

use crate::types::PackageRef;
use flate2::Compression;
use flate2::write::GzEncoder;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tracing::{debug, info, trace};
use walkdir::WalkDir;

use super::error::PackageError;
use super::pattern::PatternMatcher;

pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// A package archive on disk.
///
/// The file lives in the system temp directory and is removed when the
/// archive is closed or dropped.
#[derive(Debug)]
pub struct PackageArchive {
    path: TempPath,
    file_name: String,
    entries: Vec<PathBuf>,
}

impl PackageArchive {
    /// Location of the archive on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Upload file name, `{name}-{tag}.tar.gz`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Relative paths of the archived files, in archive order.
    pub fn entries(&self) -> &[PathBuf] {
        &self.entries
    }

    /// Delete the archive, reporting any failure.
    pub fn close(self) -> std::io::Result<()> {
        self.path.close()
    }
}

/// Walks a package root and archives the files the matcher selects.
pub struct ArchiveBuilder<'a> {
    root: &'a Path,
    matcher: &'a PatternMatcher,
}

impl<'a> ArchiveBuilder<'a> {
    pub fn new(root: &'a Path, matcher: &'a PatternMatcher) -> Self {
        Self { root, matcher }
    }

    /// Relative paths of every regular file that would be archived.
    ///
    /// Traversal is sorted by file name so the result is deterministic.
    pub fn collect_files(&self) -> Result<Vec<PathBuf>, PackageError> {
        if !self.root.exists() {
            return Err(PackageError::PathNotFound(self.root.to_path_buf()));
        }
        if !self.root.is_dir() {
            return Err(PackageError::NotADirectory(self.root.to_path_buf()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(self.root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if !entry.path().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(self.root) else {
                continue;
            };

            if self.matcher.is_selected(relative) {
                trace!(file = %relative.display(), "selected");
                files.push(relative.to_path_buf());
            } else {
                trace!(file = %relative.display(), "skipped by pattern");
            }
        }

        Ok(files)
    }

    /// Build the archive for `package` in the system temp directory.
    pub fn build(&self, package: &PackageRef) -> Result<PackageArchive, PackageError> {
        let files = self.collect_files()?;
        let stem = package.archive_stem();

        // The TempPath guard removes the partial file if anything below fails.
        let (file, path) = tempfile::Builder::new()
            .prefix(&format!("{stem}-"))
            .suffix(ARCHIVE_EXTENSION)
            .tempfile()?
            .into_parts();

        let mut tar = tar::Builder::new(GzEncoder::new(file, Compression::default()));
        for relative in &files {
            tar.append_path_with_name(self.root.join(relative), relative)
                .map_err(|source| PackageError::AddFile {
                    path: relative.clone(),
                    source,
                })?;
        }
        tar.into_inner()?.finish()?.sync_all()?;

        debug!(archive = %path.display(), "wrote package archive");
        info!(
            "Created archive for {} with {} file(s) from {}",
            package,
            files.len(),
            self.root.display()
        );

        Ok(PackageArchive {
            path,
            file_name: format!("{stem}{ARCHIVE_EXTENSION}"),
            entries: files,
        })
    }
}
