// ABOUTME: Package archiving: file selection, archive creation, manifest validation.
// ABOUTME: Everything needed to turn a directory into an uploadable package.

mod archive;
mod error;
mod manifest;
mod pattern;

pub use archive::{ARCHIVE_EXTENSION, ArchiveBuilder, PackageArchive};
pub use error::{ManifestError, PackageError};
pub use manifest::{MANIFEST_FILE, ManifestValidator, PackageManifest};
pub use pattern::{PathPattern, PatternError, PatternMatcher, PatternMode};
