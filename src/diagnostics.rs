// ABOUTME: Diagnostics accumulator for non-fatal warnings during a workflow run.
// ABOUTME: Collects problems that do not fail a step but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during workflow steps.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!("{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// A non-fatal warning collected during a run.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// The temporary package archive could not be removed.
    pub fn archive_cleanup(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ArchiveCleanup,
            message: message.into(),
        }
    }

    /// One deploy target failed while others may have succeeded.
    pub fn node_deployment(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::NodeDeployment,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Temporary archive left on disk.
    ArchiveCleanup,
    /// A single node's deployment failed.
    NodeDeployment,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostics_starts_empty() {
        let diag = Diagnostics::default();
        assert!(!diag.has_warnings());
        assert!(diag.warnings().is_empty());
    }

    #[test]
    fn diagnostics_collects_warnings() {
        let mut diag = Diagnostics::default();

        diag.warn(Warning::archive_cleanup("permission denied"));
        diag.warn(Warning::node_deployment("node-2: status 500"));

        assert!(diag.has_warnings());
        assert_eq!(diag.warnings().len(), 2);
        assert_eq!(diag.warnings()[0].kind, WarningKind::ArchiveCleanup);
        assert_eq!(diag.warnings()[1].kind, WarningKind::NodeDeployment);
    }
}
