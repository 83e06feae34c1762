// ABOUTME: Workflow configuration built once from action inputs.
// ABOUTME: Validates every input before any step runs; immutable afterwards.

mod error;
mod step;

pub use error::ConfigError;
pub use step::{WorkflowStep, parse_workflow};

use nonempty::NonEmpty;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::http::RetryPolicy;
use crate::package::{PatternMatcher, PatternMode};
use crate::types::{NodeId, PackageRef};

pub const DEFAULT_API_PREFIX: &str = "/public/sun/open-api/v1";

/// Aggregate deploy status reported when no node succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ZeroSuccessStatus {
    #[default]
    Failed,
    Partial,
}

impl FromStr for ZeroSuccessStatus {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "failed" => Ok(Self::Failed),
            "partial" => Ok(Self::Partial),
            other => Err(ConfigError::invalid(
                "zero_success_status",
                format!("expected 'failed' or 'partial', got '{other}'"),
            )),
        }
    }
}

/// Raw, unvalidated inputs as handed over by the automation platform.
///
/// Empty and whitespace-only values count as absent.
#[derive(Clone, Default)]
pub struct RawInputs {
    pub api_token: Option<String>,
    pub base_url: Option<String>,
    pub workflow: Option<String>,
    pub package_path: Option<String>,
    pub package_name: Option<String>,
    pub package_tag: Option<String>,
    pub node_ids: Option<String>,
    pub include_patterns: Option<String>,
    pub exclude_patterns: Option<String>,
    pub max_attempts: Option<String>,
    pub request_timeout_secs: Option<String>,
    pub backoff_base_secs: Option<String>,
    pub api_prefix: Option<String>,
    pub zero_success_status: Option<String>,
}

impl fmt::Debug for RawInputs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawInputs")
            .field("api_token", &self.api_token.as_ref().map(|_| "***"))
            .field("base_url", &self.base_url)
            .field("workflow", &self.workflow)
            .field("package_path", &self.package_path)
            .field("package_name", &self.package_name)
            .field("package_tag", &self.package_tag)
            .field("node_ids", &self.node_ids)
            .field("include_patterns", &self.include_patterns)
            .field("exclude_patterns", &self.exclude_patterns)
            .finish_non_exhaustive()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number<T: FromStr>(value: &Option<String>, name: &'static str) -> Result<Option<T>, ConfigError>
where
    T::Err: fmt::Display,
{
    present(value)
        .map(|v| v.parse::<T>().map_err(|e| ConfigError::invalid(name, e)))
        .transpose()
}

/// Validated, read-only configuration for one run.
#[derive(Clone)]
pub struct WorkflowConfig {
    api_token: String,
    base_url: String,
    steps: NonEmpty<WorkflowStep>,
    package_path: Option<PathBuf>,
    package: Option<PackageRef>,
    node_ids: Option<NonEmpty<NodeId>>,
    patterns: PatternMatcher,
    retry: RetryPolicy,
    api_prefix: String,
    zero_success_status: ZeroSuccessStatus,
}

impl WorkflowConfig {
    /// Validate raw inputs.
    ///
    /// Checks run in a fixed order and the first failure is returned:
    /// token, base URL, workflow, per-step inputs, pattern exclusivity,
    /// then tunables.
    pub fn from_inputs(inputs: &RawInputs) -> Result<Self, ConfigError> {
        let api_token = present(&inputs.api_token)
            .ok_or(ConfigError::MissingInput("api_token"))?
            .to_string();
        let base_url = present(&inputs.base_url)
            .ok_or(ConfigError::MissingInput("base_url"))?
            .trim_end_matches('/')
            .to_string();
        let workflow = present(&inputs.workflow).ok_or(ConfigError::MissingInput("workflow"))?;
        let steps = parse_workflow(workflow)?;

        let package_path = present(&inputs.package_path);
        let package_name = present(&inputs.package_name);
        let package_tag = present(&inputs.package_tag);

        if steps.iter().any(WorkflowStep::needs_package_source)
            && (package_path.is_none() || package_name.is_none() || package_tag.is_none())
        {
            return Err(ConfigError::MissingPackageInputs);
        }

        let raw_node_ids = present(&inputs.node_ids);
        if steps.iter().any(|step| *step == WorkflowStep::Deploy) {
            if raw_node_ids.is_none() {
                return Err(ConfigError::MissingDeployInputs { inputs: "node_ids" });
            }
            if package_name.is_none() || package_tag.is_none() {
                return Err(ConfigError::MissingDeployInputs {
                    inputs: "package_name and package_tag",
                });
            }
        }

        let include = present(&inputs.include_patterns);
        let exclude = present(&inputs.exclude_patterns);
        let patterns = match (include, exclude) {
            (Some(_), Some(_)) => return Err(ConfigError::ConflictingPatterns),
            (Some(raw), None) => PatternMatcher::parse(PatternMode::Include, raw),
            (None, Some(raw)) => PatternMatcher::parse(PatternMode::Exclude, raw),
            (None, None) => Ok(PatternMatcher::All),
        }
        .map_err(|e| ConfigError::invalid("patterns", e))?;

        let package = match (package_name, package_tag) {
            (Some(name), Some(tag)) => {
                Some(PackageRef::new(name, tag).map_err(|e| ConfigError::invalid("package", e))?)
            }
            _ => None,
        };

        let node_ids = raw_node_ids
            .map(NodeId::parse_list)
            .transpose()
            .map_err(|e| ConfigError::invalid("node_ids", e))?;

        let retry = Self::retry_policy_from(inputs)?;

        let api_prefix = present(&inputs.api_prefix)
            .unwrap_or(DEFAULT_API_PREFIX)
            .to_string();

        let zero_success_status = present(&inputs.zero_success_status)
            .map(str::parse::<ZeroSuccessStatus>)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            api_token,
            base_url,
            steps,
            package_path: package_path.map(PathBuf::from),
            package,
            node_ids,
            patterns,
            retry,
            api_prefix,
            zero_success_status,
        })
    }

    fn retry_policy_from(inputs: &RawInputs) -> Result<RetryPolicy, ConfigError> {
        let mut policy = RetryPolicy::default();

        if let Some(attempts) = parse_number::<u32>(&inputs.max_attempts, "max_attempts")? {
            if attempts == 0 {
                return Err(ConfigError::invalid("max_attempts", "must be at least 1"));
            }
            policy.max_attempts = attempts;
        }

        if let Some(secs) = parse_number::<u64>(&inputs.request_timeout_secs, "request_timeout_secs")? {
            if secs == 0 {
                return Err(ConfigError::invalid("request_timeout_secs", "must be at least 1"));
            }
            policy.timeout = Duration::from_secs(secs);
        }

        if let Some(secs) = parse_number::<u64>(&inputs.backoff_base_secs, "backoff_base_secs")? {
            policy.backoff_base = Duration::from_secs(secs);
        }

        Ok(policy)
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn steps(&self) -> &NonEmpty<WorkflowStep> {
        &self.steps
    }

    pub fn package_path(&self) -> Option<&Path> {
        self.package_path.as_deref()
    }

    pub fn package(&self) -> Option<&PackageRef> {
        self.package.as_ref()
    }

    pub fn node_ids(&self) -> Option<&NonEmpty<NodeId>> {
        self.node_ids.as_ref()
    }

    pub fn patterns(&self) -> &PatternMatcher {
        &self.patterns
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn api_prefix(&self) -> &str {
        &self.api_prefix
    }

    pub fn zero_success_status(&self) -> ZeroSuccessStatus {
        self.zero_success_status
    }
}

impl fmt::Debug for WorkflowConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkflowConfig")
            .field("api_token", &"***")
            .field("base_url", &self.base_url)
            .field("steps", &self.steps)
            .field("package_path", &self.package_path)
            .field("package", &self.package)
            .field("node_ids", &self.node_ids)
            .field("patterns", &self.patterns.mode())
            .field("retry", &self.retry)
            .field("api_prefix", &self.api_prefix)
            .field("zero_success_status", &self.zero_success_status)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(workflow: &str) -> RawInputs {
        RawInputs {
            api_token: Some("secret-token".into()),
            base_url: Some("https://edge.example.com/".into()),
            workflow: Some(workflow.into()),
            package_path: Some("./pkg".into()),
            package_name: Some("app".into()),
            package_tag: Some("v1".into()),
            node_ids: Some("n1,n2".into()),
            ..Default::default()
        }
    }

    #[test]
    fn debug_output_redacts_token() {
        let config = WorkflowConfig::from_inputs(&inputs("upload")).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("secret-token"));

        let rendered = format!("{:?}", inputs("upload"));
        assert!(!rendered.contains("secret-token"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let config = WorkflowConfig::from_inputs(&inputs("deploy")).unwrap();
        assert_eq!(config.base_url(), "https://edge.example.com");
    }

    #[test]
    fn blank_values_count_as_missing() {
        let mut raw = inputs("upload");
        raw.api_token = Some("   ".into());
        assert_eq!(
            WorkflowConfig::from_inputs(&raw).unwrap_err(),
            ConfigError::MissingInput("api_token")
        );
    }

    #[test]
    fn zero_max_attempts_is_rejected() {
        let mut raw = inputs("upload");
        raw.max_attempts = Some("0".into());
        assert!(matches!(
            WorkflowConfig::from_inputs(&raw),
            Err(ConfigError::InvalidInput { name: "max_attempts", .. })
        ));
    }
}
