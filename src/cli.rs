// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Every input is also read from its INPUT_* action environment variable.

use clap::{Args, Parser};
use edge_deploy::config::RawInputs;
use edge_deploy::output::OutputMode;

#[derive(Parser)]
#[command(name = "edge-deploy")]
#[command(about = "Package, upload, and deploy Edge Platform packages")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub inputs: InputArgs,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn output_mode(&self) -> OutputMode {
        if self.json {
            OutputMode::Json
        } else if self.quiet {
            OutputMode::Quiet
        } else {
            OutputMode::Normal
        }
    }
}

#[derive(Args)]
pub struct InputArgs {
    /// Bearer token for the Edge Platform API
    #[arg(long, env = "INPUT_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Base URL of the Edge Platform API
    #[arg(long, env = "INPUT_BASE_URL")]
    pub base_url: Option<String>,

    /// Comma-separated steps to run, in order: push, upload, deploy
    #[arg(long, env = "INPUT_WORKFLOW")]
    pub workflow: Option<String>,

    /// Directory to package
    #[arg(long, env = "INPUT_PACKAGE_PATH")]
    pub package_path: Option<String>,

    #[arg(long, env = "INPUT_PACKAGE_NAME")]
    pub package_name: Option<String>,

    #[arg(long, env = "INPUT_PACKAGE_TAG")]
    pub package_tag: Option<String>,

    /// Comma-separated node IDs to deploy to
    #[arg(long, env = "INPUT_NODE_IDS")]
    pub node_ids: Option<String>,

    /// Comma-separated glob patterns of files to package
    #[arg(long, env = "INPUT_INCLUDE_PATTERNS")]
    pub include_patterns: Option<String>,

    /// Comma-separated glob patterns of files or directories to leave out
    #[arg(long, env = "INPUT_EXCLUDE_PATTERNS")]
    pub exclude_patterns: Option<String>,

    /// Attempts per HTTP request, including the first [default: 3]
    #[arg(long, env = "INPUT_MAX_ATTEMPTS")]
    pub max_attempts: Option<String>,

    /// Per-attempt HTTP timeout in seconds [default: 30]
    #[arg(long, env = "INPUT_REQUEST_TIMEOUT_SECS")]
    pub request_timeout_secs: Option<String>,

    /// First retry delay in seconds, doubled per attempt [default: 1]
    #[arg(long, env = "INPUT_BACKOFF_BASE_SECS")]
    pub backoff_base_secs: Option<String>,

    /// API path prefix [default: /public/sun/open-api/v1]
    #[arg(long, env = "INPUT_API_PREFIX")]
    pub api_prefix: Option<String>,

    /// Deploy status when no node succeeds: failed or partial [default: failed]
    #[arg(long, env = "INPUT_ZERO_SUCCESS_STATUS")]
    pub zero_success_status: Option<String>,
}

impl From<InputArgs> for RawInputs {
    fn from(args: InputArgs) -> Self {
        RawInputs {
            api_token: args.api_token,
            base_url: args.base_url,
            workflow: args.workflow,
            package_path: args.package_path,
            package_name: args.package_name,
            package_tag: args.package_tag,
            node_ids: args.node_ids,
            include_patterns: args.include_patterns,
            exclude_patterns: args.exclude_patterns,
            max_attempts: args.max_attempts,
            request_timeout_secs: args.request_timeout_secs,
            backoff_base_secs: args.backoff_base_secs,
            api_prefix: args.api_prefix,
            zero_success_status: args.zero_success_status,
        }
    }
}
