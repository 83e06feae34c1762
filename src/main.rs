// ABOUTME: Entry point for the edge-deploy CLI application.
// ABOUTME: Parses inputs, sets up logging, and runs the workflow.

mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use edge_deploy::output::Output;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise the verbose flag picks the level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::from_env(cli.output_mode());

    if let Err(e) = commands::run(cli.inputs.into(), &mut output).await {
        error!("Action failed: {e}");
        output.error(&e.to_string());
        std::process::exit(1);
    }
}
