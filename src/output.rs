// ABOUTME: Output formatting for CLI feedback and step outputs.
// ABOUTME: Supports normal, quiet (CI), and JSON modes plus the GITHUB_OUTPUT file.

use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Environment variable naming the file step outputs are appended to.
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

const MULTILINE_DELIMITER: &str = "EDGE_DEPLOY_EOF";

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
    github_output: Option<PathBuf>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
            github_output: None,
        }
    }

    /// Create an output that appends step outputs to the file named by
    /// `GITHUB_OUTPUT`, if set.
    pub fn from_env(mode: OutputMode) -> Self {
        Self::new(mode).with_github_output(std::env::var_os(GITHUB_OUTPUT_ENV).map(PathBuf::from))
    }

    /// Append step outputs to `path` instead of printing them.
    pub fn with_github_output(mut self, path: Option<PathBuf>) -> Self {
        self.github_output = path.filter(|p| !p.as_os_str().is_empty());
        self
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn github_output(&self) -> Option<&Path> {
        self.github_output.as_deref()
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => {
                print_json(&JsonEvent {
                    event: "success",
                    message,
                    duration_secs: self.duration(),
                });
            }
        }
    }

    /// Print a non-fatal warning.
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => eprintln!("Warning: {message}"),
            OutputMode::Json => {
                eprint_json(&JsonEvent {
                    event: "warning",
                    message,
                    duration_secs: None,
                });
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => {
                eprint_json(&JsonEvent {
                    event: "error",
                    message,
                    duration_secs: self.duration(),
                });
            }
        }
    }

    /// Publish one named output.
    ///
    /// Appends `name=value` to the output file when one is configured.
    /// Otherwise prints `::set-output name=<name>::<value>` (or a JSON
    /// event in JSON mode) to stdout.
    pub fn set_output(&self, name: &str, value: &str) -> io::Result<()> {
        match &self.github_output {
            Some(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                file.write_all(format_output_entry(name, value).as_bytes())
            }
            None => {
                match self.mode {
                    OutputMode::Json => print_json(&OutputEvent {
                        event: "output",
                        name,
                        value,
                    }),
                    OutputMode::Normal | OutputMode::Quiet => {
                        println!("::set-output name={name}::{value}");
                    }
                }
                Ok(())
            }
        }
    }
}

/// Render one entry of the output file. Multi-line values use the
/// `name<<DELIMITER` form.
pub fn format_output_entry(name: &str, value: &str) -> String {
    if value.contains('\n') {
        format!("{name}<<{MULTILINE_DELIMITER}\n{value}\n{MULTILINE_DELIMITER}\n")
    } else {
        format!("{name}={value}\n")
    }
}

fn print_json<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn eprint_json<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
}

#[derive(Serialize)]
struct OutputEvent<'a> {
    event: &'a str,
    name: &'a str,
    value: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_line_entry() {
        assert_eq!(format_output_entry("push_status", "skipped"), "push_status=skipped\n");
    }

    #[test]
    fn multi_line_entry_uses_delimiter() {
        assert_eq!(
            format_output_entry("notes", "a\nb"),
            "notes<<EDGE_DEPLOY_EOF\na\nb\nEDGE_DEPLOY_EOF\n"
        );
    }

    #[test]
    fn set_output_appends_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outputs");
        let output = Output::new(OutputMode::Quiet).with_github_output(Some(path.clone()));

        output.set_output("upload_status", "success").unwrap();
        output.set_output("upload_was_updated", "false").unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "upload_status=success\nupload_was_updated=false\n");
    }
}
