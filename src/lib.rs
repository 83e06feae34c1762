// ABOUTME: Library root for edge-deploy - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod http;
pub mod output;
pub mod package;
pub mod registry;
pub mod types;
pub mod workflow;
