//! CLI module for cms-timeline
//!
//! Provides command-line interface for:
//! - replay: offline reconstruction from a saved timeline
//! - timeline: fetch and reconstruct a resource
//! - diff: backend-compatible diff of two documents
//! - request: one request log with its actions
//! - stats: request activity charts

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{diff, parse_records, replay, run, run_command, step_view};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_error, write_response};
