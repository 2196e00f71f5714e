//! CLI module for luckydraw
//!
//! Provides command-line interface for:
//! - serve: Boot and serve the HTTP API
//! - run: Boot and answer JSON requests from stdin
//! - draw: One-shot draw from a candidate file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{draw_once, run, run_command, run_requests, serve, Config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_lines, read_requests, write_error, write_json, write_response};
