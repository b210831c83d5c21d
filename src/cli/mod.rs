//! CLI module for bookshelf
//!
//! Provides command-line interface for:
//! - init: Create directory structure
//! - serve: Run the web front end
//! - seed: Insert sample books
//! - stats: Print author statistics

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, run, run_command, seed, serve, stats};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
