//! DME CLI library.
//!
//! Configuration loading, note discovery, output formatting and record
//! submission for the `dme` command-line tool.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod source;
pub mod submit;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use submit::Submitter;
