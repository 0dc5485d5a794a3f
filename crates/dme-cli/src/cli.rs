//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// DME CLI - Extract Durable Medical Equipment orders from physician notes.
#[derive(Debug, Parser)]
#[command(name = "dme")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format
    Table,
    /// JSON format (default)
    Json,
}

/// Extraction strategy options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum StrategyArg {
    /// Keyword and pattern rules
    RuleBased,
    /// Schema-constrained model completion
    Model,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Extract orders from note files or directories
    Extract(ExtractArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),

    /// Print the JSON schema requested from the model
    Schema(SchemaArgs),
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// Note files, or directories of .txt/.json notes
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Extraction strategy (overrides the config file)
    #[arg(short, long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// POST each extracted record to the submission endpoint
    #[arg(long)]
    pub submit: bool,

    /// Submission endpoint (overrides the config file)
    #[arg(long, env = "DME_SUBMIT_ENDPOINT")]
    pub endpoint: Option<String>,
}

/// Arguments for configuration management.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,

    /// Write the default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Arguments for the schema command.
#[derive(Debug, Parser)]
pub struct SchemaArgs {
    /// Leave out the CPAP-only fields
    #[arg(long)]
    pub no_cpap_fields: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}

impl From<StrategyArg> for dme_extractor::Strategy {
    fn from(strategy: StrategyArg) -> Self {
        match strategy {
            StrategyArg::RuleBased => dme_extractor::Strategy::RuleBased,
            StrategyArg::Model => dme_extractor::Strategy::Model,
        }
    }
}
