//! DME CLI - Extract DME orders from physician notes.

use clap::Parser;
use dme_cli::cli::{ConfigAction, ConfigArgs};
use dme_cli::commands;
use dme_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to stderr so stdout stays parseable
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> dme_cli::Result<()> {
    // `config init` must work before any file exists
    let config = match &cli.command {
        Command::Config(ConfigArgs {
            action: ConfigAction::Init { .. },
        }) => Config::default(),
        _ => Config::load(cli.config.as_deref())?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Extract(args) => commands::execute_extract(args, &config, &formatter).await,
        Command::Config(args) => {
            commands::execute_config(args, &config, cli.config.as_deref(), &formatter)
        }
        Command::Schema(args) => commands::execute_schema(args),
    }
}
