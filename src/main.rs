use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use chronotes_auth::commands::Command;
use chronotes_auth::config::{load_config, print_schema, DEFAULT_CONFIG_PATH};
use chronotes_auth::startup;
use chronotes_auth::utils::init_logging;
use clap::Parser;
use tracing::error;

#[derive(Parser, Debug)]
#[command(
    name = "chronotes",
    version,
    about = "Check, start and end your Chronotes session"
)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, short, env = "CHRONOTES_CONFIG", default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.command == Command::PrintSchema {
        return match print_schema() {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("Error printing schema: {}", e);
                ExitCode::FAILURE
            }
        };
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    match startup::run(Arc::new(config), cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
