use std::process::ExitCode;

use backupctl::{
    cmd::{self, Cli},
    config::{self, Config},
};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // Initialize logging on stderr so it never mixes with listed output
    let level = cli.global.log_level.as_deref().unwrap_or(&config.logging.level);
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match config::env_filter(level) {
            Ok(filter) => filter,
            Err(err) => {
                eprintln!("error: {}", err);
                return ExitCode::FAILURE;
            }
        },
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    debug!("Args: {:?}", cli);
    debug!("Loaded configuration: {:?}", config);

    match cmd::run(&cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}
