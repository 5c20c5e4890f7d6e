use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ga_monitor_app::cli::{Cli, Command};
use ga_monitor_app::platform::app::run_monitor;
use ga_monitor_app::platform::config::{AppConfig, ConfigSource};
use ga_monitor_app::platform::logging;
use ga_monitor_engine::{Credentials, FileTokenStore, TokenStore};
use log::LevelFilter;
use monitor_logging::monitor_info;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let (config, source) = AppConfig::load(cli.config.as_deref())?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logging::initialize(cli.log.unwrap_or(config.log_destination), level);
    match &source {
        ConfigSource::File(path) => monitor_info!("Loaded config from {}", path.display()),
        ConfigSource::Defaults => monitor_info!("No config file found; using defaults"),
    }

    let tokens = Arc::new(FileTokenStore::new(config.token_file.clone()));
    match cli.command {
        Command::Run(args) => {
            let config = config.with_run_overrides(&args);
            let outcome = run_monitor(&config, &args, tokens)?;
            Ok(if outcome.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            })
        }
        Command::Login { token, username } => {
            tokens
                .store(Credentials { token, username })
                .context("failed to store token")?;
            println!("Token stored in {}", tokens.path().display());
            Ok(ExitCode::SUCCESS)
        }
        Command::Logout => {
            tokens.clear().context("failed to clear token")?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
    }
}
