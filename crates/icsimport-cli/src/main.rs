//! icsimport CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use icsimport_core::{TracingConfig, init_tracing};
use icsimport_engine::RunMode;
use icsimport_store::JsonFileStore;

use icsimport_cli::cli::{CalendarAction, Cli, Command, ConfigAction};
use icsimport_cli::commands;
use icsimport_cli::config::AppConfig;
use icsimport_cli::error::CliResult;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let tracing_config = if cli.verbose {
        TracingConfig::verbose()
    } else {
        TracingConfig::default()
    }
    .with_format(cli.log_format.into());

    if let Err(e) = init_tracing(tracing_config) {
        eprintln!("warning: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> CliResult<()> {
    let (config, config_path) = match cli.config {
        Some(ref path) => (AppConfig::load_from(path)?, path.clone()),
        None => (AppConfig::load()?, AppConfig::default_path()),
    };
    let store_path = config.store_path(cli.store.as_deref());

    match cli.command {
        Command::Import(args) => {
            let mut store = JsonFileStore::open(&store_path)?;
            commands::import::run(&args, &config.import, &mut store, RunMode::Insert)?;
            Ok(())
        }
        Command::Delete(args) => {
            let mut store = JsonFileStore::open(&store_path)?;
            commands::import::run(&args, &config.import, &mut store, RunMode::Delete)?;
            Ok(())
        }
        Command::Calendars { action } => {
            let mut store = JsonFileStore::open(&store_path)?;
            match action.unwrap_or(CalendarAction::List) {
                CalendarAction::List => commands::calendars::list(&store),
                CalendarAction::Add { id, name } => commands::calendars::add(&mut store, id, name),
            }
        }
        Command::Config { action } => match action {
            ConfigAction::Dump => commands::config::dump(&config, &config_path),
            ConfigAction::Path => commands::config::path(&config_path, &store_path),
        },
    }
}
