use clap::Parser;
use std::process::ExitCode;

mod cli;
mod commands;
mod domain;
mod services;

use cli::{Cli, Commands};
use commands::{handle_list, handle_run};
use services::config::{load_config_file, ConfigFile};

fn main() -> ExitCode {
    let cli = Cli::parse();
    services::logging::init(cli.verbose);

    match dispatch(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn dispatch(cli: &Cli) -> anyhow::Result<bool> {
    let config = match &cli.config {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };

    match &cli.command {
        Commands::Run {
            selection,
            evaluator,
            utils,
            fail_fast,
        } => handle_run(
            cli.json,
            selection,
            evaluator.clone(),
            utils.clone(),
            *fail_fast,
            &config.runner,
        ),
        Commands::List { selection } => handle_list(cli.json, selection, &config.runner),
    }
}
