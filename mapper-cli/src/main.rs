mod cli;
mod commands;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use inquire::InquireError;
use log::debug;

use uuid_mapper_core::{determine_mappings_path, get_settings_path, Settings, UuidMapper};

use crate::cli::{Cli, Command};
use crate::commands::{execute, report_error, Request};
use crate::prompts::{prompt_menu_action, prompt_request};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load_default().context("Failed to load settings")?;
    init_logging(cli.verbose, &settings);
    if !settings.color {
        colored::control::set_override(false);
    }
    debug!("Settings file: {:?}", get_settings_path());

    // Determine which mappings file to use
    let mappings_path = determine_mappings_path(cli.file.as_deref(), &settings);
    let mut mapper = UuidMapper::open(&mappings_path)
        .with_context(|| format!("Failed to open mappings file {:?}", mappings_path))?;

    match cli.command.and_then(Request::from_command) {
        Some(request) => run_once(&mut mapper, request),
        None => run_shell(&mut mapper),
    }
}

/// Initializes env_logger; RUST_LOG takes precedence over the defaults
fn init_logging(verbose: bool, settings: &Settings) {
    let default_filter = if verbose {
        "debug".to_string()
    } else {
        settings
            .log_level
            .clone()
            .unwrap_or_else(|| "warn".to_string())
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

/// Runs a single subcommand; a miss exits with status 1
fn run_once(mapper: &mut UuidMapper, request: Request) -> Result<()> {
    match execute(mapper, request) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found_kind().is_some() => {
            report_error(&e);
            std::process::exit(1);
        }
        Err(e) => Err(e.into()),
    }
}

/// Interactive menu loop, runs until the user exits
fn run_shell(mapper: &mut UuidMapper) -> Result<()> {
    println!("Using mappings file {}", mapper.path().display());

    loop {
        println!("\n{}", "--- UUID Mapper ---".bold());

        let action = match prompt_menu_action() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled) | Err(InquireError::OperationInterrupted) => {
                break;
            }
            Err(e) => return Err(e).context("Failed to read menu selection"),
        };

        let request = match prompt_request(action) {
            Ok(Some(request)) => request,
            Ok(None) => break,
            // Esc abandons the current operation only
            Err(InquireError::OperationCanceled) => continue,
            Err(InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        // Failures are reported and the loop carries on
        if let Err(e) = execute(mapper, request) {
            report_error(&e);
        }
    }

    println!("Exiting...");
    Ok(())
}
