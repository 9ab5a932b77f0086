//! ReloadBar - native controller for a theme-aware reload/stop toolbar action
//!
//! The host browser delivers tab, theme, navigation, and menu events over a
//! newline-delimited JSON bridge on stdin/stdout; ReloadBar decides which
//! icon variant each tab shows, plays the bounded transition animations,
//! and answers clicks with reload/stop commands.

mod cli;
mod controller;
mod core;
mod host;
mod logging;
mod menus;
mod settings;

use clap::Parser;
use cli::{exit_codes, Cli, Commands};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logging::init(cli.verbose, cli.json_output, cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    // Handlers must never interleave; a current-thread runtime keeps the
    // single shared event queue the logic assumes.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to create runtime: {}", e);
            return exit_codes::UNEXPECTED_FAILURE;
        }
    };

    match cli.command {
        Some(Commands::Run(args)) => rt.block_on(async {
            match cli::run::run(args).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    exit_codes::UNEXPECTED_FAILURE
                }
            }
        }),
        Some(Commands::Config(args)) => rt.block_on(async {
            match cli::config::run(args).await {
                Ok(()) => exit_codes::SUCCESS,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    exit_codes::CONFIG_ERROR
                }
            }
        }),
        None => {
            // Default: run command with args from the top-level CLI
            let args = cli.to_run_args();
            rt.block_on(async {
                match cli::run::run(args).await {
                    Ok(()) => exit_codes::SUCCESS,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        exit_codes::UNEXPECTED_FAILURE
                    }
                }
            })
        }
    }
}
