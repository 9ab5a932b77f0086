//! Config command implementation
//!
//! Utilities for validating and inspecting configuration.

use clap::{Parser, Subcommand};

use crate::settings::Settings;

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Validate the settings file
    Validate,
    /// Dump the effective settings to stdout
    Dump {
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show the settings file path
    Path,
    /// Add a theme id to the dark allow-list
    AddDarkTheme {
        /// Theme id (e.g. my-theme@example.com)
        id: String,
    },
    /// Remove a theme id from the dark allow-list
    RemoveDarkTheme {
        /// Theme id
        id: String,
    },
}

/// Run the config command
pub async fn run(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Validate => validate_config(),
        ConfigCommand::Dump { pretty } => dump_config(pretty),
        ConfigCommand::Path => show_path(),
        ConfigCommand::AddDarkTheme { id } => add_dark_theme(&id),
        ConfigCommand::RemoveDarkTheme { id } => remove_dark_theme(&id),
    }
}

/// Validate the settings file
fn validate_config() -> anyhow::Result<()> {
    print!("Checking settings.json... ");
    let Some(path) = Settings::settings_path() else {
        println!("ERROR");
        anyhow::bail!("could not determine config path");
    };

    if !path.exists() {
        println!("NOT FOUND (using defaults)");
        return Ok(());
    }

    let content = std::fs::read_to_string(&path).map_err(|e| {
        println!("ERROR");
        anyhow::anyhow!("could not read {}: {}", path.display(), e)
    })?;

    match serde_json::from_str::<Settings>(&content) {
        Ok(_) => {
            println!("OK");
            Ok(())
        }
        Err(e) => {
            println!("INVALID");
            anyhow::bail!("{}: {}", path.display(), e)
        }
    }
}

/// Dump the effective settings (file values merged over defaults)
fn dump_config(pretty: bool) -> anyhow::Result<()> {
    let settings = Settings::load();
    let json = if pretty {
        serde_json::to_string_pretty(&settings)?
    } else {
        serde_json::to_string(&settings)?
    };
    println!("{}", json);
    Ok(())
}

/// Show the settings file path
fn show_path() -> anyhow::Result<()> {
    match Settings::settings_path() {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => anyhow::bail!("could not determine config path"),
    }
}

/// Add a theme id to the dark allow-list and persist
fn add_dark_theme(id: &str) -> anyhow::Result<()> {
    let mut settings = Settings::load();
    if settings.add_dark_theme(id) {
        settings.save()?;
        println!("Added {} to the dark theme list", id);
    } else {
        println!("{} is already on the dark theme list", id);
    }
    Ok(())
}

/// Remove a theme id from the dark allow-list and persist
fn remove_dark_theme(id: &str) -> anyhow::Result<()> {
    let mut settings = Settings::load();
    if settings.remove_dark_theme(id) {
        settings.save()?;
        println!("Removed {} from the dark theme list", id);
    } else {
        println!("{} is not on the dark theme list", id);
    }
    Ok(())
}
