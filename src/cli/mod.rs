//! CLI module - command-line interface
//!
//! - `reloadbar` - defaults to the run command
//! - `reloadbar run` - attach to the host bridge and drive the toolbar action
//! - `reloadbar config` - validate and inspect configuration

pub mod config;
pub mod run;

use clap::{Parser, Subcommand};

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const CONFIG_ERROR: i32 = 2;
}

/// Version string carrying the build script's metadata.
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

/// ReloadBar - toolbar reload/stop action controller
///
/// Native companion process for a browser toolbar utility. Defaults to the
/// run command when no subcommand is given.
#[derive(Parser, Debug)]
#[command(name = "reloadbar")]
#[command(author, version, long_version = LONG_VERSION, about, long_about = None)]
pub struct Cli {
    // === Global flags ===

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit machine-readable logs (JSON) to stderr
    #[arg(long = "json-output", global = true)]
    pub json_output: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", global = true, value_parser = ["trace", "verbose", "debug", "info", "warning", "warn", "error", "critical"])]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    // === Top-level args for the default run command ===

    /// Override the icon asset root from settings
    #[arg(long = "data-root")]
    pub data_root: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Attach to the host bridge on stdin/stdout and run the event loop
    /// (default command)
    Run(run::RunArgs),

    /// Validate and inspect configuration
    Config(config::ConfigArgs),
}

impl Cli {
    /// Convert top-level args to RunArgs for the default command
    pub fn to_run_args(&self) -> run::RunArgs {
        run::RunArgs {
            data_root: self.data_root.clone(),
        }
    }
}
