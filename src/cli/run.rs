//! Run command implementation
//!
//! Attaches to the host bridge on stdin/stdout and drives the toolbar
//! action until the host closes the stream.

use clap::Parser;

use crate::controller::Controller;
use crate::host::bridge::HostBridge;
use crate::settings::Settings;

/// Arguments for the run command
#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// Override the icon asset root from settings
    #[arg(long = "data-root")]
    pub data_root: Option<String>,
}

/// Run the event loop against the stdio bridge
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut settings = Settings::load();
    if let Some(root) = args.data_root {
        settings.data_root = root;
    }

    tracing::info!(data_root = %settings.data_root, "attaching to host bridge");
    let (bridge, events) = HostBridge::stdio();
    Controller::new(bridge, settings, events).run().await
}
