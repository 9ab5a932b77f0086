//! Logging setup
//!
//! All log output goes to stderr; stdout belongs to the host bridge.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// Level resolution: explicit `--log-level`, then `--verbose` (debug),
/// then `RELOADBAR_LOG` from the environment, then info.
pub fn init(verbose: bool, json_output: bool, log_level: Option<&str>) -> anyhow::Result<()> {
    let default_directive = match log_level {
        Some(level) => format!("reloadbar={}", normalize_level(level)),
        None if verbose => "reloadbar=debug".to_string(),
        None => "reloadbar=info".to_string(),
    };

    let filter = EnvFilter::try_from_env("RELOADBAR_LOG")
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json_output {
        builder.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }

    Ok(())
}

/// Map CLI level aliases onto tracing's names.
fn normalize_level(level: &str) -> &str {
    match level {
        "verbose" => "debug",
        "warning" => "warn",
        "critical" => "error",
        other => other,
    }
}
