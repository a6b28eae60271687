//! Logging setup using `tracing` + `tracing-subscriber`.
//!
//! The filter comes from the `BACKUP_LOG` environment variable (standard
//! `EnvFilter` syntax, e.g. `debug` or `backup_triggers=trace`) and defaults
//! to `info`.
//!
//! Log lines go to stderr so stdout stays free for the stage view.  During
//! `perform` the same events are also appended, without colour codes, to
//! `<log_root>/backup.log`.

use std::{fs::OpenOptions, path::Path, sync::Mutex};

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "BACKUP_LOG";

/// Name of the log file created under the log root.
pub const LOG_FILE: &str = "backup.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialise the global subscriber.  Call once at startup.
///
/// With `log_root` set, events are additionally appended to
/// `log_root/backup.log`; the directory must already exist.
pub fn init_logging(log_root: Option<&Path>) -> Result<()> {
    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_root {
        Some(dir) => {
            let path = dir.join(LOG_FILE);
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
        },
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter())
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
        .context("initialising logging")?;

    Ok(())
}
