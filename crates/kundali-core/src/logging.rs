//! Logging configuration using tracing

use std::path::PathBuf;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::error::Result;

const LOG_FILE_NAME: &str = "kundali.log";

/// Initialize the logging subsystem
///
/// The TUI owns the terminal, so logs go to
/// `~/.local/share/astro-kundali/logs/` instead of stdout.
/// Log level is controlled by the `KUNDALI_LOG` environment variable.
///
/// ```bash
/// KUNDALI_LOG=debug kundali
/// ```
pub fn init() -> Result<()> {
    let dir = log_dir();
    std::fs::create_dir_all(&dir)?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, &dir, LOG_FILE_NAME);

    let env_filter = EnvFilter::try_from_env("KUNDALI_LOG")
        .unwrap_or_else(|_| EnvFilter::new("astro_kundali=info,kundali_core=info,warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(fmt::time::ChronoLocal::new(
                    "%Y-%m-%d %H:%M:%S%.3f".to_string(),
                )),
        )
        .init();

    tracing::info!("Astro Kundali starting, logs in {}", dir.display());

    Ok(())
}

/// Directory holding the rolling log files, shown to the user on fatal errors
pub fn log_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("astro-kundali").join("logs")
}
