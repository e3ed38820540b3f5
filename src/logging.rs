use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const LOG_FILE_NAME: &str = ".gitdeck.log";

/// `~/.gitdeck.log`, or the current directory when there is no home
pub fn default_log_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(LOG_FILE_NAME)
}

/// Send tracing output to an append-mode log file. The terminal belongs to
/// the TUI, so nothing is ever written to stdout or stderr.
pub fn init_tracing(path: &Path) -> Result<()> {
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(log_file))
        .try_init()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    tracing::info!("gitdeck session started");
    Ok(())
}
