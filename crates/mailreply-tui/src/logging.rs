use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "MAILREPLY_LOG";

/// Route tracing output to a log file. The terminal UI owns stderr, so nothing
/// may be written there while it is running.
pub fn init_file_logging() -> Result<PathBuf> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("mailreply");
    fs::create_dir_all(&log_dir)?;

    let log_path = log_dir.join("mailreply.log");
    let file = OpenOptions::new().create(true).append(true).open(&log_path)?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn,mailreply_core=info,mailreply_tui=info"))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {}", e))?;

    Ok(log_path)
}

/// Log to stderr, for the one-shot commands.
pub fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter("warn"))
        .with_writer(std::io::stderr)
        .try_init();
}

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directives))
}
