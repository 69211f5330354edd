// Logging setup.
//
// The shell owns the terminal, so diagnostics go to a log file instead of
// stdout/stderr. Set `RUST_LOG=debug` to see every request.

use std::error::Error;
use std::fs::{self, File};
use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

/// Installs a `tracing` subscriber writing to [`log_path`].
///
/// If the file cannot be created the shell runs without logging.
pub fn init_file_logging() {
    let log_path = log_path();

    if let Some(parent) = log_path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            eprintln!("Warning: Could not create log directory: {e}");
            return;
        }
    }

    // Truncated on each run.
    let log_file = match File::create(&log_path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Could not create log file: {e}");
            return;
        }
    };

    if let Err(e) = install(log_file) {
        eprintln!("Warning: Could not install logger: {e}");
    }
}

/// Sets the global subscriber. Fails if one is already installed.
fn install(log_file: File) -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .try_init()
}

/// `~/.local/state/critter/critter.log` on Linux, the config directory
/// elsewhere, the temp directory as a last resort.
pub fn log_path() -> PathBuf {
    if let Some(state_dir) = dirs::state_dir() {
        return state_dir.join("critter").join("critter.log");
    }
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("critter").join("critter.log");
    }
    std::env::temp_dir().join("critter.log")
}
