use std::fs::OpenOptions;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

pub const LOG_ENV: &str = "FUELOG_LOG";

/// Send `tracing` output to `<data_dir>/fuelog.log`. The terminal belongs to
/// the TUI, so nothing is written to stdout or stderr. If the file cannot be
/// opened logging stays disabled.
pub fn init(settings: &Settings) {
    let path = settings.log_path();
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(f) => f,
        Err(_) => return,
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}
