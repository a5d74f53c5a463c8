use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

pub const LOG_FILE: &str = "clipdeck.log";
pub const LOG_ENV: &str = "CLIPDECK_LOG";

/// Send `tracing` output to `<data_dir>/clipdeck.log`; the terminal belongs
/// to the UI. Filter comes from `CLIPDECK_LOG`, default `info`.
///
/// Failing to set up logging is not fatal: the app runs without a log.
pub fn init(data_dir: &Path) {
    if fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))
    else {
        return;
    };

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(true)
        .try_init();
}
