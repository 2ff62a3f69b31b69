//! File logging. The terminal belongs to the TUI, so `env_logger` writes to
//! a log file instead of stderr. Level comes from `RUST_LOG` (default info).

use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs::OpenOptions;
use std::path::Path;

use env_logger::{Builder, Env, Target};

/// Append log records to `path`, creating parent directories as needed.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()
        .map_err(|e| eyre!("Failed to initialize logging: {}", e))
}
