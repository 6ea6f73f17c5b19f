//! Opt-in file logging.
//!
//! The terminal belongs to the UI, so logs go to a file and only when
//! `NEONFX_LOG` is set. Its value is an `env_logger` filter, e.g.
//! `NEONFX_LOG=debug` or `NEONFX_LOG=neonfx_effects=debug`.

use std::{fs::File, path::PathBuf};

use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};

const LOG_ENV: &str = "NEONFX_LOG";
const LOG_FILE: &str = "neonfx.log";

/// Start logging if requested. Returns the log file path when enabled.
pub fn init() -> color_eyre::Result<Option<PathBuf>> {
    if std::env::var_os(LOG_ENV).is_none() {
        return Ok(None);
    }

    let dir = ProjectDirs::from("dev", "neonfx", "neonfx")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(std::env::temp_dir);
    std::fs::create_dir_all(&dir)?;

    let path = dir.join(LOG_FILE);
    let file = File::create(&path)?;
    Builder::from_env(Env::default().filter_or(LOG_ENV, "info"))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init()?;

    log::info!("logging to {}", path.display());
    Ok(Some(path))
}
