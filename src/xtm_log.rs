// Logging bootstrap
// The TUI owns the terminal, so records go to a file instead of stderr

use chrono::Local;
use directories::ProjectDirs;
use env_logger::{Builder, Env, Target};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;

use crate::xtm_config::APP_NAME;

/// Environment variable holding the log filter (env_logger syntax)
pub const LOG_ENV: &str = "XTMINES_LOG";

/// Log file under the platform's local data directory
pub fn log_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "xhbl", APP_NAME)
        .map(|proj| proj.data_local_dir().join(format!("{}.log", APP_NAME)))
}

/// Install the global logger; returns the file it appends to.
/// Leaves logging disabled when no data directory can be resolved.
pub fn init() -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    let Some(path) = log_path() else {
        return Ok(None);
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::from_env(Env::new().filter_or(LOG_ENV, "info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(Some(path))
}
