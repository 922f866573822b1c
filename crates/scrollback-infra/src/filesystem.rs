//! Data directory layout for Scrollback.

use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SCROLLBACK_DATA_DIR";

/// Resolve the Scrollback data directory.
///
/// Priority: `$SCROLLBACK_DATA_DIR`, then `~/.scrollback`, then
/// `./.scrollback` when no home directory is known.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }

    if let Some(home) = dirs::home_dir() {
        return home.join(".scrollback");
    }

    PathBuf::from(".scrollback")
}
