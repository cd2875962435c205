//! Per-user directories for the log file and config.

use std::path::{Path, PathBuf};

const APP_DIR: &str = "farmdash";
const LOG_FILE: &str = "farmdash.log";

fn home_or(fallback: &str) -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from(fallback))
}

fn under(base: &Path) -> PathBuf {
    base.join(APP_DIR)
}

/// `~/.local/share/farmdash` on unix, also on macOS so logs live in one
/// predictable place.
pub fn data_dir() -> PathBuf {
    #[cfg(unix)]
    {
        under(&home_or("/tmp").join(".local").join("share"))
    }
    #[cfg(windows)]
    {
        under(&dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

/// `$XDG_CONFIG_HOME/farmdash`, else `~/.config/farmdash` on unix.
pub fn config_dir() -> PathBuf {
    #[cfg(unix)]
    {
        match std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
            Some(xdg) => under(Path::new(&xdg)),
            None => under(&home_or("/tmp").join(".config")),
        }
    }
    #[cfg(windows)]
    {
        under(&dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")))
    }
}

pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE)
}
