// tabswitch platform paths for Linux
// Config: ~/.config/tabswitch
// Data:   ~/.local/share/tabswitch

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for tabswitch on Linux.
/// Uses `$XDG_CONFIG_HOME/tabswitch` if set, otherwise `~/.config/tabswitch`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("tabswitch")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("tabswitch")
    }
}

/// Returns the data directory for tabswitch on Linux.
/// Uses `$XDG_DATA_HOME/tabswitch` if set, otherwise `~/.local/share/tabswitch`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("tabswitch")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("tabswitch")
    }
}
