// tabswitch platform paths for Windows
// Config and data: %APPDATA%/tabswitch

use std::env;
use std::path::PathBuf;

fn appdata_dir() -> PathBuf {
    let appdata = env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Temp"));
    PathBuf::from(appdata).join("tabswitch")
}

/// Returns the configuration directory for tabswitch on Windows.
pub fn get_config_dir() -> PathBuf {
    appdata_dir()
}

/// Returns the data directory for tabswitch on Windows.
pub fn get_data_dir() -> PathBuf {
    appdata_dir()
}
