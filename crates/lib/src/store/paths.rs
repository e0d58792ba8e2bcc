//! Store root resolution.

use std::path::PathBuf;

use crate::consts::APP_NAME;

/// Returns the store root: `WASMDOCK_STORE` override, else the platform
/// data directory.
pub fn store_root() -> PathBuf {
  if let Ok(path) = std::env::var("WASMDOCK_STORE") {
    return PathBuf::from(path);
  }
  data_dir().join("store")
}

#[cfg(windows)]
fn data_dir() -> PathBuf {
  let appdata = std::env::var("APPDATA").expect("APPDATA not set");
  PathBuf::from(appdata).join(APP_NAME)
}

#[cfg(not(windows))]
fn data_dir() -> PathBuf {
  let data_home = std::env::var("XDG_DATA_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".local").join("share"));
  data_home.join(APP_NAME)
}

#[cfg(not(windows))]
fn home_dir() -> PathBuf {
  let home = std::env::var("HOME").expect("HOME not set");
  PathBuf::from(home)
}
