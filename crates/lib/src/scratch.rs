//! Scratch working areas for in-flight builds.
//!
//! Every build gets its own uniquely named directory under the scratch
//! root, removed on drop regardless of how the build ends. Builds of
//! distinct output names therefore never share files; a rebuild under the
//! same name gets a fresh area too and only meets the previous build at
//! the store, where the last writer wins.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;

use crate::consts::APP_NAME;
use crate::error::Result;

/// Scratch root: `WASMDOCK_SCRATCH` override, else the system temp dir.
pub fn scratch_root() -> PathBuf {
  if let Ok(path) = std::env::var("WASMDOCK_SCRATCH") {
    return PathBuf::from(path);
  }
  std::env::temp_dir().join(APP_NAME)
}

/// A working area for one build.
pub struct Workdir {
  dir: TempDir,
}

impl Workdir {
  /// Create a working area named after the build's output name.
  pub fn create(root: &Path, output_name: &str) -> Result<Self> {
    std::fs::create_dir_all(root)?;
    let dir = tempfile::Builder::new()
      .prefix(&format!("{output_name}-"))
      .tempdir_in(root)?;
    debug!(path = %dir.path().display(), "created scratch area");
    Ok(Self { dir })
  }

  pub fn path(&self) -> &Path {
    self.dir.path()
  }
}
