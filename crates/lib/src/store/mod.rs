//! The artifact store: a flat directory of published build outputs.
//!
//! # Layout
//!
//! ```text
//! <store_root>/
//! ├── <name>.wasm   # compiled module body
//! ├── <name>.js     # loader
//! └── <name>.ts     # typed wrapper
//! ```
//!
//! There is no manifest; the directory listing is the index. Writes stage
//! to a dot-prefixed `.<file>.tmp` sibling and promote with a rename on the
//! same filesystem, so a concurrent reader observes either the complete old
//! bytes or the complete new bytes, never a partial write. The build
//! dispatcher is the only writer; the server only reads.

pub mod paths;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::build::{BuildResult, PublishedArtifact};
use crate::consts::{BINARY_EXT, LOADER_EXT, WRAPPER_EXT};
use crate::error::{Error, Result};
use crate::source::validate_output_name;
use crate::toolchain::BuildOutputs;

/// Handle on the artifact store rooted at one directory.
///
/// Cloning is cheap; the server keeps a clone as router state.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
  root: PathBuf,
}

impl ArtifactStore {
  /// Open the store at `root`, creating the directory if needed.
  pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
    let root = root.into();
    fs::create_dir_all(&root)?;
    Ok(Self { root })
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Write one artifact, staging then promoting atomically.
  pub fn put(&self, name: &str, ext: &str, bytes: &[u8]) -> Result<u64> {
    validate_output_name(name)?;
    let file = artifact_file(name, ext);
    let staged = self.stage(&file, bytes)?;
    self.promote(&staged, &file)?;
    debug!(file = %file, size = bytes.len(), "wrote artifact");
    Ok(bytes.len() as u64)
  }

  /// Read one artifact's bytes.
  pub fn get(&self, name: &str, ext: &str) -> Result<Vec<u8>> {
    self.read(&artifact_file(name, ext))
  }

  /// Read an artifact by its full file name, as requested over HTTP.
  ///
  /// The file name gets the same screening as output names, so a request
  /// can never read outside the store root or observe a staging file.
  pub fn read(&self, file: &str) -> Result<Vec<u8>> {
    validate_output_name(file).map_err(|_| Error::ArtifactNotFound { file: file.to_string() })?;
    match fs::read(self.root.join(file)) {
      Ok(bytes) => Ok(bytes),
      Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::ArtifactNotFound { file: file.to_string() }),
      Err(e) => Err(e.into()),
    }
  }

  /// Names of all published modules (entries with the binary extension).
  ///
  /// Loaders and wrappers stay reachable by direct request but are not
  /// advertised.
  pub fn list_modules(&self) -> Result<Vec<String>> {
    let suffix = format!(".{BINARY_EXT}");
    let mut names = Vec::new();
    for entry in fs::read_dir(&self.root)? {
      let entry = entry?;
      if !entry.file_type()?.is_file() {
        continue;
      }
      let file_name = entry.file_name();
      let Some(file) = file_name.to_str() else { continue };
      if file.starts_with('.') {
        continue; // staging files
      }
      if let Some(stem) = file.strip_suffix(&suffix) {
        names.push(stem.to_string());
      }
    }
    names.sort();
    Ok(names)
  }

  /// Publish a build's triplet under one name.
  ///
  /// All three artifacts are staged before any is promoted: a failure while
  /// staging leaves the store exactly as it was. A rebuild under an existing
  /// name overwrites its previous artifact set.
  pub fn publish(&self, name: &str, outputs: &BuildOutputs) -> Result<BuildResult> {
    validate_output_name(name)?;

    let binary = fs::read(&outputs.binary)?;
    let loader = fs::read(&outputs.loader)?;
    let wrapper = fs::read(&outputs.wrapper)?;

    let binary_file = artifact_file(name, BINARY_EXT);
    let loader_file = artifact_file(name, LOADER_EXT);
    let wrapper_file = artifact_file(name, WRAPPER_EXT);

    let staged_binary = self.stage(&binary_file, &binary)?;
    let staged_loader = match self.stage(&loader_file, &loader) {
      Ok(path) => path,
      Err(e) => {
        let _ = fs::remove_file(&staged_binary);
        return Err(e);
      }
    };
    let staged_wrapper = match self.stage(&wrapper_file, &wrapper) {
      Ok(path) => path,
      Err(e) => {
        let _ = fs::remove_file(&staged_binary);
        let _ = fs::remove_file(&staged_loader);
        return Err(e);
      }
    };

    self.promote(&staged_binary, &binary_file)?;
    self.promote(&staged_loader, &loader_file)?;
    self.promote(&staged_wrapper, &wrapper_file)?;

    info!(name = %name, "published artifact set");
    Ok(BuildResult {
      name: name.to_string(),
      binary: PublishedArtifact {
        file: binary_file,
        size: binary.len() as u64,
      },
      loader: PublishedArtifact {
        file: loader_file,
        size: loader.len() as u64,
      },
      wrapper: PublishedArtifact {
        file: wrapper_file,
        size: wrapper.len() as u64,
      },
    })
  }

  fn stage(&self, file: &str, bytes: &[u8]) -> Result<PathBuf> {
    let staged = self.root.join(format!(".{file}.tmp"));
    fs::write(&staged, bytes).map_err(|e| Error::StoreWrite {
      file: file.to_string(),
      source: e,
    })?;
    Ok(staged)
  }

  fn promote(&self, staged: &Path, file: &str) -> Result<()> {
    fs::rename(staged, self.root.join(file)).map_err(|e| {
      let _ = fs::remove_file(staged);
      Error::StoreWrite {
        file: file.to_string(),
        source: e,
      }
    })
  }
}

fn artifact_file(name: &str, ext: &str) -> String {
  if ext.is_empty() {
    name.to_string()
  } else {
    format!("{name}.{ext}")
  }
}
