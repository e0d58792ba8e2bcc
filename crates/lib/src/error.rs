//! Error types for wasmdock.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building or serving artifacts.
#[derive(Debug, Error)]
pub enum Error {
  /// The source file's extension maps to no known toolchain pipeline.
  /// Raised before any external process is spawned.
  #[error("unsupported source file (expected .rs, .c or .cpp): {path}")]
  UnsupportedSource { path: PathBuf },

  /// The requested output name would escape the artifact store.
  #[error("invalid output name {name:?}: {reason}")]
  InvalidOutputName { name: String, reason: &'static str },

  /// An external toolchain invocation exited abnormally.
  #[error("{tool} failed with exit code {code:?}:\n{stderr}")]
  Toolchain {
    tool: String,
    code: Option<i32>,
    stderr: String,
  },

  /// A toolchain exited successfully but an expected output file is missing.
  #[error("{tool} did not produce {path}")]
  MissingToolOutput { tool: String, path: PathBuf },

  /// Publishing an artifact into the store failed. The store keeps its
  /// prior contents for that name.
  #[error("failed to publish {file} to the store: {source}")]
  StoreWrite {
    file: String,
    #[source]
    source: io::Error,
  },

  /// The requested artifact is not in the store.
  #[error("artifact not found: {file}")]
  ArtifactNotFound { file: String },

  /// I/O error outside the publish path.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
