//! Source classification and build request validation.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Classification of an input module by the compilation pipeline it needs.
///
/// Adding a new source kind means adding a variant here and an adapter
/// under `toolchain`; nothing else in the crate branches on extensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
  /// Rust, compiled with cargo and run through wasm-bindgen.
  Rust,
  /// C or C++, compiled with emscripten.
  C,
  /// Anything else; rejected before a toolchain is invoked.
  Unsupported,
}

impl SourceKind {
  /// Infer the kind from a source path's extension.
  pub fn of(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some("rs") => SourceKind::Rust,
      Some("c") | Some("cpp") => SourceKind::C,
      _ => SourceKind::Unsupported,
    }
  }
}

/// A validated request to build one source module under a logical name.
///
/// The request is transient; it lives for the duration of one `build()`
/// call and carries no state of its own.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  pub source: PathBuf,
  pub output_name: String,
}

impl BuildRequest {
  /// Create a request, rejecting output names that could escape the store.
  pub fn new(source: impl Into<PathBuf>, output_name: impl Into<String>) -> Result<Self> {
    let output_name = output_name.into();
    validate_output_name(&output_name)?;
    Ok(Self {
      source: source.into(),
      output_name,
    })
  }

  pub fn kind(&self) -> SourceKind {
    SourceKind::of(&self.source)
  }
}

/// Reject names that are empty or could resolve outside the store root.
///
/// The dot prefix is reserved for the store's staging files, so it is
/// rejected here as well.
pub fn validate_output_name(name: &str) -> Result<()> {
  let invalid = |reason| {
    Err(Error::InvalidOutputName {
      name: name.to_string(),
      reason,
    })
  };

  if name.is_empty() {
    return invalid("name is empty");
  }
  if name.contains(['/', '\\']) {
    return invalid("name contains a path separator");
  }
  if name.starts_with('.') {
    return invalid("name starts with a dot");
  }
  Ok(())
}
