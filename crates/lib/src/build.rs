//! The build dispatcher.
//!
//! One entry point, `build()`: classify the source, stage a scratch area,
//! drive the matching toolchain adapter, publish the resulting triplet into
//! the artifact store. Errors leave the store untouched and the scratch
//! area is removed on every exit path.

use serde::Serialize;
use tracing::info;

use crate::error::{Error, Result};
use crate::scratch::{Workdir, scratch_root};
use crate::source::{BuildRequest, SourceKind};
use crate::store::ArtifactStore;
use crate::toolchain::{self, ToolchainConfig};

/// One published artifact: its file name in the store and its size.
#[derive(Debug, Clone, Serialize)]
pub struct PublishedArtifact {
  pub file: String,
  pub size: u64,
}

/// The published triplet for one build.
#[derive(Debug, Clone, Serialize)]
pub struct BuildResult {
  pub name: String,
  pub binary: PublishedArtifact,
  pub loader: PublishedArtifact,
  pub wrapper: PublishedArtifact,
}

impl BuildResult {
  pub fn artifacts(&self) -> [&PublishedArtifact; 3] {
    [&self.binary, &self.loader, &self.wrapper]
  }
}

/// Build one source module and publish its artifacts under the request's
/// output name.
///
/// Builds sharing an output name must be serialized by the caller; the
/// store's last writer wins. Builds of distinct names may run concurrently,
/// each in its own scratch area and under its own store keys.
pub async fn build(request: &BuildRequest, toolchain: &ToolchainConfig, store: &ArtifactStore) -> Result<BuildResult> {
  let kind = request.kind();
  if kind == SourceKind::Unsupported {
    return Err(Error::UnsupportedSource {
      path: request.source.clone(),
    });
  }

  info!(
    source = %request.source.display(),
    name = %request.output_name,
    kind = ?kind,
    "starting build"
  );

  let workdir = Workdir::create(&scratch_root(), &request.output_name)?;

  let outputs = match kind {
    SourceKind::Rust => {
      toolchain::rust::compile(toolchain, &request.source, &request.output_name, workdir.path()).await?
    }
    SourceKind::C => {
      toolchain::emscripten::compile(toolchain, &request.source, &request.output_name, workdir.path()).await?
    }
    SourceKind::Unsupported => {
      return Err(Error::UnsupportedSource {
        path: request.source.clone(),
      });
    }
  };

  let result = store.publish(&request.output_name, &outputs)?;
  info!(name = %result.name, "build complete");
  Ok(result)
}
