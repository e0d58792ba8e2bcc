//! Toolchain adapters.
//!
//! One adapter per source kind, each wrapping one external compiler
//! pipeline behind the same contract: given a source file, a logical name
//! and a scratch directory, leave the artifact triplet on disk. Adapters
//! know nothing about each other or about the store; the dispatcher in
//! `build` owns selection and publication.

pub mod emscripten;
pub mod rust;

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Locations of the external toolchain binaries.
///
/// Resolved once and passed into every adapter invocation, so a build's
/// behavior does not depend on ambient process environment at call sites.
#[derive(Debug, Clone)]
pub struct ToolchainConfig {
  /// `cargo`, used by the Rust adapter.
  pub cargo: PathBuf,
  /// `wasm-bindgen`, the Rust adapter's binding generator.
  pub wasm_bindgen: PathBuf,
  /// `emcc`, the emscripten compiler driver.
  pub emcc: PathBuf,
}

impl ToolchainConfig {
  /// Resolve tool locations from `WASMDOCK_CARGO`, `WASMDOCK_WASM_BINDGEN`
  /// and `WASMDOCK_EMCC`, defaulting to PATH lookup.
  pub fn from_env() -> Self {
    Self {
      cargo: env_tool("WASMDOCK_CARGO", "cargo"),
      wasm_bindgen: env_tool("WASMDOCK_WASM_BINDGEN", "wasm-bindgen"),
      emcc: env_tool("WASMDOCK_EMCC", "emcc"),
    }
  }
}

fn env_tool(var: &str, default: &str) -> PathBuf {
  std::env::var(var).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

/// The artifact triplet an adapter leaves in the scratch area.
#[derive(Debug)]
pub struct BuildOutputs {
  /// Compiled module body (`.wasm`).
  pub binary: PathBuf,
  /// Loader script that instantiates the binary (`.js`).
  pub loader: PathBuf,
  /// Typed entry point re-exporting the loader (`.ts`).
  pub wrapper: PathBuf,
}

impl BuildOutputs {
  /// Check that every file the adapter promised actually exists.
  pub(crate) fn verify(self, tool: &str) -> Result<Self> {
    for path in [&self.binary, &self.loader, &self.wrapper] {
      if !path.is_file() {
        return Err(Error::MissingToolOutput {
          tool: tool.to_string(),
          path: path.clone(),
        });
      }
    }
    Ok(self)
  }
}

/// Run one external tool to completion, capturing its output.
///
/// A spawn failure or nonzero exit becomes `Error::Toolchain` carrying the
/// tool's stderr; the caller's scratch area teardown is unaffected.
pub(crate) async fn run_tool(tool: &Path, args: &[&str], cwd: &Path, envs: &[(&str, &str)]) -> Result<()> {
  let name = tool_name(tool);
  info!(tool = %name, cwd = %cwd.display(), "running toolchain");
  debug!(tool = %name, args = ?args, "toolchain arguments");

  let output = Command::new(tool)
    .args(args)
    .current_dir(cwd)
    .envs(envs.iter().copied())
    .output()
    .await
    .map_err(|e| Error::Toolchain {
      tool: name.clone(),
      code: None,
      stderr: format!("failed to spawn: {e}"),
    })?;

  if !output.status.success() {
    return Err(Error::Toolchain {
      tool: name,
      code: output.status.code(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    });
  }

  Ok(())
}

fn tool_name(tool: &Path) -> String {
  tool
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| tool.display().to_string())
}
