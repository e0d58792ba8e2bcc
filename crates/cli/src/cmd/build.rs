//! Implementation of the `wasmdock build` command.
//!
//! Resolves the source path and module name, runs the build dispatcher and
//! prints a summary of the published artifact set.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use owo_colors::OwoColorize;

use wasmdock_lib::store::paths::store_root;
use wasmdock_lib::{ArtifactStore, BuildRequest, ToolchainConfig, build};

use crate::output::{OutputFormat, format_bytes, format_duration, symbols};

pub fn cmd_build(source: &Path, name: Option<&str>, format: OutputFormat) -> Result<()> {
  if !source.is_file() {
    bail!("source file not found: {}", source.display());
  }
  let source = dunce::canonicalize(source).context("failed to resolve source path")?;

  let name = match name {
    Some(name) => name.to_string(),
    None => source
      .file_stem()
      .and_then(|s| s.to_str())
      .map(str::to_string)
      .context("cannot derive a module name from the source path; pass one explicitly")?,
  };

  let request = BuildRequest::new(&source, name)?;
  let toolchain = ToolchainConfig::from_env();
  let store = ArtifactStore::open(store_root())?;

  let started = Instant::now();
  let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
  let result = rt.block_on(build(&request, &toolchain, &store)).context("build failed")?;
  let elapsed = started.elapsed();

  if format.is_json() {
    println!("{}", serde_json::to_string_pretty(&result)?);
    return Ok(());
  }

  println!();
  println!("Built {} in {}", result.name, format_duration(elapsed));
  for artifact in result.artifacts() {
    println!(
      "  {} {} ({})",
      symbols::SUCCESS.green(),
      artifact.file,
      format_bytes(artifact.size)
    );
  }
  println!();
  println!("Store: {}", store.root().display());

  Ok(())
}
