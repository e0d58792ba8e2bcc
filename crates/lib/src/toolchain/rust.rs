//! Rust adapter: cargo + wasm-bindgen.
//!
//! Scaffolds a throwaway cargo project around the source file, compiles it
//! to `wasm32-unknown-unknown` with a fixed release profile, then runs
//! wasm-bindgen over the binary to produce the loader and typings. The
//! scaffold lives in the build's scratch area and disappears with it, on
//! success and failure alike.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::toolchain::{BuildOutputs, ToolchainConfig, run_tool};

const TARGET: &str = "wasm32-unknown-unknown";

/// Target feature set enabled for every module build.
const TARGET_FEATURES: &str = "-C target-feature=+bulk-memory,+mutable-globals,+reference-types,+simd128";

/// Compile a Rust source into the artifact triplet.
pub async fn compile(toolchain: &ToolchainConfig, source: &Path, name: &str, workdir: &Path) -> Result<BuildOutputs> {
  let crate_name = crate_name(name);
  let project = workdir.join("project");
  scaffold(&project, &crate_name, source)?;

  run_tool(
    &toolchain.cargo,
    &["build", "--release", "--target", TARGET],
    &project,
    &[("RUSTFLAGS", TARGET_FEATURES)],
  )
  .await?;

  let compiled = project
    .join("target")
    .join(TARGET)
    .join("release")
    .join(format!("{crate_name}.wasm"));
  if !compiled.is_file() {
    return Err(Error::MissingToolOutput {
      tool: "cargo".to_string(),
      path: compiled,
    });
  }

  let out = workdir.join("out");
  fs::create_dir_all(&out)?;
  let out_str = out.display().to_string();
  let compiled_str = compiled.display().to_string();
  run_tool(
    &toolchain.wasm_bindgen,
    &["--target", "web", "--out-dir", &out_str, "--out-name", name, &compiled_str],
    workdir,
    &[],
  )
  .await?;

  // wasm-bindgen emits the module as <name>_bg.wasm; the store keys all
  // three artifacts by one stem, so rename the binary and point the loader
  // at the new file name.
  let emitted = out.join(format!("{name}_bg.wasm"));
  let binary = out.join(format!("{name}.wasm"));
  if !emitted.is_file() {
    return Err(Error::MissingToolOutput {
      tool: "wasm-bindgen".to_string(),
      path: emitted,
    });
  }
  fs::rename(&emitted, &binary)?;

  let loader = out.join(format!("{name}.js"));
  rewrite_loader(&loader, name)?;

  // the generated typings are the wrapper; they re-export the binding
  // names wasm-bindgen chose
  let typings = out.join(format!("{name}.d.ts"));
  let wrapper = out.join(format!("{name}.ts"));
  if typings.is_file() {
    fs::rename(&typings, &wrapper)?;
  }

  BuildOutputs { binary, loader, wrapper }.verify("wasm-bindgen")
}

/// Map a module name onto a valid cargo package name.
fn crate_name(name: &str) -> String {
  let mut sanitized: String = name
    .chars()
    .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
    .collect();
  if sanitized.chars().next().is_some_and(|c| c.is_ascii_digit()) {
    sanitized.insert(0, '_');
  }
  sanitized
}

fn scaffold(project: &Path, crate_name: &str, source: &Path) -> Result<()> {
  let src = project.join("src");
  fs::create_dir_all(&src)?;

  let manifest = format!(
    r#"[package]
name = "{crate_name}"
version = "0.0.0"
edition = "2021"

[lib]
crate-type = ["cdylib"]

[dependencies]
wasm-bindgen = "0.2"

[profile.release]
opt-level = 3
lto = true
strip = "debuginfo"
"#
  );
  fs::write(project.join("Cargo.toml"), manifest)?;
  fs::copy(source, src.join("lib.rs"))?;
  debug!(project = %project.display(), "scaffolded build crate");
  Ok(())
}

fn rewrite_loader(loader: &Path, name: &str) -> Result<()> {
  if !loader.is_file() {
    return Ok(()); // verify() reports the missing loader
  }
  let text = fs::read_to_string(loader)?;
  let patched = text.replace(&format!("{name}_bg.wasm"), &format!("{name}.wasm"));
  fs::write(loader, patched)?;
  Ok(())
}
