//! C/C++ adapter: emscripten.
//!
//! emcc produces the binary and its loader in one invocation but no typed
//! entry point, so this adapter synthesizes the wrapper itself; every
//! adapter hands the dispatcher a complete triplet.

use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::toolchain::{BuildOutputs, ToolchainConfig, run_tool};

/// Fixed emcc flag set: ES6 module output, web/worker/node hosts,
/// TextDecoder-based string handling.
const EMCC_FLAGS: &[&str] = &[
  "-O3",
  "-sEXPORT_ES6=1",
  "-sMODULARIZE=1",
  "-sENVIRONMENT=web,worker,node",
  "-sTEXTDECODER=2",
];

/// Compile a C or C++ source into the artifact triplet.
pub async fn compile(toolchain: &ToolchainConfig, source: &Path, name: &str, workdir: &Path) -> Result<BuildOutputs> {
  let out = workdir.join("out");
  fs::create_dir_all(&out)?;

  let loader = out.join(format!("{name}.js"));
  let source_str = source.display().to_string();
  let loader_str = loader.display().to_string();

  let mut args = vec![source_str.as_str()];
  args.extend_from_slice(EMCC_FLAGS);
  args.extend_from_slice(&["-o", &loader_str]);
  run_tool(&toolchain.emcc, &args, workdir, &[]).await?;

  // emcc drops <name>.wasm next to the requested .js output
  let binary = out.join(format!("{name}.wasm"));
  let wrapper = out.join(format!("{name}.ts"));
  fs::write(&wrapper, wrapper_source(name))?;

  BuildOutputs { binary, loader, wrapper }.verify("emcc")
}

/// The synthesized entry point: imports the loader and exposes a single
/// `initialize()` returning the instantiated module exports.
fn wrapper_source(name: &str) -> String {
  format!(
    r#"import loadModule from "./{name}.js";

let instance: Promise<unknown> | undefined;

export function initialize(): Promise<unknown> {{
  if (instance === undefined) {{
    instance = loadModule();
  }}
  return instance;
}}
"#
  )
}
