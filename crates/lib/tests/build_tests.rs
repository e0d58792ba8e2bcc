//! End-to-end dispatcher tests against stub toolchain executables.
//!
//! Real cargo / wasm-bindgen / emcc installations are not assumed in test
//! environments, so these tests drive `build()` with small shell scripts
//! that mimic each tool's observable output contract.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use wasmdock_lib::{ArtifactStore, BuildRequest, Error, ToolchainConfig, build};

fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
  let path = dir.join(name);
  fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
  let mut perms = fs::metadata(&path).unwrap().permissions();
  perms.set_mode(0o755);
  fs::set_permissions(&path, perms).unwrap();
  path
}

/// Stub emcc: honors `-o <loader.js>` and drops the sibling `.wasm`.
fn stub_emcc(dir: &Path) -> PathBuf {
  write_stub(
    dir,
    "emcc",
    r#"out=""
prev=""
for arg in "$@"; do
  if [ "$prev" = "-o" ]; then out="$arg"; fi
  prev="$arg"
done
printf 'emcc-loader' > "$out"
printf 'emcc-binary' > "${out%.js}.wasm"
"#,
  )
}

/// Stub cargo: reads the scaffold's package name and drops the release
/// binary where the adapter expects it.
fn stub_cargo(dir: &Path) -> PathBuf {
  write_stub(
    dir,
    "cargo",
    r#"name=$(sed -n 's/^name = "\(.*\)"$/\1/p' Cargo.toml | head -n 1)
mkdir -p "target/wasm32-unknown-unknown/release"
printf 'cargo-binary' > "target/wasm32-unknown-unknown/release/${name}.wasm"
"#,
  )
}

/// Stub wasm-bindgen: honors `--out-dir`/`--out-name` and emits the
/// `_bg.wasm` + loader + typings set the real tool produces.
fn stub_wasm_bindgen(dir: &Path) -> PathBuf {
  write_stub(
    dir,
    "wasm-bindgen",
    r#"out_dir=""
out_name=""
prev=""
for arg in "$@"; do
  case "$prev" in
    --out-dir) out_dir="$arg" ;;
    --out-name) out_name="$arg" ;;
  esac
  prev="$arg"
done
mkdir -p "$out_dir"
printf 'bindgen-binary' > "$out_dir/${out_name}_bg.wasm"
printf "import './${out_name}_bg.wasm';" > "$out_dir/${out_name}.js"
printf 'export function greet(): void;' > "$out_dir/${out_name}.d.ts"
"#,
  )
}

struct TestEnv {
  temp: TempDir,
  store: ArtifactStore,
}

impl TestEnv {
  fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let store = ArtifactStore::open(temp.path().join("store")).unwrap();
    Self { temp, store }
  }

  fn toolchain(&self) -> ToolchainConfig {
    let bin = self.temp.path().join("bin");
    fs::create_dir_all(&bin).unwrap();
    ToolchainConfig {
      cargo: stub_cargo(&bin),
      wasm_bindgen: stub_wasm_bindgen(&bin),
      emcc: stub_emcc(&bin),
    }
  }

  fn write_source(&self, name: &str, content: &str) -> PathBuf {
    let path = self.temp.path().join(name);
    fs::write(&path, content).unwrap();
    path
  }

  fn store_files(&self) -> Vec<String> {
    let mut files: Vec<String> = fs::read_dir(self.store.root())
      .unwrap()
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    files.sort();
    files
  }
}

#[tokio::test]
async fn c_build_publishes_the_triplet() {
  let env = TestEnv::new();
  let source = env.write_source("adder.c", "int add(int a, int b) { return a + b; }");
  let request = BuildRequest::new(&source, "adder").unwrap();

  let result = build(&request, &env.toolchain(), &env.store).await.unwrap();

  assert_eq!(result.name, "adder");
  assert_eq!(env.store_files(), vec!["adder.js", "adder.ts", "adder.wasm"]);
  assert_eq!(env.store.get("adder", "wasm").unwrap(), b"emcc-binary");
  assert_eq!(env.store.get("adder", "js").unwrap(), b"emcc-loader");

  let wrapper = String::from_utf8(env.store.get("adder", "ts").unwrap()).unwrap();
  assert!(wrapper.contains("export function initialize()"));
  assert!(wrapper.contains(r#"import loadModule from "./adder.js";"#));
}

#[tokio::test]
async fn rust_build_publishes_the_triplet() {
  let env = TestEnv::new();
  let source = env.write_source("greeter.rs", "pub fn greet() {}");
  let request = BuildRequest::new(&source, "greeter").unwrap();

  let result = build(&request, &env.toolchain(), &env.store).await.unwrap();

  assert_eq!(result.binary.file, "greeter.wasm");
  assert_eq!(env.store_files(), vec!["greeter.js", "greeter.ts", "greeter.wasm"]);
  assert_eq!(env.store.get("greeter", "wasm").unwrap(), b"bindgen-binary");

  // the loader must reference the renamed binary, not the _bg name
  let loader = String::from_utf8(env.store.get("greeter", "js").unwrap()).unwrap();
  assert!(loader.contains("greeter.wasm"));
  assert!(!loader.contains("greeter_bg.wasm"));

  let wrapper = String::from_utf8(env.store.get("greeter", "ts").unwrap()).unwrap();
  assert!(wrapper.contains("greet"));
}

#[tokio::test]
async fn unsupported_source_fails_before_any_tool_runs() {
  let env = TestEnv::new();
  let source = env.write_source("module.py", "print('hi')");
  let request = BuildRequest::new(&source, "module").unwrap();

  // tools that would fail loudly if they were ever invoked
  let toolchain = ToolchainConfig {
    cargo: PathBuf::from("/nonexistent/cargo"),
    wasm_bindgen: PathBuf::from("/nonexistent/wasm-bindgen"),
    emcc: PathBuf::from("/nonexistent/emcc"),
  };

  let result = build(&request, &toolchain, &env.store).await;

  assert!(matches!(result, Err(Error::UnsupportedSource { .. })));
  assert!(env.store_files().is_empty());
}

#[tokio::test]
async fn toolchain_failure_publishes_nothing() {
  let env = TestEnv::new();
  let source = env.write_source("broken.c", "int main( {");
  let request = BuildRequest::new(&source, "broken").unwrap();

  let bin = env.temp.path().join("bin");
  fs::create_dir_all(&bin).unwrap();
  let toolchain = ToolchainConfig {
    cargo: PathBuf::from("/nonexistent/cargo"),
    wasm_bindgen: PathBuf::from("/nonexistent/wasm-bindgen"),
    emcc: write_stub(&bin, "emcc", "echo 'error: expected parameter declarator' >&2\nexit 1\n"),
  };

  let result = build(&request, &toolchain, &env.store).await;

  match result {
    Err(Error::Toolchain { tool, code, stderr }) => {
      assert_eq!(tool, "emcc");
      assert_eq!(code, Some(1));
      assert!(stderr.contains("expected parameter declarator"));
    }
    other => panic!("expected toolchain failure, got {other:?}"),
  }
  assert!(env.store_files().is_empty());
}

#[tokio::test]
async fn rebuild_overwrites_without_duplicates() {
  let env = TestEnv::new();
  let source = env.write_source("adder.c", "int add(int a, int b) { return a + b; }");
  let request = BuildRequest::new(&source, "adder").unwrap();
  let toolchain = env.toolchain();

  build(&request, &toolchain, &env.store).await.unwrap();
  build(&request, &toolchain, &env.store).await.unwrap();

  assert_eq!(env.store_files(), vec!["adder.js", "adder.ts", "adder.wasm"]);
}

#[tokio::test]
async fn distinct_names_build_into_distinct_artifact_sets() {
  let env = TestEnv::new();
  let toolchain = env.toolchain();

  let alpha = env.write_source("alpha.c", "int a;");
  let beta = env.write_source("beta.c", "int b;");
  build(&BuildRequest::new(&alpha, "alpha").unwrap(), &toolchain, &env.store)
    .await
    .unwrap();
  build(&BuildRequest::new(&beta, "beta").unwrap(), &toolchain, &env.store)
    .await
    .unwrap();

  assert_eq!(env.store.list_modules().unwrap(), vec!["alpha", "beta"]);
}
