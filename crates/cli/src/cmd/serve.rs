//! Implementation of the `wasmdock serve` command.

use std::net::SocketAddr;

use anyhow::{Context, Result};

use wasmdock_lib::ArtifactStore;
use wasmdock_lib::serve::serve;
use wasmdock_lib::store::paths::store_root;

pub fn cmd_serve(addr: SocketAddr) -> Result<()> {
  let store = ArtifactStore::open(store_root())?;
  println!("Serving artifacts from {} at http://{}", store.root().display(), addr);

  let rt = tokio::runtime::Runtime::new().context("failed to create async runtime")?;
  rt.block_on(serve(store, addr)).context("server failed")?;
  Ok(())
}
