//! HTTP serving of published artifacts.
//!
//! A single stateless listener over the artifact store: `GET /` renders an
//! HTML index of the published modules, `GET /{file}` returns one artifact
//! with its content type. A bad request degrades to a 404 or 500 response;
//! nothing on the request path can take the listener down.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::{Path as RequestPath, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::{Error, Result};
use crate::store::ArtifactStore;

/// Content type for a served artifact, by extension.
pub fn content_type(file: &str) -> &'static str {
  match file.rsplit_once('.').map(|(_, ext)| ext) {
    Some("wasm") => "application/wasm",
    Some("js") => "application/javascript",
    Some("ts") => "application/typescript",
    Some("html") => "text/html",
    _ => "application/octet-stream",
  }
}

/// Build the router over one store.
pub fn router(store: ArtifactStore) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/{file}", get(artifact))
    .layer(TraceLayer::new_for_http())
    .with_state(store)
}

/// Serve the store at `addr` until ctrl-c.
pub async fn serve(store: ArtifactStore, addr: SocketAddr) -> Result<()> {
  let app = router(store);
  let listener = TcpListener::bind(addr).await?;
  info!(addr = %addr, "artifact server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!(error = %e, "failed to install ctrl-c handler");
  }
}

async fn index(State(store): State<ArtifactStore>) -> Response {
  match store.list_modules() {
    Ok(modules) => Html(render_index(&modules)).into_response(),
    Err(e) => {
      error!(error = %e, "failed to enumerate the artifact store");
      (
        StatusCode::INTERNAL_SERVER_ERROR,
        "failed to enumerate the artifact store",
      )
        .into_response()
    }
  }
}

async fn artifact(State(store): State<ArtifactStore>, RequestPath(file): RequestPath<String>) -> Response {
  match store.read(&file) {
    Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&file))], bytes).into_response(),
    Err(Error::ArtifactNotFound { file }) => {
      (StatusCode::NOT_FOUND, format!("artifact not found: {file}")).into_response()
    }
    Err(e) => {
      error!(file = %file, error = %e, "failed to read artifact");
      (StatusCode::INTERNAL_SERVER_ERROR, format!("failed to read {file}")).into_response()
    }
  }
}

fn render_index(modules: &[String]) -> String {
  let mut page = String::from(
    "<!DOCTYPE html>\n<html>\n<head><title>wasmdock modules</title></head>\n<body>\n<h1>Modules</h1>\n<ul>\n",
  );
  for name in modules {
    page.push_str(&format!("  <li><a href=\"/{name}.wasm\">{name}.wasm</a></li>\n"));
  }
  page.push_str("</ul>\n</body>\n</html>\n");
  page
}
