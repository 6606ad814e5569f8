// rest/mod.rs — HTTP API server.
//
// Endpoints:
//   POST /generate-memo/      — draft a new three-section memo
//   PUT  /update-memo/{id}/   — revise one section of an existing memo
//   GET  /health

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let addr: SocketAddr = bind.parse()?;

    let router = build_router(ctx);

    info!("memo API listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health))
        .route("/generate-memo/", post(routes::memos::generate_memo))
        .route("/update-memo/{id}/", put(routes::memos::update_memo))
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}
