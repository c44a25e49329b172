use anyhow::Result;
use axum::{routing::get, Router};
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};
use tower_http::trace::TraceLayer;

use pageserve::api::{self, AppState};
use pageserve::PageDefaults;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup tracing
    tracing_subscriber::fmt::init();

    let state = Arc::new(RwLock::new(AppState {
        items: BTreeMap::new(),
        defaults: PageDefaults::default(),
    }));

    // Compose the routes
    let app = Router::new()
        .route("/items", get(api::items_index).post(api::items_insert))
        .route("/items/:name", get(api::item_get).delete(api::item_delete))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(":::3000").await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    Ok(axum::serve(listener, app).await?)
}
