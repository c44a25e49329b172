#![allow(clippy::unused_async, clippy::needless_pass_by_value)]

use crate::error::ApiError;
use crate::pagination::{PageDefaults, PageQuery, Paged, Pagination};
use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response, Result as HttpResult},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    sync::{Arc, RwLock},
};

/// Shared service state
pub struct AppState {
    /// Stored documents, keyed by name; ordered so page windows are stable
    pub items: BTreeMap<String, Arc<Value>>,
    /// Pagination fallbacks for this deployment
    pub defaults: PageDefaults,
}

/// State handle shared across handlers
pub type AppStateWrapper = Arc<RwLock<AppState>>;
/// Response type returned by every handler
pub type HttpResponse = HttpResult<Response<Body>, ApiError>;

/// Return state locked for reading
fn lock_state_read(state: &AppStateWrapper) -> Result<std::sync::RwLockReadGuard<'_, AppState>> {
    // With map errors to string because PoisonError are not `Send`
    state.read().map_err(move |e| anyhow::anyhow! { e.to_string() })
}

/// Return state locked for writing
fn lock_state_write(state: &AppStateWrapper) -> Result<std::sync::RwLockWriteGuard<'_, AppState>> {
    // With map errors to string because PoisonError are not `Send`
    state.write().map_err(move |e| anyhow::anyhow! { e.to_string() })
}

/// Select the entries covered by `window` out of `items`.
///
/// Fractional window values are truncated at this boundary; the normalizer
/// itself never rounds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn page_window<'a>(
    items: &'a BTreeMap<String, Arc<Value>>,
    window: &Pagination,
) -> BTreeMap<&'a String, &'a Arc<Value>> {
    items.iter().skip(window.skip as usize).take(window.limit as usize).collect()
}

/// Handler to return a paginated list of stored items
/// # Errors
/// Poisoned state lock
pub async fn items_index(
    pagination: Option<Query<PageQuery>>,
    State(s): State<AppStateWrapper>,
) -> HttpResponse {
    let Query(query) = pagination.unwrap_or_default();

    let state = lock_state_read(&s)?;
    let window = query.normalize(state.defaults);
    let items = page_window(&state.items, &window);

    Ok(Json(Paged::new(items, state.items.len(), window)).into_response())
}

/// Structure to receive data for creating a new item
#[derive(Deserialize)]
pub struct ItemInsert {
    name: String,
    #[serde(flatten)]
    data: Value,
}

/// Handler to insert a new item
/// # Errors
/// Poisoned state lock
pub async fn items_insert(
    State(s): State<AppStateWrapper>,
    insert: Json<ItemInsert>,
) -> HttpResponse {
    let insert = insert.0;

    let mut state = lock_state_write(&s)?;
    let _ = state.items.insert(insert.name, Arc::new(insert.data));

    Ok(StatusCode::CREATED.into_response())
}

/// Handler to retrieve an item by name
/// # Errors
/// Poisoned state lock, unknown name
pub async fn item_get(Path(name): Path<String>, State(s): State<AppStateWrapper>) -> HttpResponse {
    let state = lock_state_read(&s)?;
    let item = state.items.get(&name).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(item).into_response())
}

/// Handler to delete an item by name
/// # Errors
/// Poisoned state lock, unknown name
pub async fn item_delete(
    Path(name): Path<String>,
    State(s): State<AppStateWrapper>,
) -> HttpResponse {
    let mut state = lock_state_write(&s)?;
    let _ = state.items.remove(&name).ok_or(StatusCode::NOT_FOUND)?;

    Ok(StatusCode::OK.into_response())
}
