use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{rejection::JsonRejection, State},
    routing::{get, post},
    Json, Router,
};
use martingale_core::{
    errors::ValidationError,
    strategy::{HistoryEntry, StrategyDocument, StrategyStoreTrait},
};
use serde::Deserialize;
use serde_json::{json, Value};

#[derive(Deserialize)]
struct RollbackBody {
    filename: Option<String>,
}

/// Run a store operation on the blocking pool.
async fn with_store<T, F>(state: &AppState, op: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn StrategyStoreTrait) -> martingale_core::Result<T> + Send + 'static,
{
    let store = state.strategy_store.clone();
    let result = tokio::task::spawn_blocking(move || op(store.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(format!("Strategy store task failed: {}", e)))?;
    Ok(result?)
}

async fn get_strategy(State(state): State<Arc<AppState>>) -> ApiResult<Json<Value>> {
    let document = with_store(&state, |store| store.read_current()).await?;
    Ok(Json(document.into_value()))
}

async fn put_strategy(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let document = StrategyDocument::from_value(body)?;
    with_store(&state, move |store| store.write_current(document)).await?;
    Ok(Json(json!({ "success": true })))
}

async fn get_strategy_history(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<HistoryEntry>>> {
    let history = with_store(&state, |store| store.list_history()).await?;
    Ok(Json(history))
}

async fn rollback_strategy(
    State(state): State<Arc<AppState>>,
    body: Result<Json<RollbackBody>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(body) = body.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let filename = body
        .filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| {
            martingale_core::Error::from(ValidationError::MissingField("filename".to_string()))
        })?;
    with_store(&state, move |store| store.rollback(&filename)).await?;
    Ok(Json(json!({ "success": true })))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/strategy", get(get_strategy).put(put_strategy))
        .route("/strategy/history", get(get_strategy_history))
        .route("/strategy/rollback", post(rollback_strategy))
}
