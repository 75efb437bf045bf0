use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use martingale_market_data::{
    provider::okx::DEFAULT_BAR, ChartSeries, Instrument, InstrumentCandles, SearchResult,
};
use serde::Deserialize;

#[derive(Deserialize)]
struct ChartQuery {
    range: Option<String>,
    interval: Option<String>,
}

#[derive(Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

#[derive(Deserialize)]
struct CandlesQuery {
    bar: Option<String>,
    limit: Option<String>,
}

#[derive(Deserialize)]
struct SwapInfoQuery {
    sym: Option<String>,
}

async fn get_yahoo_chart(
    Path(symbol): Path<String>,
    Query(query): Query<ChartQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ChartSeries>> {
    let series = state
        .yahoo
        .get_chart(&symbol, query.range.as_deref(), query.interval.as_deref())
        .await?;
    Ok(Json(series))
}

async fn search_yahoo(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<SearchResult>> {
    Json(state.yahoo.search(query.q.as_deref().unwrap_or_default()).await)
}

/// With `limit`: one recent page. Without: the paged history for the bar.
async fn get_okx_candles(
    Path(inst_id): Path<String>,
    Query(query): Query<CandlesQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<InstrumentCandles>> {
    let bar = query
        .bar
        .as_deref()
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .unwrap_or(DEFAULT_BAR);

    let candles = match query.limit.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        Some(raw) => {
            let limit: usize = raw
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("Invalid limit: {}", raw)))?;
            state.okx.get_candles(&inst_id, bar, limit).await?
        }
        None => state.okx.get_candle_history(&inst_id, bar).await?,
    };
    Ok(Json(candles))
}

async fn search_okx(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Vec<Instrument>> {
    Json(
        state
            .okx
            .search_instruments(query.q.as_deref().unwrap_or_default())
            .await,
    )
}

/// One contract spec when `sym` is given, otherwise the whole mapping.
async fn get_okx_swap_info(
    Query(query): Query<SwapInfoQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    match query.sym.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(sym) => {
            let info = state.okx.swap_info(sym).await?;
            Ok(Json(info).into_response())
        }
        None => {
            let map = state.okx.swap_info_map().await;
            Ok(Json(map.as_ref()).into_response())
        }
    }
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/yahoo/{symbol}", get(get_yahoo_chart))
        .route("/search/yahoo", get(search_yahoo))
        .route("/okx/candles/{inst_id}", get(get_okx_candles))
        .route("/search/okx", get(search_okx))
        .route("/okx/swap-info", get(get_okx_swap_info))
}
