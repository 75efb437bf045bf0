use std::sync::Arc;

use crate::config::Config;
use martingale_core::strategy::{FileStrategyStore, StrategyStoreTrait};
use martingale_market_data::{HttpFetcher, JsonFetcher, OkxProvider, YahooProvider};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub yahoo: Arc<YahooProvider>,
    pub okx: Arc<OkxProvider>,
    pub strategy_store: Arc<dyn StrategyStoreTrait>,
}

pub fn init_tracing() {
    let log_format = std::env::var("MARTINGALE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    build_state_with_fetcher(config, Arc::new(HttpFetcher::new())).await
}

/// Build the state around a given upstream fetcher.
pub async fn build_state_with_fetcher(
    config: &Config,
    fetcher: Arc<dyn JsonFetcher>,
) -> anyhow::Result<Arc<AppState>> {
    let data_dir = config.data_dir.clone();
    let store = tokio::task::spawn_blocking(move || FileStrategyStore::open(data_dir)).await??;
    tracing::info!("Strategy document path: {}", store.current_path().display());

    let yahoo = YahooProvider::new(fetcher.clone()).with_base_url(config.yahoo_base_url.as_str());
    let okx = OkxProvider::new(fetcher).with_base_url(config.okx_base_url.as_str());

    Ok(Arc::new(AppState {
        yahoo: Arc::new(yahoo),
        okx: Arc::new(okx),
        strategy_store: Arc::new(store),
    }))
}
