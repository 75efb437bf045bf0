//! Backward cursor pagination and stitching.
//!
//! OKX serves at most [`PAGE_SIZE`] candles per call, newest first. Page 0
//! reads the "recent" endpoint; each following page reads the "history"
//! endpoint with `after = <oldest ts of the previous page>`. Pages may repeat
//! the boundary row, and the concatenation is newest-first, so the harvest is
//! deduplicated and sorted once, after the loop ([`stitch`]).

use std::collections::BTreeMap;
use std::future::Future;

use tracing::{debug, warn};

use crate::errors::MarketDataError;
use crate::models::Candle;

use super::models::RawCandle;

/// Maximum rows OKX returns per candle request.
pub const PAGE_SIZE: usize = 300;

/// Rows accumulated across pages, before stitching.
#[derive(Debug, Default)]
pub struct PageHarvest {
    pub rows: Vec<RawCandle>,
    pub pages_fetched: usize,
}

/// One upstream response.
///
/// `returned` counts every row the upstream sent, including rows that
/// failed to parse and are absent from `rows`.
#[derive(Debug, Default)]
pub struct Page {
    pub rows: Vec<RawCandle>,
    pub returned: usize,
}

impl From<Vec<RawCandle>> for Page {
    fn from(rows: Vec<RawCandle>) -> Self {
        Self {
            returned: rows.len(),
            rows,
        }
    }
}

/// Run the page loop.
///
/// `fetch_page` receives `None` for the first page and the previous page's
/// oldest parsed timestamp afterwards. The loop stops after `budget` pages,
/// on an empty page, or when the upstream returns fewer than [`PAGE_SIZE`]
/// rows. A failure on the first page propagates; a failure on a later page
/// ends the loop with what has been collected.
pub async fn harvest_pages<F, Fut>(
    budget: usize,
    mut fetch_page: F,
) -> Result<PageHarvest, MarketDataError>
where
    F: FnMut(Option<i64>) -> Fut,
    Fut: Future<Output = Result<Page, MarketDataError>>,
{
    let mut harvest = PageHarvest::default();
    let mut cursor = None;

    for page in 0..budget.max(1) {
        let fetched = match fetch_page(cursor).await {
            Ok(fetched) => fetched,
            Err(e) if page > 0 => {
                warn!("Stopping pagination at page {}: {}", page, e);
                break;
            }
            Err(e) => return Err(e),
        };
        harvest.pages_fetched += 1;

        if fetched.returned == 0 {
            debug!("Page {} came back empty, no older data", page);
            break;
        }

        let exhausted = fetched.returned < PAGE_SIZE;
        let oldest = fetched.rows.iter().map(|row| row.ts).min();
        harvest.rows.extend(fetched.rows);

        if exhausted {
            debug!("Page {} returned a short page, history exhausted", page);
            break;
        }
        match oldest {
            Some(ts) => cursor = Some(ts),
            None => {
                warn!("Page {} had no parsable rows, cannot move the cursor", page);
                break;
            }
        }
    }

    Ok(harvest)
}

/// Deduplicate by raw timestamp, order ascending, convert, and drop unpriced bars.
///
/// When a timestamp appears more than once, the first occurrence wins (the
/// copy from the newer page).
pub fn stitch(rows: Vec<RawCandle>) -> Vec<Candle> {
    let mut by_ts: BTreeMap<i64, RawCandle> = BTreeMap::new();
    for row in rows {
        by_ts.entry(row.ts).or_insert(row);
    }

    let mut candles: Vec<Candle> = by_ts
        .into_values()
        .map(RawCandle::into_candle)
        .filter(Candle::is_priced)
        .collect();
    // Sub-second timestamps collapse onto the same second after conversion.
    candles.dedup_by_key(|c| c.time);
    candles
}
