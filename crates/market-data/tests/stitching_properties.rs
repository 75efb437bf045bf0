//! Property-based tests for candle stitching.
//!
//! Pages are generated the way OKX serves them: newest first, each page
//! starting at (or just past) the oldest row of the previous one, with
//! occasional zero prices.

use martingale_market_data::provider::okx::{stitch, RawCandle};
use proptest::prelude::*;

// =============================================================================
// Generators
// =============================================================================

/// A price that is zero roughly one time in ten.
fn arb_price() -> impl Strategy<Value = f64> {
    prop_oneof![
        1 => Just(0.0),
        9 => 0.01f64..100_000.0,
    ]
}

fn arb_row(ts: i64) -> impl Strategy<Value = RawCandle> {
    (arb_price(), arb_price(), arb_price(), arb_price(), 0.0f64..1e6).prop_map(
        move |(open, high, low, close, volume)| RawCandle {
            ts,
            open,
            high,
            low,
            close,
            volume,
        },
    )
}

/// A newest-first page of `len` rows at `step_ms` spacing.
fn arb_page(newest: i64, len: usize, step_ms: i64) -> impl Strategy<Value = Vec<RawCandle>> {
    (0..len as i64)
        .map(|i| arb_row(newest - i * step_ms))
        .collect::<Vec<_>>()
}

/// Consecutive pages that walk backwards, each either repeating the previous
/// page's oldest row or starting one step older.
fn arb_pages() -> impl Strategy<Value = Vec<RawCandle>> {
    (
        proptest::collection::vec((1usize..40, any::<bool>()), 1..6),
        prop_oneof![Just(1_000i64), Just(60_000), Just(3_600_000)],
    )
        .prop_flat_map(|(shapes, step_ms)| {
            let mut newest = 1_700_000_000_000i64;
            let pages: Vec<_> = shapes
                .into_iter()
                .map(|(len, overlap)| {
                    let page = arb_page(newest, len, step_ms);
                    let oldest = newest - (len as i64 - 1) * step_ms;
                    newest = if overlap { oldest } else { oldest - step_ms };
                    page
                })
                .collect();
            pages.prop_map(|pages| pages.into_iter().flatten().collect::<Vec<_>>())
        })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Stitched output has unique, strictly increasing timestamps.
    #[test]
    fn prop_stitched_times_strictly_increase(rows in arb_pages()) {
        let candles = stitch(rows);
        for pair in candles.windows(2) {
            prop_assert!(pair[0].time < pair[1].time);
        }
    }

    /// No stitched candle carries a zero price.
    #[test]
    fn prop_stitched_candles_are_priced(rows in arb_pages()) {
        let candles = stitch(rows);
        for candle in &candles {
            prop_assert!(candle.open > 0.0);
            prop_assert!(candle.high > 0.0);
            prop_assert!(candle.low > 0.0);
            prop_assert!(candle.close > 0.0);
        }
    }

    /// Every distinct priced timestamp survives stitching exactly once.
    #[test]
    fn prop_stitching_keeps_every_priced_timestamp(rows in arb_pages()) {
        let mut expected: Vec<i64> = Vec::new();
        let mut seen = std::collections::HashSet::new();
        for row in &rows {
            if seen.insert(row.ts) && row.into_candle().is_priced() {
                expected.push(row.ts / 1000);
            }
        }
        expected.sort_unstable();

        let times: Vec<i64> = stitch(rows).iter().map(|c| c.time).collect();
        prop_assert_eq!(times, expected);
    }
}
