//! Bar interval tokens and the per-interval page budget.
//!
//! OKX bar tokens are case-sensitive: minutes are lowercase (`1m`), hours and
//! longer are uppercase (`1H`, `1D`, `1W`, `1M`). Clients tend to send the
//! lowercase forms used elsewhere (`1h`, `1d`, `1mo`), so those are mapped
//! before the request is built.

/// Tokens OKX accepts verbatim.
const OKX_BARS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1H", "2H", "4H", "6H", "12H", "1D", "2D", "3D", "1W", "1M",
    "3M",
];

/// Shorthand (compared lowercase) -> OKX token.
const BAR_ALIASES: &[(&str, &str)] = &[
    ("1h", "1H"),
    ("2h", "2H"),
    ("4h", "4H"),
    ("6h", "6H"),
    ("12h", "12H"),
    ("1d", "1D"),
    ("2d", "2D"),
    ("3d", "3D"),
    ("1w", "1W"),
    ("1mo", "1M"),
    ("3mo", "3M"),
];

/// Pages of history fetched per normalized bar token.
///
/// Each page holds [`PAGE_SIZE`](super::PAGE_SIZE) bars, so a single page of
/// minute bars already spans five hours while daily bars need several pages
/// to reach a useful backtest window.
const PAGE_BUDGETS: &[(&str, usize)] = &[
    ("1m", 1),
    ("3m", 1),
    ("5m", 2),
    ("15m", 3),
    ("30m", 4),
    ("1H", 5),
    ("2H", 5),
    ("4H", 6),
    ("6H", 6),
    ("12H", 7),
    ("1D", 7),
    ("1W", 2),
    ("1M", 1),
];

/// Page budget for bars missing from the table.
pub const DEFAULT_PAGE_BUDGET: usize = 2;

/// Map a requested bar to the OKX token. Unknown tokens pass through.
pub fn normalize_bar(bar: &str) -> String {
    let bar = bar.trim();
    if OKX_BARS.contains(&bar) {
        return bar.to_string();
    }

    let lower = bar.to_ascii_lowercase();
    BAR_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, token)| token.to_string())
        .unwrap_or_else(|| bar.to_string())
}

/// Number of pages to request for a normalized bar token.
pub fn page_budget(bar: &str) -> usize {
    PAGE_BUDGETS
        .iter()
        .find(|(token, _)| *token == bar)
        .map(|(_, pages)| *pages)
        .unwrap_or(DEFAULT_PAGE_BUDGET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_lowercase_shorthand() {
        assert_eq!(normalize_bar("1h"), "1H");
        assert_eq!(normalize_bar("4h"), "4H");
        assert_eq!(normalize_bar("1d"), "1D");
        assert_eq!(normalize_bar("1w"), "1W");
        assert_eq!(normalize_bar("1mo"), "1M");
        assert_eq!(normalize_bar("1MO"), "1M");
    }

    #[test]
    fn test_normalize_keeps_okx_tokens() {
        // "1M" is a month and must not be folded into the minute token
        assert_eq!(normalize_bar("1M"), "1M");
        assert_eq!(normalize_bar("1m"), "1m");
        assert_eq!(normalize_bar("15m"), "15m");
        assert_eq!(normalize_bar("1D"), "1D");
    }

    #[test]
    fn test_normalize_passes_unknown_through() {
        assert_eq!(normalize_bar("7x"), "7x");
        assert_eq!(normalize_bar("1Dutc"), "1Dutc");
    }

    #[test]
    fn test_page_budget_table() {
        assert_eq!(page_budget("1m"), 1);
        assert_eq!(page_budget("1H"), 5);
        assert_eq!(page_budget("1D"), 7);
        assert_eq!(page_budget("1W"), 2);
    }

    #[test]
    fn test_page_budget_default() {
        assert_eq!(page_budget("7x"), DEFAULT_PAGE_BUDGET);
        // budgets are keyed by normalized tokens only
        assert_eq!(page_budget("1d"), DEFAULT_PAGE_BUDGET);
        assert_eq!(page_budget(&normalize_bar("1d")), 7);
    }

    #[test]
    fn test_every_budget_key_is_an_okx_token() {
        for (token, pages) in PAGE_BUDGETS {
            assert!(OKX_BARS.contains(token), "{} is not an OKX bar", token);
            assert!(*pages >= 1);
        }
    }
}
