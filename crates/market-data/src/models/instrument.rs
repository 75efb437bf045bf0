use serde::{Deserialize, Serialize};

/// A live, USDT-quoted spot pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    /// Exchange instrument id (e.g., "BTC-USDT")
    pub symbol: String,

    /// Base asset (e.g., "BTC")
    pub base: String,

    /// Display name (e.g., "BTC/USDT")
    pub name: String,
}

impl Instrument {
    /// Case-insensitive substring match on symbol or base asset.
    ///
    /// `needle` must already be upper-cased.
    pub(crate) fn matches_upper(&self, needle: &str) -> bool {
        self.symbol.to_uppercase().contains(needle) || self.base.to_uppercase().contains(needle)
    }
}

/// Contract specification of a USDT-margined perpetual swap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapInfo {
    pub inst_id: String,
    pub max_lever: f64,
    pub ct_val: f64,
    pub ct_mult: f64,
    pub min_sz: f64,
    pub lot_sz: f64,
    pub tick_sz: f64,
    pub ct_val_ccy: String,
}
