//! Strategy module - the versioned strategy document store.
//!
//! One current document plus a directory of timestamped backups. Every write
//! backs up its predecessor first, and every rollback snapshots the document
//! it replaces, so no version is ever dropped.

mod strategy_model;
mod strategy_service;
mod strategy_traits;

pub use strategy_model::{
    HistoryEntry, StrategyDocument, LAST_UPDATE_FIELD, UNKNOWN_VERSION, VERSION_FIELD,
};
pub use strategy_service::{
    FileStrategyStore, CURRENT_FILE_NAME, HISTORY_DIR_NAME, HISTORY_LIMIT,
};
pub use strategy_traits::StrategyStoreTrait;
