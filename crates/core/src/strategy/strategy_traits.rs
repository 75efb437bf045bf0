use crate::errors::Result;
use crate::strategy::strategy_model::{HistoryEntry, StrategyDocument};

/// Trait for strategy document store operations.
///
/// Implementations do blocking I/O; async callers should move calls onto a
/// blocking thread.
pub trait StrategyStoreTrait: Send + Sync {
    /// Current document. Absent or unparsable counts as not found.
    fn read_current(&self) -> Result<StrategyDocument>;

    /// Replace the current document, backing up the previous one first.
    fn write_current(&self, document: StrategyDocument) -> Result<()>;

    /// Most recent backups, newest first.
    fn list_history(&self) -> Result<Vec<HistoryEntry>>;

    /// Restore a named backup, snapshotting the current document first.
    fn rollback(&self, filename: &str) -> Result<()>;
}
