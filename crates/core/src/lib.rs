//! Martingale Core - strategy document storage.
//!
//! This crate owns the versioned strategy document: one current JSON object
//! and a directory of timestamped backups with history and rollback. It has
//! no knowledge of HTTP; the server crate drives it through
//! [`strategy::StrategyStoreTrait`].

pub mod errors;
pub mod strategy;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
