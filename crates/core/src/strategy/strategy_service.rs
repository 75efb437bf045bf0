use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use super::strategy_model::{HistoryEntry, StrategyDocument, UNKNOWN_VERSION};
use super::strategy_traits::StrategyStoreTrait;
use crate::errors::{Error, Result, ValidationError};

/// Current document, relative to the data directory.
pub const CURRENT_FILE_NAME: &str = "strategy.json";

/// Backup directory, relative to the data directory.
pub const HISTORY_DIR_NAME: &str = ".strategy-history";

/// Maximum entries returned by [`FileStrategyStore::list_history`].
pub const HISTORY_LIMIT: usize = 20;

const BACKUP_PREFIX: &str = "strategy-";
const PRE_ROLLBACK_SUFFIX: &str = "-pre-rollback";
const JSON_EXTENSION: &str = ".json";

/// Backup stamp: ISO instant with `:` and `.` replaced by `-`.
const STAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S-%6fZ";

/// File-backed strategy store.
///
/// Writes and rollbacks hold `lock`, which also carries the last backup
/// stamp (unix microseconds) so stamps strictly increase.
#[derive(Debug)]
pub struct FileStrategyStore {
    current_path: PathBuf,
    history_dir: PathBuf,
    lock: Mutex<i64>,
}

impl FileStrategyStore {
    /// Open the store under `data_dir`, creating the backup directory.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();
        let history_dir = data_dir.join(HISTORY_DIR_NAME);
        fs::create_dir_all(&history_dir)?;

        Ok(Self {
            current_path: data_dir.join(CURRENT_FILE_NAME),
            history_dir,
            lock: Mutex::new(0),
        })
    }

    pub fn current_path(&self) -> &Path {
        &self.current_path
    }

    pub fn history_dir(&self) -> &Path {
        &self.history_dir
    }

    fn acquire(&self) -> Result<MutexGuard<'_, i64>> {
        self.lock.lock().map_err(|_| Error::LockPoisoned)
    }

    /// Copy the current document verbatim into the backup directory.
    ///
    /// Returns the backup filename, or `None` when there is no current
    /// document. Must be called with the lock held.
    fn backup_current_locked(&self, last_stamp: &mut i64, suffix: &str) -> Result<Option<String>> {
        if !self.current_path.is_file() {
            return Ok(None);
        }

        fs::create_dir_all(&self.history_dir)?;
        let (filename, path) = self.next_backup_path(last_stamp, suffix);
        fs::copy(&self.current_path, &path)?;
        info!("Backed up strategy document to {}", filename);
        Ok(Some(filename))
    }

    /// Next unused backup name. Stamps never repeat within the process and
    /// skip names already on disk.
    fn next_backup_path(&self, last_stamp: &mut i64, suffix: &str) -> (String, PathBuf) {
        let mut micros = Utc::now().timestamp_micros().max(*last_stamp + 1);
        loop {
            let filename = backup_filename(micros, suffix);
            let path = self.history_dir.join(&filename);
            if !path.exists() {
                *last_stamp = micros;
                return (filename, path);
            }
            micros += 1;
        }
    }

    /// Replace the current document via a temporary sibling and a rename.
    fn replace_current_locked(&self, contents: &[u8]) -> Result<()> {
        let tmp_path = self.current_path.with_extension("json.tmp");
        fs::write(&tmp_path, contents)?;
        if let Err(e) = fs::rename(&tmp_path, &self.current_path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn history_entry(&self, filename: String) -> Option<HistoryEntry> {
        let path = self.history_dir.join(&filename);
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                warn!("Skipping backup {}: {}", filename, e);
                return None;
            }
        };

        let version = fs::read(&path)
            .ok()
            .and_then(|raw| serde_json::from_slice::<StrategyDocument>(&raw).ok())
            .map(|doc| doc.version_label())
            .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

        Some(HistoryEntry {
            filename,
            date: DateTime::<Utc>::from(modified),
            version,
        })
    }
}

impl StrategyStoreTrait for FileStrategyStore {
    fn read_current(&self) -> Result<StrategyDocument> {
        let raw = match fs::read(&self.current_path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(Error::StrategyNotFound),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_slice(&raw).map_err(|e| {
            warn!("Current strategy document is unparsable: {}", e);
            Error::StrategyNotFound
        })
    }

    fn write_current(&self, mut document: StrategyDocument) -> Result<()> {
        document.stamp_last_update(Utc::now().date_naive());
        let contents = serde_json::to_vec_pretty(&document)?;

        let mut last_stamp = self.acquire()?;
        self.backup_current_locked(&mut last_stamp, "")?;
        self.replace_current_locked(&contents)?;
        debug!("Wrote strategy document ({} bytes)", contents.len());
        Ok(())
    }

    fn list_history(&self) -> Result<Vec<HistoryEntry>> {
        let entries = match fs::read_dir(&self.history_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut filenames: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(JSON_EXTENSION))
            .collect();
        filenames.sort_unstable_by(|a, b| b.cmp(a));

        Ok(filenames
            .into_iter()
            .take(HISTORY_LIMIT)
            .filter_map(|filename| self.history_entry(filename))
            .collect())
    }

    fn rollback(&self, filename: &str) -> Result<()> {
        validate_backup_filename(filename)?;
        let backup_path = self.history_dir.join(filename);

        let mut last_stamp = self.acquire()?;
        if !backup_path.is_file() {
            return Err(Error::BackupNotFound(filename.to_string()));
        }
        let contents = fs::read(&backup_path)?;

        self.backup_current_locked(&mut last_stamp, PRE_ROLLBACK_SUFFIX)?;
        self.replace_current_locked(&contents)?;
        info!("Rolled strategy document back to {}", filename);
        Ok(())
    }
}

/// Backup filenames are bare `*.json` names inside the backup directory.
fn validate_backup_filename(filename: &str) -> Result<()> {
    let valid = filename.len() > JSON_EXTENSION.len()
        && filename.ends_with(JSON_EXTENSION)
        && !filename.contains(['/', '\\', '\0'])
        && !filename.contains("..");
    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidFilename(filename.to_string()).into())
    }
}

fn backup_filename(micros: i64, suffix: &str) -> String {
    let stamp = DateTime::<Utc>::from_timestamp_micros(micros)
        .map(|at| at.format(STAMP_FORMAT).to_string())
        .unwrap_or_else(|| micros.to_string());
    format!("{}{}{}{}", BACKUP_PREFIX, stamp, suffix, JSON_EXTENSION)
}
