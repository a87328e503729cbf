use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fs4::fs_std::FileExt;
use tempfile::NamedTempFile;
use tracing::debug;

use super::{ClosedIntervalRepository, IntervalTable};
use crate::clock::{Clock, SystemClock};
use crate::error::{ClosedHoursError, Result};
use crate::model::{ActorId, ClosedInterval, IntervalId};
use crate::wall_time::WallTime;

/// Repository backed by a single JSON document.
///
/// Every call re-reads the file. Mutations hold an exclusive advisory lock on
/// a sidecar `<file>.lock` for the whole read-modify-write cycle and replace
/// the document through a uniquely named temporary file, so handles in other
/// threads or processes neither lose writes nor reuse ids. A missing file is
/// an empty repository.
pub struct JsonFileRepository {
    path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IntervalTable> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(IntervalTable::new()),
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                ClosedHoursError::Storage(format!("'{}': {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(IntervalTable::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn save(&self, table: &IntervalTable) -> Result<()> {
        let json = serde_json::to_string_pretty(table)
            .map_err(|e| ClosedHoursError::Storage(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(self.dir()).map_err(|e| self.io_error(e))?;
        tmp.write_all(json.as_bytes()).map_err(|e| self.io_error(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_error(e))?;
        tmp.persist(&self.path).map_err(|e| self.io_error(e.error))?;
        Ok(())
    }

    /// Directory holding the document; created on first write.
    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    fn lock_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| OsString::from("closed-hours"));
        name.push(".lock");
        self.dir().join(name)
    }

    /// Open the sidecar lock file and block until the exclusive lock is held.
    /// The lock is released when the returned handle is dropped.
    fn acquire_lock(&self) -> Result<File> {
        fs::create_dir_all(self.dir()).map_err(|e| self.io_error(e))?;
        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(self.lock_path())
            .map_err(|e| self.io_error(e))?;
        FileExt::lock_exclusive(&lock).map_err(|e| self.io_error(e))?;
        Ok(lock)
    }

    /// Run `f` against the stored table and persist the result.
    fn modify<T>(&self, f: impl FnOnce(&mut IntervalTable) -> Result<T>) -> Result<T> {
        let _lock = self.acquire_lock()?;
        let mut table = self.load()?;
        let out = f(&mut table)?;
        self.save(&table)?;
        Ok(out)
    }

    fn io_error(&self, e: std::io::Error) -> ClosedHoursError {
        ClosedHoursError::Storage(format!("'{}': {}", self.path.display(), e))
    }
}

impl ClosedIntervalRepository for JsonFileRepository {
    fn list_active(&self) -> Result<Vec<ClosedInterval>> {
        Ok(self.load()?.list_active())
    }

    fn get_by_id(&self, id: IntervalId) -> Result<ClosedInterval> {
        self.load()?.get(id)
    }

    fn create(
        &self,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        creator: ActorId,
    ) -> Result<ClosedInterval> {
        let now = self.clock.now();
        let record = self.modify(|table| {
            Ok(table.create(initial_hour_utc, final_hour_utc, creator, now))
        })?;
        debug!(id = %record.id, path = %self.path.display(), "created closed interval");
        Ok(record)
    }

    fn update(
        &self,
        id: IntervalId,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        modifier: ActorId,
    ) -> Result<ClosedInterval> {
        let now = self.clock.now();
        let record = self
            .modify(|table| table.update(id, initial_hour_utc, final_hour_utc, modifier, now))?;
        debug!(%id, path = %self.path.display(), "updated closed interval");
        Ok(record)
    }

    fn soft_delete(&self, id: IntervalId) -> Result<ClosedInterval> {
        let record = self.modify(|table| table.soft_delete(id))?;
        debug!(%id, path = %self.path.display(), "soft-deleted closed interval");
        Ok(record)
    }
}
