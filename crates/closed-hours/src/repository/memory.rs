use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::{ClosedIntervalRepository, IntervalTable};
use crate::clock::{Clock, SystemClock};
use crate::error::{ClosedHoursError, Result};
use crate::model::{ActorId, ClosedInterval, IntervalId};
use crate::wall_time::WallTime;

/// Process-local repository. Nothing survives a restart.
pub struct InMemoryRepository {
    table: Mutex<IntervalTable>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Stamp audit fields from `clock` instead of the OS clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(IntervalTable::new()),
            clock,
        }
    }

    fn table(&self) -> Result<MutexGuard<'_, IntervalTable>> {
        self.table
            .lock()
            .map_err(|_| ClosedHoursError::Storage("repository lock poisoned".to_string()))
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl ClosedIntervalRepository for InMemoryRepository {
    fn list_active(&self) -> Result<Vec<ClosedInterval>> {
        Ok(self.table()?.list_active())
    }

    fn get_by_id(&self, id: IntervalId) -> Result<ClosedInterval> {
        self.table()?.get(id)
    }

    fn create(
        &self,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        creator: ActorId,
    ) -> Result<ClosedInterval> {
        let now = self.clock.now();
        let record = self
            .table()?
            .create(initial_hour_utc, final_hour_utc, creator, now);
        debug!(id = %record.id, "created closed interval");
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
            .table()?
            .update(id, initial_hour_utc, final_hour_utc, modifier, now)?;
        debug!(%id, "updated closed interval");
        Ok(record)
    }

    fn soft_delete(&self, id: IntervalId) -> Result<ClosedInterval> {
        let record = self.table()?.soft_delete(id)?;
        debug!(%id, "soft-deleted closed interval");
        Ok(record)
    }
}
