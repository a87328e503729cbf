use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ClosedHoursError, Result};
use crate::model::{ActorId, ClosedInterval, IntervalId};
use crate::wall_time::WallTime;

/// The full set of records plus the id counter, shared by the bundled
/// repositories and used as the JSON file layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalTable {
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    closed_intervals: Vec<ClosedInterval>,
}

impl IntervalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list_active(&self) -> Vec<ClosedInterval> {
        let mut active: Vec<ClosedInterval> = self
            .closed_intervals
            .iter()
            .filter(|record| !record.deleted)
            .cloned()
            .collect();
        active.sort_by_key(|record| record.id);
        active
    }

    pub fn get(&self, id: IntervalId) -> Result<ClosedInterval> {
        self.find(id).cloned().ok_or(ClosedHoursError::NotFound(id))
    }

    pub fn create(
        &mut self,
        initial_hour: WallTime,
        final_hour: WallTime,
        creator: ActorId,
        now: DateTime<Utc>,
    ) -> ClosedInterval {
        let id = self.allocate_id();
        let record = ClosedInterval {
            id,
            initial_hour,
            final_hour,
            created_at: now,
            created_by: creator,
            modified_at: now,
            modified_by: creator,
            deleted: false,
        };
        self.closed_intervals.push(record.clone());
        record
    }

    pub fn update(
        &mut self,
        id: IntervalId,
        initial_hour: WallTime,
        final_hour: WallTime,
        modifier: ActorId,
        now: DateTime<Utc>,
    ) -> Result<ClosedInterval> {
        let record = self.find_active_mut(id)?;
        record.initial_hour = initial_hour;
        record.final_hour = final_hour;
        record.modified_at = now;
        record.modified_by = modifier;
        Ok(record.clone())
    }

    pub fn soft_delete(&mut self, id: IntervalId) -> Result<ClosedInterval> {
        let record = self.find_active_mut(id)?;
        record.deleted = true;
        Ok(record.clone())
    }

    fn find(&self, id: IntervalId) -> Option<&ClosedInterval> {
        self.closed_intervals.iter().find(|record| record.id == id)
    }

    fn find_active_mut(&mut self, id: IntervalId) -> Result<&mut ClosedInterval> {
        self.closed_intervals
            .iter_mut()
            .find(|record| record.id == id && !record.deleted)
            .ok_or(ClosedHoursError::NotFound(id))
    }

    /// Ids start at 1 and are never reused, even if the counter was lost.
    fn allocate_id(&mut self) -> IntervalId {
        let highest = self
            .closed_intervals
            .iter()
            .map(|record| record.id.0)
            .max()
            .unwrap_or(0);
        self.next_id = self.next_id.max(highest) + 1;
        IntervalId(self.next_id)
    }
}
