//! Storage contract for closed intervals.
//!
//! The core never talks to a storage engine directly; it is handed something
//! that implements [`ClosedIntervalRepository`]. Hours crossing this boundary
//! are always UTC.
//!
//! Two implementations ship with the crate:
//!
//! - [`InMemoryRepository`] — mutex-guarded map, for tests and embedding
//! - [`JsonFileRepository`] — one JSON document on disk, used by the CLI

mod json_file;
mod memory;
mod table;

use std::sync::Arc;

use crate::error::Result;
use crate::model::{ActorId, ClosedInterval, IntervalId};
use crate::wall_time::WallTime;

pub use json_file::JsonFileRepository;
pub use memory::InMemoryRepository;
pub(crate) use table::IntervalTable;

/// Persistence operations the core relies on.
///
/// A read that follows a write on the same repository must observe it.
pub trait ClosedIntervalRepository: Send + Sync {
    /// Records not soft-deleted, ordered by id.
    fn list_active(&self) -> Result<Vec<ClosedInterval>>;

    /// Any record with this id, soft-deleted ones included.
    fn get_by_id(&self, id: IntervalId) -> Result<ClosedInterval>;

    /// Store a new record; both audit pairs are stamped with `creator`.
    fn create(
        &self,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        creator: ActorId,
    ) -> Result<ClosedInterval>;

    /// Replace the hours of an active record and refresh the modifier pair.
    fn update(
        &self,
        id: IntervalId,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        modifier: ActorId,
    ) -> Result<ClosedInterval>;

    /// Flag an active record as deleted. Hours and audit fields are untouched.
    fn soft_delete(&self, id: IntervalId) -> Result<ClosedInterval>;
}

impl<R: ClosedIntervalRepository + ?Sized> ClosedIntervalRepository for Arc<R> {
    fn list_active(&self) -> Result<Vec<ClosedInterval>> {
        (**self).list_active()
    }

    fn get_by_id(&self, id: IntervalId) -> Result<ClosedInterval> {
        (**self).get_by_id(id)
    }

    fn create(
        &self,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        creator: ActorId,
    ) -> Result<ClosedInterval> {
        (**self).create(initial_hour_utc, final_hour_utc, creator)
    }

    fn update(
        &self,
        id: IntervalId,
        initial_hour_utc: WallTime,
        final_hour_utc: WallTime,
        modifier: ActorId,
    ) -> Result<ClosedInterval> {
        (**self).update(id, initial_hour_utc, final_hour_utc, modifier)
    }

    fn soft_delete(&self, id: IntervalId) -> Result<ClosedInterval> {
        (**self).soft_delete(id)
    }
}
