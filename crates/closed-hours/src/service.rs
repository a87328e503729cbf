//! The closed-hours surfaces: list, edit, delete, and storefront status.
//!
//! Callers speak local time and a timezone name; the repository only ever
//! sees UTC. Writes go validator → local-to-UTC → repository. Reads go
//! repository → UTC-to-local, and the status check feeds those localized
//! windows to the evaluator together with the shop's current local time.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::codec::{local_now, local_to_utc, parse_timezone, utc_to_local};
use crate::error::{ClosedHoursError, Result};
use crate::evaluate::is_closed;
use crate::model::{ActorId, ClosedInterval, ClosedIntervalCommand, IntervalId, LocalInterval};
use crate::repository::ClosedIntervalRepository;
use crate::storefront::StoreStatus;
use crate::validate::{validate_with, IntervalRule};
use crate::wall_time::WallTime;

pub struct ClosedHoursService<R, C = SystemClock> {
    repository: R,
    clock: C,
    rules: Vec<Box<dyn IntervalRule + Send + Sync>>,
}

impl<R: ClosedIntervalRepository> ClosedHoursService<R> {
    pub fn new(repository: R) -> Self {
        Self::with_clock(repository, SystemClock)
    }
}

impl<R: ClosedIntervalRepository, C: Clock> ClosedHoursService<R, C> {
    pub fn with_clock(repository: R, clock: C) -> Self {
        Self {
            repository,
            clock,
            rules: Vec::new(),
        }
    }

    /// Add a policy check applied to every create and update.
    pub fn with_rule(mut self, rule: impl IntervalRule + Send + Sync + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Active intervals with bounds shown in `timezone`, ordered by id.
    pub fn list(&self, timezone: &str) -> Result<Vec<LocalInterval>> {
        let tz = parse_timezone(timezone)?;
        let records = self.repository.list_active()?;
        debug!(count = records.len(), timezone, "listing closed intervals");
        Ok(localize_all(&records, &tz, self.clock.now()))
    }

    /// One active interval with bounds shown in `timezone`.
    ///
    /// # Errors
    ///
    /// [`ClosedHoursError::NotFound`] when the id is unknown or the interval
    /// has been deleted.
    pub fn get(&self, id: IntervalId, timezone: &str) -> Result<LocalInterval> {
        let tz = parse_timezone(timezone)?;
        let record = self.repository.get_by_id(id)?;
        if record.deleted {
            return Err(ClosedHoursError::NotFound(id));
        }
        Ok(localize(&record, &tz, self.clock.now()))
    }

    /// Validate local input, convert it to UTC, and store a new interval.
    ///
    /// # Errors
    ///
    /// [`ClosedHoursError::Validation`] with every failing field,
    /// [`ClosedHoursError::InvalidTimezone`], or a repository error.
    pub fn create(
        &self,
        command: &ClosedIntervalCommand,
        timezone: &str,
        actor: ActorId,
    ) -> Result<ClosedInterval> {
        let (initial, final_) = self.to_utc_bounds(command, timezone)?;
        let record = self.repository.create(initial, final_, actor)?;
        info!(
            id = %record.id,
            %actor,
            initial_utc = %initial,
            final_utc = %final_,
            "closed interval created"
        );
        Ok(record)
    }

    /// Validate local input, convert it to UTC, and replace an interval's hours.
    pub fn update(
        &self,
        id: IntervalId,
        command: &ClosedIntervalCommand,
        timezone: &str,
        actor: ActorId,
    ) -> Result<ClosedInterval> {
        let (initial, final_) = self.to_utc_bounds(command, timezone)?;
        let record = self.repository.update(id, initial, final_, actor)?;
        info!(
            %id,
            %actor,
            initial_utc = %initial,
            final_utc = %final_,
            "closed interval updated"
        );
        Ok(record)
    }

    pub fn delete(&self, id: IntervalId) -> Result<ClosedInterval> {
        let record = self.repository.soft_delete(id)?;
        info!(%id, "closed interval deleted");
        Ok(record)
    }

    /// Whether the shop is closed right now in `timezone`.
    pub fn status(&self, timezone: &str) -> Result<StoreStatus> {
        let tz = parse_timezone(timezone)?;
        let now = self.clock.now();
        self.status_for(&tz, timezone, local_now(&tz, now), now)
    }

    /// Whether the shop is closed at local `current` in `timezone`.
    pub fn status_at(&self, timezone: &str, current: WallTime) -> Result<StoreStatus> {
        let tz = parse_timezone(timezone)?;
        self.status_for(&tz, timezone, current, self.clock.now())
    }

    /// `now` anchors every window conversion so one evaluation sees a single
    /// UTC offset.
    fn status_for(
        &self,
        tz: &Tz,
        timezone: &str,
        current: WallTime,
        now: DateTime<Utc>,
    ) -> Result<StoreStatus> {
        let records = self.repository.list_active()?;
        let windows = localize_all(&records, tz, now);
        let closed = is_closed(&windows, current);
        debug!(timezone, %current, closed, windows = windows.len(), "evaluated store status");
        Ok(StoreStatus::new(closed, current))
    }

    fn to_utc_bounds(
        &self,
        command: &ClosedIntervalCommand,
        timezone: &str,
    ) -> Result<(WallTime, WallTime)> {
        let rules: Vec<&dyn IntervalRule> = self
            .rules
            .iter()
            .map(|rule| -> &dyn IntervalRule { &**rule })
            .collect();
        let errors = validate_with(&command.initial_hour, &command.final_hour, &rules);
        if !errors.is_empty() {
            debug!(%errors, "rejected closed interval input");
            return Err(ClosedHoursError::Validation(errors));
        }

        let tz = parse_timezone(timezone)?;
        let now = self.clock.now();
        let initial = local_to_utc(command.initial_hour.parse()?, &tz, now);
        let final_ = local_to_utc(command.final_hour.parse()?, &tz, now);
        Ok((initial, final_))
    }
}

fn localize(record: &ClosedInterval, tz: &Tz, now: DateTime<Utc>) -> LocalInterval {
    LocalInterval {
        id: record.id,
        initial_hour: utc_to_local(record.initial_hour, tz, now),
        final_hour: utc_to_local(record.final_hour, tz, now),
    }
}

fn localize_all(records: &[ClosedInterval], tz: &Tz, now: DateTime<Utc>) -> Vec<LocalInterval> {
    records.iter().map(|record| localize(record, tz, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::repository::InMemoryRepository;
    use crate::validate::{IntervalField, RejectEqualBounds};
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    const SAO_PAULO: &str = "America/Sao_Paulo";

    fn t(s: &str) -> WallTime {
        s.parse().unwrap()
    }

    /// Service whose clock reads `hh:mm` UTC on a date with no DST change.
    fn service_at(hour: u32, minute: u32) -> ClosedHoursService<InMemoryRepository, FixedClock> {
        let now = Utc.with_ymd_and_hms(2026, 5, 10, hour, minute, 0).unwrap();
        let repo = InMemoryRepository::with_clock(Arc::new(FixedClock(now)));
        ClosedHoursService::with_clock(repo, FixedClock(now))
    }

    #[test]
    fn test_create_stores_utc() {
        let service = service_at(12, 0);
        let record = service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(7))
            .unwrap();
        // Sao Paulo is UTC-3
        assert_eq!(record.initial_hour, t("01:00"));
        assert_eq!(record.final_hour, t("09:00"));
        assert_eq!(record.created_by, ActorId(7));

        let stored = service.repository().get_by_id(record.id).unwrap();
        assert_eq!(stored.initial_hour, t("01:00"));
    }

    #[test]
    fn test_list_returns_local_hours() {
        let service = service_at(12, 0);
        service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        service
            .create(&ClosedIntervalCommand::new("12:00", "13:00"), SAO_PAULO, ActorId(1))
            .unwrap();

        let listed = service.list(SAO_PAULO).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].initial_hour, t("22:00"));
        assert_eq!(listed[0].final_hour, t("06:00"));
        assert_eq!(listed[1].initial_hour, t("12:00"));

        // Same records seen from Tokyo (UTC+9)
        let tokyo = service.list("Asia/Tokyo").unwrap();
        assert_eq!(tokyo[0].initial_hour, t("10:00"));
        assert_eq!(tokyo[0].final_hour, t("18:00"));
    }

    #[test]
    fn test_create_reports_all_invalid_fields() {
        let service = service_at(12, 0);
        let err = service
            .create(&ClosedIntervalCommand::new("", "24:00"), SAO_PAULO, ActorId(1))
            .unwrap_err();
        match err {
            ClosedHoursError::Validation(errors) => {
                assert!(errors.contains(IntervalField::InitialHour));
                assert!(errors.contains(IntervalField::FinalHour));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(service.list(SAO_PAULO).unwrap().is_empty());
    }

    #[test]
    fn test_create_invalid_timezone_is_hard_error() {
        let service = service_at(12, 0);
        let err = service
            .create(&ClosedIntervalCommand::new("09:00", "10:00"), "Nowhere/City", ActorId(1))
            .unwrap_err();
        assert!(matches!(err, ClosedHoursError::InvalidTimezone(_)));
    }

    #[test]
    fn test_equal_bounds_accepted_unless_rule_added() {
        let service = service_at(12, 0);
        let cmd = ClosedIntervalCommand::new("12:00", "12:00");
        assert!(service.create(&cmd, SAO_PAULO, ActorId(1)).is_ok());

        let strict = service_at(12, 0).with_rule(RejectEqualBounds);
        assert!(matches!(
            strict.create(&cmd, SAO_PAULO, ActorId(1)),
            Err(ClosedHoursError::Validation(_))
        ));
    }

    #[test]
    fn test_update_and_get() {
        let service = service_at(12, 0);
        let record = service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        let cmd = ClosedIntervalCommand::new("23:00", "05:00");
        service.update(record.id, &cmd, SAO_PAULO, ActorId(2)).unwrap();

        let local = service.get(record.id, SAO_PAULO).unwrap();
        assert_eq!(local.initial_hour, t("23:00"));
        assert_eq!(local.final_hour, t("05:00"));

        let stored = service.repository().get_by_id(record.id).unwrap();
        assert_eq!(stored.modified_by, ActorId(2));
        assert_eq!(stored.created_by, ActorId(1));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let service = service_at(12, 0);
        let cmd = ClosedIntervalCommand::new("01:00", "02:00");
        let err = service
            .update(IntervalId(5), &cmd, SAO_PAULO, ActorId(1))
            .unwrap_err();
        assert!(matches!(err, ClosedHoursError::NotFound(IntervalId(5))));
    }

    #[test]
    fn test_get_deleted_is_not_found() {
        let service = service_at(12, 0);
        let record = service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        service.delete(record.id).unwrap();

        let err = service.get(record.id, SAO_PAULO).unwrap_err();
        assert!(matches!(err, ClosedHoursError::NotFound(id) if id == record.id));
        // The record itself is kept, flagged.
        assert!(service.repository().get_by_id(record.id).unwrap().deleted);
    }

    /// Advances one day on every read, starting the day before New York
    /// leaves DST, so a second read would see a different UTC offset.
    struct AdvancingClock {
        start: DateTime<Utc>,
        reads: AtomicI64,
    }

    impl AdvancingClock {
        fn new() -> Self {
            Self {
                start: Utc.with_ymd_and_hms(2026, 10, 31, 16, 0, 0).unwrap(),
                reads: AtomicI64::new(0),
            }
        }

        fn reads(&self) -> i64 {
            self.reads.load(Ordering::SeqCst)
        }
    }

    impl Clock for AdvancingClock {
        fn now(&self) -> DateTime<Utc> {
            let n = self.reads.fetch_add(1, Ordering::SeqCst);
            self.start + Duration::days(n)
        }
    }

    #[test]
    fn test_each_call_reads_the_clock_once() {
        let repo = InMemoryRepository::new();
        repo.create(t("02:00"), t("03:00"), ActorId(1)).unwrap();
        repo.create(t("04:00"), t("05:00"), ActorId(1)).unwrap();
        let clock = Arc::new(AdvancingClock::new());
        let service = ClosedHoursService::with_clock(repo, Arc::clone(&clock));

        // 2026-10-31 is EDT (UTC-4): 02:00 UTC shows as 22:00.
        let listed = service.list("America/New_York").unwrap();
        assert_eq!(clock.reads(), 1);
        assert_eq!(listed[0].initial_hour, t("22:00"));
        assert_eq!(listed[1].initial_hour, t("00:00"));

        // 2026-11-01 16:00 UTC is EST (UTC-5).
        let status = service.status("America/New_York").unwrap();
        assert_eq!(clock.reads(), 2);
        assert_eq!(status.current_time, t("11:00"));
        assert!(!status.closed);

        service.get(IntervalId(1), "America/New_York").unwrap();
        service.status_at("America/New_York", t("21:30")).unwrap();
        assert_eq!(clock.reads(), 4);
    }

    #[test]
    fn test_delete_removes_from_status() {
        // 02:30 UTC is 23:30 in Sao Paulo
        let service = service_at(2, 30);
        let record = service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        assert!(service.status(SAO_PAULO).unwrap().closed);

        service.delete(record.id).unwrap();
        let status = service.status(SAO_PAULO).unwrap();
        assert!(!status.closed);
        assert!(!status.ui.hide_buttons);
        assert!(service.list(SAO_PAULO).unwrap().is_empty());
    }

    #[test]
    fn test_status_uses_local_time() {
        // 13:00 UTC is 10:00 in Sao Paulo
        let service = service_at(13, 0);
        service
            .create(&ClosedIntervalCommand::new("22:00", "06:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        let status = service.status(SAO_PAULO).unwrap();
        assert_eq!(status.current_time, t("10:00"));
        assert!(!status.closed);
    }

    #[test]
    fn test_status_at_boundaries() {
        let service = service_at(12, 0);
        service
            .create(&ClosedIntervalCommand::new("12:00", "13:00"), SAO_PAULO, ActorId(1))
            .unwrap();
        service
            .create(&ClosedIntervalCommand::new("22:00", "02:00"), SAO_PAULO, ActorId(1))
            .unwrap();

        assert!(service.status_at(SAO_PAULO, t("12:30")).unwrap().closed);
        assert!(service.status_at(SAO_PAULO, t("01:00")).unwrap().closed);
        assert!(service.status_at(SAO_PAULO, t("02:00")).unwrap().closed);
        assert!(!service.status_at(SAO_PAULO, t("02:01")).unwrap().closed);
        assert!(!service.status_at(SAO_PAULO, t("15:00")).unwrap().closed);
    }

    #[test]
    fn test_status_without_intervals_is_open() {
        let service = service_at(12, 0);
        let status = service.status(SAO_PAULO).unwrap();
        assert!(!status.closed);
        assert!(!status.ui.show_closed_banner);
    }
}
