//! Wall-clock conversion between a named timezone and UTC.
//!
//! Closed hours are stored in UTC but entered and displayed in the shop's
//! local time. The conversion is a *wall-clock* conversion: an `HH:MM` value
//! is placed on "today" in the relevant zone, converted, and reduced back to
//! `HH:MM`. Around a daylight-saving transition the same nominal time can
//! therefore map to a different UTC time from one day to the next. Business
//! hours are defined in local terms, so this is the intended behavior.
//!
//! # Functions
//!
//! - [`to_utc`] / [`to_utc_at`] — local `HH:MM` in a zone → UTC `HH:MM`
//! - [`to_local`] / [`to_local_at`] — UTC `HH:MM` → local `HH:MM` in a zone
//! - [`local_now`] — the current wall-clock time in a zone
//! - [`parse_timezone`] — IANA name → [`Tz`]
//!
//! The `_at` variants take the "now" anchor explicitly. The plain variants
//! read `Utc::now()` on every call and never cache, since the offset in force
//! depends on the date.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{ClosedHoursError, Result};
use crate::wall_time::WallTime;

// ── String surface ──────────────────────────────────────────────────────────

/// Convert a local `HH:MM` in `timezone` to UTC, anchored to today's date in
/// that zone.
///
/// # Errors
///
/// Returns [`ClosedHoursError::InvalidTimeFormat`] if `time` is not a valid
/// `HH:MM`, or [`ClosedHoursError::InvalidTimezone`] if `timezone` is not a
/// known IANA name.
///
/// # Examples
///
/// ```
/// use closed_hours::codec::to_utc;
///
/// // Asia/Tokyo has no DST, so the answer does not depend on today's date.
/// assert_eq!(to_utc("09:00", "Asia/Tokyo").unwrap().to_string(), "00:00");
/// ```
pub fn to_utc(time: &str, timezone: &str) -> Result<WallTime> {
    to_utc_at(time, timezone, Utc::now())
}

/// [`to_utc`] with an explicit "now" anchor.
pub fn to_utc_at(time: &str, timezone: &str, now: DateTime<Utc>) -> Result<WallTime> {
    let time: WallTime = time.parse()?;
    let tz = parse_timezone(timezone)?;
    Ok(local_to_utc(time, &tz, now))
}

/// Convert a UTC `HH:MM` to local time in `timezone`, anchored to today's UTC
/// date.
///
/// # Errors
///
/// Same as [`to_utc`].
///
/// # Examples
///
/// ```
/// use closed_hours::codec::to_local;
///
/// assert_eq!(to_local("00:00", "Asia/Tokyo").unwrap().to_string(), "09:00");
/// ```
pub fn to_local(utc_time: &str, timezone: &str) -> Result<WallTime> {
    to_local_at(utc_time, timezone, Utc::now())
}

/// [`to_local`] with an explicit "now" anchor.
pub fn to_local_at(utc_time: &str, timezone: &str, now: DateTime<Utc>) -> Result<WallTime> {
    let time: WallTime = utc_time.parse()?;
    let tz = parse_timezone(timezone)?;
    Ok(utc_to_local(time, &tz, now))
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| ClosedHoursError::InvalidTimezone(format!("'{}'", s)))
}

// ── Typed surface ───────────────────────────────────────────────────────────

/// Place `time` on the local date of `now` in `tz` and return its UTC time of
/// day.
///
/// A local time that falls in a spring-forward gap is read with the offset in
/// force before the transition, which lands it just past the gap (`02:30` on
/// a US spring-forward day is `03:30` local). A local time that occurs twice
/// on a fall-back day resolves to the earlier instant.
pub fn local_to_utc(time: WallTime, tz: &Tz, now: DateTime<Utc>) -> WallTime {
    let today = now.with_timezone(tz).date_naive();
    let naive = today.and_time(time.to_naive());

    let instant = match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => resolve_gap(&naive, tz),
    };

    WallTime::from_naive(instant.time())
}

/// Place `time` on the UTC date of `now` and return the wall-clock time it
/// shows in `tz`.
pub fn utc_to_local(time: WallTime, tz: &Tz, now: DateTime<Utc>) -> WallTime {
    let naive = now.date_naive().and_time(time.to_naive());
    let local = Utc.from_utc_datetime(&naive).with_timezone(tz);
    WallTime::from_naive(local.time())
}

/// The wall-clock time `now` shows in `tz`.
pub fn local_now(tz: &Tz, now: DateTime<Utc>) -> WallTime {
    WallTime::from_naive(now.with_timezone(tz).time())
}

/// Interpret a nonexistent local time with the offset in force a day earlier.
fn resolve_gap(naive: &NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    let before = tz
        .offset_from_utc_datetime(&(*naive - Duration::days(1)))
        .fix()
        .local_minus_utc();
    Utc.from_utc_datetime(&(*naive - Duration::seconds(before as i64)))
}

// ── Tests ───────────────────────────────────────────────────────────────────
