//! Open/closed evaluation over a set of daily windows.
//!
//! All inputs are wall-clock times in the same zone. Both bounds of a window
//! are inclusive, and a window whose end is before its start runs through
//! midnight. The store is closed if any window contains the current minute.

use crate::error::Result;
use crate::model::{ClosedIntervalCommand, HourWindow};
use crate::wall_time::WallTime;

/// Whether `window` contains `current`, bounds inclusive.
pub fn window_contains<W: HourWindow + ?Sized>(window: &W, current: WallTime) -> bool {
    let initial = window.initial_hour().minute_of_day();
    let final_ = window.final_hour().minute_of_day();
    let current = current.minute_of_day();

    if initial <= final_ {
        initial <= current && current <= final_
    } else {
        current >= initial || current <= final_
    }
}

/// Whether the store is closed at `current`. An empty set means open.
///
/// # Examples
///
/// ```
/// use closed_hours::evaluate::is_closed;
/// use closed_hours::WallTime;
///
/// let night: (WallTime, WallTime) = ("22:00".parse().unwrap(), "06:00".parse().unwrap());
/// assert!(is_closed(&[night], "23:30".parse().unwrap()));
/// assert!(!is_closed(&[night], "10:00".parse().unwrap()));
/// ```
pub fn is_closed<W: HourWindow>(intervals: &[W], current: WallTime) -> bool {
    closing_interval(intervals, current).is_some()
}

/// The first window containing `current`, if any.
pub fn closing_interval<W: HourWindow>(intervals: &[W], current: WallTime) -> Option<&W> {
    intervals.iter().find(|w| window_contains(*w, current))
}

/// [`is_closed`] over raw `HH:MM` strings, as a storefront script holds them.
///
/// # Errors
///
/// Returns [`ClosedHoursError::InvalidTimeFormat`](crate::ClosedHoursError::InvalidTimeFormat)
/// if `current` or any bound is malformed.
pub fn check_store_status(intervals: &[ClosedIntervalCommand], current: &str) -> Result<bool> {
    let current: WallTime = current.parse()?;
    let windows = intervals
        .iter()
        .map(|cmd| -> Result<(WallTime, WallTime)> {
            Ok((cmd.initial_hour.parse()?, cmd.final_hour.parse()?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(is_closed(&windows, current))
}
