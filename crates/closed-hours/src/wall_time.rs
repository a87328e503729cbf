//! `HH:MM` wall-clock values.
//!
//! A [`WallTime`] is a minute of the day in `[0, 1439]` with no date or zone
//! attached. Parsing is strict: exactly two hour digits, a colon, and two
//! minute digits, hours in `00..=23` and minutes in `00..=59`.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ClosedHoursError;

/// Minutes in a day.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

/// A time of day with minute precision, displayed as zero-padded `HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WallTime(u16);

impl WallTime {
    pub const MIDNIGHT: WallTime = WallTime(0);
    pub const LAST_MINUTE: WallTime = WallTime(MINUTES_PER_DAY - 1);

    /// Build from hour and minute components.
    pub fn new(hour: u8, minute: u8) -> Result<Self, ClosedHoursError> {
        if hour > 23 || minute > 59 {
            return Err(ClosedHoursError::InvalidTimeFormat(format!(
                "'{hour:02}:{minute:02}': hour must be 00-23 and minute 00-59"
            )));
        }
        Ok(WallTime(hour as u16 * 60 + minute as u16))
    }

    /// Build from a minute of the day.
    pub fn from_minute_of_day(minute: u16) -> Result<Self, ClosedHoursError> {
        if minute >= MINUTES_PER_DAY {
            return Err(ClosedHoursError::InvalidTimeFormat(format!(
                "minute of day {minute} is outside 0-1439"
            )));
        }
        Ok(WallTime(minute))
    }

    /// Minutes since midnight, in `[0, 1439]`.
    pub fn minute_of_day(self) -> u16 {
        self.0
    }

    pub fn hour(self) -> u8 {
        (self.0 / 60) as u8
    }

    pub fn minute(self) -> u8 {
        (self.0 % 60) as u8
    }

    /// Truncate a chrono time of day to minute precision.
    pub fn from_naive(time: NaiveTime) -> Self {
        WallTime((time.hour() * 60 + time.minute()) as u16)
    }

    pub fn to_naive(self) -> NaiveTime {
        // hour/minute are range-checked at construction, so this always succeeds
        NaiveTime::from_hms_opt(self.hour() as u32, self.minute() as u32, 0)
            .unwrap_or(NaiveTime::MIN)
    }
}

/// Whether `s` is a well-formed `HH:MM` value.
pub fn is_valid_time_format(s: &str) -> bool {
    s.parse::<WallTime>().is_ok()
}

impl FromStr for WallTime {
    type Err = ClosedHoursError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ClosedHoursError::InvalidTimeFormat(format!("'{s}': expected HH:MM"));

        let bytes = s.as_bytes();
        if bytes.len() != 5 || bytes[2] != b':' {
            return Err(invalid());
        }
        let digits = [bytes[0], bytes[1], bytes[3], bytes[4]];
        if !digits.iter().all(u8::is_ascii_digit) {
            return Err(invalid());
        }
        let hour = (digits[0] - b'0') * 10 + (digits[1] - b'0');
        let minute = (digits[2] - b'0') * 10 + (digits[3] - b'0');
        WallTime::new(hour, minute)
    }
}

impl fmt::Display for WallTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Serialize for WallTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for WallTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
