//! Closed-interval records and their localized views.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::wall_time::WallTime;

/// Repository-assigned identifier of a closed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IntervalId(pub u64);

impl fmt::Display for IntervalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The admin user who created or last modified a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(pub u64);

impl ActorId {
    /// Used when the session carries no associated user.
    pub const UNKNOWN: ActorId = ActorId(0);
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A daily window during which the store is closed, as persisted.
///
/// `initial_hour` and `final_hour` are always UTC. A window with
/// `initial_hour > final_hour` runs across midnight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedInterval {
    pub id: IntervalId,
    pub initial_hour: WallTime,
    pub final_hour: WallTime,
    pub created_at: DateTime<Utc>,
    pub created_by: ActorId,
    pub modified_at: DateTime<Utc>,
    pub modified_by: ActorId,
    #[serde(default)]
    pub deleted: bool,
}

/// A closed interval with its bounds converted to a caller's timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalInterval {
    pub id: IntervalId,
    pub initial_hour: WallTime,
    pub final_hour: WallTime,
}

/// Anything with a start and end wall-clock time that the evaluator can test.
pub trait HourWindow {
    fn initial_hour(&self) -> WallTime;
    fn final_hour(&self) -> WallTime;
}

impl HourWindow for LocalInterval {
    fn initial_hour(&self) -> WallTime {
        self.initial_hour
    }

    fn final_hour(&self) -> WallTime {
        self.final_hour
    }
}

impl HourWindow for ClosedInterval {
    fn initial_hour(&self) -> WallTime {
        self.initial_hour
    }

    fn final_hour(&self) -> WallTime {
        self.final_hour
    }
}

impl HourWindow for (WallTime, WallTime) {
    fn initial_hour(&self) -> WallTime {
        self.0
    }

    fn final_hour(&self) -> WallTime {
        self.1
    }
}

/// Raw `{initialHour, finalHour}` input from an admin form, in local time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClosedIntervalCommand {
    #[serde(default)]
    pub initial_hour: String,
    #[serde(default)]
    pub final_hour: String,
}

impl ClosedIntervalCommand {
    pub fn new(initial_hour: impl Into<String>, final_hour: impl Into<String>) -> Self {
        Self {
            initial_hour: initial_hour.into(),
            final_hour: final_hour.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_record_serializes_camel_case() {
        let stamp = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let record = ClosedInterval {
            id: IntervalId(7),
            initial_hour: "01:00".parse().unwrap(),
            final_hour: "09:00".parse().unwrap(),
            created_at: stamp,
            created_by: ActorId(42),
            modified_at: stamp,
            modified_by: ActorId(42),
            deleted: false,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["initialHour"], "01:00");
        assert_eq!(json["finalHour"], "09:00");
        assert_eq!(json["createdBy"], 42);
        assert_eq!(json["deleted"], false);
        assert!(json["modifiedAt"].as_str().unwrap().starts_with("2026-03-01T12:00:00"));

        let back: ClosedInterval = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_command_accepts_missing_fields() {
        let cmd: ClosedIntervalCommand = serde_json::from_str(r#"{"finalHour":"10:00"}"#).unwrap();
        assert_eq!(cmd.initial_hour, "");
        assert_eq!(cmd.final_hour, "10:00");
    }
}
