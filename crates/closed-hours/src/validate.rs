//! Field-level validation of raw closed-interval input.
//!
//! Validation never fails: it returns a [`ValidationErrors`] map with one
//! entry per bad field, so a form can show every problem at once. Ordering
//! between the two bounds is not checked (a window may run across midnight)
//! and neither is overlap with other records. Callers who want a stricter
//! policy add [`IntervalRule`]s through [`validate_with`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::wall_time::WallTime;

/// The input fields of a closed interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntervalField {
    InitialHour,
    FinalHour,
}

impl IntervalField {
    pub fn as_str(self) -> &'static str {
        match self {
            IntervalField::InitialHour => "initialHour",
            IntervalField::FinalHour => "finalHour",
        }
    }
}

impl fmt::Display for IntervalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name → human-readable message. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<IntervalField, String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: IntervalField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: IntervalField) -> bool {
        self.0.contains_key(&field)
    }

    /// Record a message for `field`. The first message for a field wins.
    pub fn insert(&mut self, field: IntervalField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = (IntervalField, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(field, msg)| format!("{field}: {msg}"))
            .collect();
        f.write_str(&parts.join(", "))
    }
}

/// A policy check over a syntactically valid pair of bounds.
pub trait IntervalRule {
    /// Return the offending field and a message, or `None` if the pair passes.
    fn check(&self, initial: WallTime, final_: WallTime) -> Option<(IntervalField, String)>;
}

/// Rejects windows whose start and end are the same minute.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectEqualBounds;

impl IntervalRule for RejectEqualBounds {
    fn check(&self, initial: WallTime, final_: WallTime) -> Option<(IntervalField, String)> {
        (initial == final_).then(|| {
            (
                IntervalField::FinalHour,
                "Final hour must differ from initial hour".to_string(),
            )
        })
    }
}

/// Check both bounds for `HH:MM` format. Accepts equal and wrapping bounds.
pub fn validate(initial_hour: &str, final_hour: &str) -> ValidationErrors {
    validate_with(initial_hour, final_hour, &[])
}

/// [`validate`] plus extra rules, which only run when both fields parse.
pub fn validate_with(
    initial_hour: &str,
    final_hour: &str,
    rules: &[&dyn IntervalRule],
) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    let initial = initial_hour.parse::<WallTime>().ok();
    if initial.is_none() {
        errors.insert(IntervalField::InitialHour, "Invalid initial hour");
    }

    let final_ = final_hour.parse::<WallTime>().ok();
    if final_.is_none() {
        errors.insert(IntervalField::FinalHour, "Invalid final hour");
    }

    if let (Some(initial), Some(final_)) = (initial, final_) {
        for rule in rules {
            if let Some((field, message)) = rule.check(initial, final_) {
                errors.insert(field, message);
            }
        }
    }

    errors
}
