//! Error types for closed-hours operations.

use thiserror::Error;

use crate::model::IntervalId;
use crate::validate::ValidationErrors;

#[derive(Error, Debug)]
pub enum ClosedHoursError {
    #[error("Invalid time format: {0}")]
    InvalidTimeFormat(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Closed interval not found: {0}")]
    NotFound(IntervalId),

    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, ClosedHoursError>;
