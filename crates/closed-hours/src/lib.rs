//! # closed-hours
//!
//! Recurring daily "closed" windows for a storefront.
//!
//! An operator defines windows in the shop's local time; they are stored in
//! UTC and converted back for display and evaluation. The storefront then asks
//! whether the current local time falls inside any window.
//!
//! ## Modules
//!
//! - [`wall_time`] — the `HH:MM` value type
//! - [`codec`] — wall-clock conversion between an IANA zone and UTC, anchored to today
//! - [`validate`] — field-level input validation with pluggable rules
//! - [`evaluate`] — open/closed decision over a set of windows, midnight-wrapping included
//! - [`storefront`] — presentation flags derived from the decision
//! - [`model`] — records, ids, and commands
//! - [`repository`] — storage contract plus in-memory and JSON-file implementations
//! - [`service`] — the list/edit/delete/status surfaces wired together
//! - [`clock`] — injectable "now"
//! - [`error`] — Error types

pub mod clock;
pub mod codec;
pub mod error;
pub mod evaluate;
pub mod model;
pub mod repository;
pub mod service;
pub mod storefront;
pub mod validate;
pub mod wall_time;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{parse_timezone, to_local, to_local_at, to_utc, to_utc_at};
pub use error::ClosedHoursError;
pub use evaluate::{check_store_status, closing_interval, is_closed};
pub use model::{
    ActorId, ClosedInterval, ClosedIntervalCommand, HourWindow, IntervalId, LocalInterval,
};
pub use repository::{ClosedIntervalRepository, InMemoryRepository, JsonFileRepository};
pub use service::ClosedHoursService;
pub use storefront::{decide_ui_state, StoreStatus, UiState};
pub use validate::{
    validate, validate_with, IntervalField, IntervalRule, RejectEqualBounds, ValidationErrors,
};
pub use wall_time::WallTime;
