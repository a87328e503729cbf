//! What a storefront should render for an open/closed decision.
//!
//! The decision is data. Hiding purchase buttons or showing a banner is left
//! to whatever adapter renders the page.

use serde::Serialize;

use crate::wall_time::WallTime;

/// Presentation flags for the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Hide add-to-cart and checkout controls.
    pub hide_buttons: bool,
    /// Show the disabled "Store is Closed" notice in their place.
    pub show_closed_banner: bool,
}

pub fn decide_ui_state(is_closed: bool) -> UiState {
    UiState {
        hide_buttons: is_closed,
        show_closed_banner: is_closed,
    }
}

/// Result of evaluating a shop at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub closed: bool,
    /// Local wall-clock time the decision was made for.
    pub current_time: WallTime,
    pub ui: UiState,
}

impl StoreStatus {
    pub fn new(closed: bool, current_time: WallTime) -> Self {
        Self {
            closed,
            current_time,
            ui: decide_ui_state(closed),
        }
    }
}
