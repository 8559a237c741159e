//! State model for the quick panel UI.
//!
//! This module contains the view-owned state that drives the panel.
//! All types are host-independent for testability.

mod state;

pub use state::{PanelHistory, ScrollTrigger, SearchText, ViewState};
