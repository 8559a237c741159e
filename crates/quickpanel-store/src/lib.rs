//! Panel state store for the quick panel.
//!
//! This crate provides:
//! - `PanelStore` - the single active panel configuration, observable via `watch`
//! - `PanelState` - the snapshot broadcast to subscribers
//! - `StoreBinding` - guard ensuring one view binds a store at a time

mod state;
mod store;

pub use state::PanelState;
pub use store::{PanelStore, StoreBinding};

// Re-export quickpanel_core types for convenience
pub use quickpanel_core::{
    ActionMode, CallbackOptions, CloseAction, ItemId, ListItem, PanelCallback, PanelOptions,
    QuickPanelError, TriggerInfo, TriggerSource,
};
