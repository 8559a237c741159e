//! Core types for the quick panel.
//!
//! This crate contains shared data structures that are used across all quick panel crates:
//! - List items and their stable identifiers
//! - Panel options and host callbacks
//! - Close actions and trigger provenance
//! - Settings
//! - Error types

mod callback;
mod config;
mod error;
mod item;
mod options;

pub use callback::{
    ActionMode, CallbackOptions, CloseAction, PanelCallback, TriggerInfo, TriggerSource,
};
pub use config::{
    config_dir, settings_path, PanelSettings, PrimaryModifier, TriggerRemoval,
    DEFAULT_CLEAR_DELAY_MS, DEFAULT_PAGE_SIZE, DEFAULT_ROW_HEIGHT,
};
pub use error::{ConfigError, QuickPanelError, SurfaceError, TransliterationError};
pub use item::{ItemId, ListItem};
pub use options::PanelOptions;
