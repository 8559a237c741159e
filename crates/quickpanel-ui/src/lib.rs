//! Headless quick panel view.
//!
//! This crate provides:
//! - QuickPanelView, binding a PanelStore to a host text surface
//! - Filtering with loose and transliterated matching
//! - Keyboard, IME and pointer handling
//! - Virtualized row layout and footer hints

pub mod events;
pub mod filter;
pub mod keymap;
pub mod model;
pub mod surface;
pub mod transliterate;
pub mod views;

// Re-export commonly used types
pub use events::{ClickTarget, PanelEvent};
pub use filter::{filter_items, FilterResult};
pub use keymap::{parse_keystroke, primary_modifier, Key, KeyEvent, Modifiers};
pub use model::{ScrollTrigger, ViewState};
pub use surface::{MemorySurface, TextSurface};
#[cfg(feature = "pinyin")]
pub use transliterate::PinyinTransliterator;
pub use transliterate::{default_transliterator, Transliterator};
pub use views::{
    Align, FooterView, KeyHint, PanelFrame, QuickPanelView, RowView, Suffix, VirtualList,
};
