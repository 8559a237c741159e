//! Host events fed into the panel view.

use crate::keymap::{KeyEvent, Modifiers};

/// Where a click landed, as resolved by the host's hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// Inside the panel but not on a row (footer, padding).
    Panel,
    /// The originating text surface.
    InputSurface,
    /// Anywhere else.
    Outside,
}

/// An input event forwarded by the host while the panel may be open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelEvent {
    KeyDown(KeyEvent),
    KeyUp(KeyEvent),
    /// Raw text of the surface changed (typing, paste, deletion).
    TextChanged,
    /// IME composition in progress.
    CompositionUpdate,
    /// IME composition committed.
    CompositionEnd,
    /// Pointer moved inside the panel body.
    PointerMoved,
    /// Pointer entered the row at this filtered index.
    RowHovered(usize),
    /// Row at this filtered index was clicked.
    RowClicked { index: usize, modifiers: Modifiers },
    /// Click that did not land on a row.
    Clicked(ClickTarget),
}
