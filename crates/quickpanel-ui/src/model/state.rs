//! UI state model for the quick panel.
//!
//! Everything here is host-independent: focus arithmetic, the search text
//! version counter and the back-navigation history.

use quickpanel_core::PanelOptions;

// =============================================================================
// Scroll Trigger
// =============================================================================

/// What caused the last focus change, which decides how the list scrolls to
/// the focused row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ScrollTrigger {
    /// Panel opened, navigated, or pointer moved: smart alignment.
    #[default]
    Initial,
    /// Keyboard navigation: scroll the minimum distance.
    Keyboard,
    /// Nothing pending.
    None,
}

// =============================================================================
// Search Text
// =============================================================================

/// Search text with a version counter.
///
/// Writers bump the version on change; the list is refiltered for the latest
/// committed version the next time the view reconciles, so a burst of
/// keystrokes costs one filter pass.
#[derive(Debug, Clone, Default)]
pub struct SearchText {
    text: String,
    version: u64,
}

impl SearchText {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text. Returns whether it changed.
    pub fn set(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if text == self.text {
            return false;
        }
        self.text = text;
        self.version += 1;
        true
    }

    pub fn clear(&mut self) -> bool {
        self.set(String::new())
    }
}

// =============================================================================
// History
// =============================================================================

/// Panels left by entering a menu item, most recent last.
#[derive(Debug, Clone, Default)]
pub struct PanelHistory {
    entries: Vec<PanelOptions>,
}

impl PanelHistory {
    pub fn push(&mut self, options: PanelOptions) {
        self.entries.push(options);
    }

    pub fn pop(&mut self) -> Option<PanelOptions> {
        self.entries.pop()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// View State
// =============================================================================

/// Ephemeral state owned by the view while a panel is showing.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub search: SearchText,

    /// Focused index into the filtered list. `None` when nothing is focused.
    pub focus: Option<usize>,

    pub history: PanelHistory,

    /// The primary modifier is currently held.
    pub primary_held: bool,

    /// The pointer has moved inside the panel since the last key navigation.
    /// Row hover only moves focus while this is set.
    pub mouse_over: bool,

    /// An IME composition is in progress.
    pub composing: bool,

    pub scroll_trigger: ScrollTrigger,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Focus after a filter pass: the default index clamped to the list, or
    /// nothing when the list is empty. Pinned rows count.
    pub fn reset_focus(&mut self, len: usize, default_index: usize) {
        self.focus = if len > 0 {
            Some(default_index.min(len - 1))
        } else {
            None
        };
    }

    /// Keep focus inside a list whose membership did not change but whose
    /// length may have.
    pub fn clamp_focus(&mut self, len: usize) {
        self.focus = match self.focus {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    /// Current focus as a signed index, `-1` for none.
    fn position(&self) -> isize {
        self.focus.map_or(-1, |i| i as isize)
    }

    fn set_position(&mut self, len: usize, index: isize) {
        self.focus = if len == 0 {
            None
        } else {
            Some(index.clamp(0, len as isize - 1) as usize)
        };
    }

    /// One row up, wrapping to the last row.
    pub fn focus_prev(&mut self, len: usize) {
        let prev = self.position();
        let next = if prev > 0 { prev - 1 } else { len as isize - 1 };
        self.set_position(len, next);
    }

    /// One row down, wrapping to the first row.
    pub fn focus_next(&mut self, len: usize) {
        let prev = self.position();
        let next = if prev < len as isize - 1 { prev + 1 } else { 0 };
        self.set_position(len, next);
    }

    /// Primary+Up: a page up, or to the last row when already at the top.
    pub fn jump_up(&mut self, len: usize, page: usize) {
        let prev = self.position();
        let next = if prev == 0 {
            len as isize - 1
        } else {
            (prev - page as isize).max(0)
        };
        self.set_position(len, next);
    }

    /// Primary+Down: a page down, or to the first row when already at the
    /// bottom.
    pub fn jump_down(&mut self, len: usize, page: usize) {
        let prev = self.position();
        let next = if prev + 1 == len as isize {
            0
        } else {
            (prev + page as isize).min(len as isize - 1)
        };
        self.set_position(len, next);
    }

    /// PageUp: a page up, stopping at the first row.
    pub fn page_up(&mut self, len: usize, page: usize) {
        let next = (self.position() - page as isize).max(0);
        self.set_position(len, next);
    }

    /// PageDown: a page down, stopping at the last row.
    pub fn page_down(&mut self, len: usize, page: usize) {
        let next = (self.position() + page as isize).min(len as isize - 1);
        self.set_position(len, next);
    }

    /// Reset everything tied to one showing of the panel.
    pub fn reset_session(&mut self) {
        self.history.clear();
        self.scroll_trigger = ScrollTrigger::Initial;
        self.mouse_over = false;
        self.composing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn focused(focus: usize) -> ViewState {
        ViewState {
            focus: Some(focus),
            ..Default::default()
        }
    }

    #[test]
    fn test_search_text_versions() {
        let mut search = SearchText::default();
        assert_eq!(search.version(), 0);

        assert!(search.set("/a"));
        assert!(!search.set("/a"));
        assert_eq!(search.version(), 1);

        assert!(search.clear());
        assert!(search.is_empty());
        assert_eq!(search.version(), 2);
    }

    #[test]
    fn test_reset_focus() {
        let mut state = ViewState::new();
        state.reset_focus(3, 1);
        assert_eq!(state.focus, Some(1));

        state.reset_focus(3, 10);
        assert_eq!(state.focus, Some(2));

        state.reset_focus(1, 0);
        assert_eq!(state.focus, Some(0));

        state.reset_focus(0, 0);
        assert_eq!(state.focus, None);
    }

    #[test]
    fn test_single_step_wraps() {
        let mut state = focused(0);
        state.focus_prev(3);
        assert_eq!(state.focus, Some(2));
        state.focus_next(3);
        assert_eq!(state.focus, Some(0));
        state.focus_next(3);
        assert_eq!(state.focus, Some(1));
    }

    #[test]
    fn test_single_step_from_nothing() {
        let mut state = ViewState::new();
        state.focus_next(3);
        assert_eq!(state.focus, Some(0));

        let mut state = ViewState::new();
        state.focus_prev(3);
        assert_eq!(state.focus, Some(2));

        let mut state = ViewState::new();
        state.focus_next(0);
        assert_eq!(state.focus, None);
    }

    #[test]
    fn test_jumps_wrap_only_at_boundary() {
        let mut state = focused(3);
        state.jump_down(20, 7);
        assert_eq!(state.focus, Some(10));
        state.jump_down(20, 7);
        assert_eq!(state.focus, Some(17));
        state.jump_down(20, 7);
        assert_eq!(state.focus, Some(19));
        state.jump_down(20, 7);
        assert_eq!(state.focus, Some(0));

        state.jump_up(20, 7);
        assert_eq!(state.focus, Some(19));
        state.jump_up(20, 7);
        assert_eq!(state.focus, Some(12));
        state.focus = Some(3);
        state.jump_up(20, 7);
        assert_eq!(state.focus, Some(0));
    }

    #[test]
    fn test_pages_clamp() {
        let mut state = focused(5);
        state.page_down(8, 7);
        assert_eq!(state.focus, Some(7));
        state.page_down(8, 7);
        assert_eq!(state.focus, Some(7));
        state.page_up(8, 7);
        assert_eq!(state.focus, Some(0));
        state.page_up(8, 7);
        assert_eq!(state.focus, Some(0));
    }

    #[test]
    fn test_focus_stays_in_bounds() {
        let len = 5;
        let mut state = focused(2);
        for step in 0..50 {
            match step % 6 {
                0 => state.focus_next(len),
                1 => state.jump_down(len, 7),
                2 => state.page_up(len, 3),
                3 => state.focus_prev(len),
                4 => state.jump_up(len, 2),
                _ => state.page_down(len, 4),
            }
            let focus = state.focus.unwrap();
            assert!(focus < len);
        }
    }

    #[test]
    fn test_clamp_focus() {
        let mut state = focused(4);
        state.clamp_focus(2);
        assert_eq!(state.focus, Some(1));
        state.clamp_focus(0);
        assert_eq!(state.focus, None);
    }
}
