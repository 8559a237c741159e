//! Host text surface abstraction.
//!
//! The panel never touches a concrete widget. Hosts implement `TextSurface`
//! for their input element; every method may report the element missing,
//! in which case the panel skips the text mutation.
//!
//! Caret positions are char indices, not byte offsets.

use quickpanel_core::SurfaceError;

/// Capability interface over the host's text-editing element.
#[cfg_attr(test, mockall::automock)]
pub trait TextSurface {
    /// Current raw text.
    fn text(&self) -> Result<String, SurfaceError>;

    /// Replace the raw text.
    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError>;

    /// Caret position in chars.
    fn caret(&self) -> Result<usize, SurfaceError>;

    /// Move the caret (collapsed selection).
    fn set_caret(&mut self, caret: usize) -> Result<(), SurfaceError>;

    /// Give the element keyboard focus.
    fn focus(&mut self) -> Result<(), SurfaceError>;
}

/// In-memory text surface for scripted hosts and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    text: String,
    caret: usize,
    focused: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// A surface holding `text` with the caret at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.chars().count();
        Self {
            text,
            caret,
            focused: true,
        }
    }

    /// Insert `s` at the caret, as typing would.
    pub fn type_str(&mut self, s: &str) {
        let at = byte_offset(&self.text, self.caret);
        self.text.insert_str(at, s);
        self.caret += s.chars().count();
    }

    /// Delete the char before the caret, as backspace would.
    pub fn backspace(&mut self) {
        if self.caret == 0 {
            return;
        }
        let start = byte_offset(&self.text, self.caret - 1);
        let end = byte_offset(&self.text, self.caret);
        self.text.replace_range(start..end, "");
        self.caret -= 1;
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn blur(&mut self) {
        self.focused = false;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn caret_position(&self) -> usize {
        self.caret
    }
}

impl TextSurface for MemorySurface {
    fn text(&self) -> Result<String, SurfaceError> {
        Ok(self.text.clone())
    }

    fn set_text(&mut self, text: &str) -> Result<(), SurfaceError> {
        self.text = text.to_string();
        self.caret = self.caret.min(self.text.chars().count());
        Ok(())
    }

    fn caret(&self) -> Result<usize, SurfaceError> {
        Ok(self.caret)
    }

    fn set_caret(&mut self, caret: usize) -> Result<(), SurfaceError> {
        let len = self.text.chars().count();
        if caret > len {
            return Err(SurfaceError::InvalidCaret { caret, len });
        }
        self.caret = caret;
        Ok(())
    }

    fn focus(&mut self) -> Result<(), SurfaceError> {
        self.focused = true;
        Ok(())
    }
}

/// Byte offset of the char at `char_index`, clamped to the end of `text`.
pub(crate) fn byte_offset(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// The part of `text` before the caret.
pub(crate) fn text_before(text: &str, caret: usize) -> &str {
    &text[..byte_offset(text, caret)]
}
