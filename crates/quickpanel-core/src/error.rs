//! Error types for the quick panel.
//!
//! None of these reach the user: the panel degrades to visible-but-inert.
//! They exist so the layers below the view can report what went wrong and
//! the view can log it.

use thiserror::Error;

/// Host text surface errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The text-editing element is not present in the current view.
    #[error("Text surface unavailable")]
    Unavailable,

    /// A caret position beyond the end of the text.
    #[error("Caret {caret} out of range for text of {len} chars")]
    InvalidCaret { caret: usize, len: usize },
}

/// Transliteration errors. The filter treats all of these as a match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransliterationError {
    /// The transliterator does not handle this script.
    #[error("Transliteration unsupported for this text")]
    Unsupported,

    /// The transliteration table failed.
    #[error("Transliteration failed: {0}")]
    Failed(String),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Top-level error for quick panel operations.
#[derive(Debug, Error)]
pub enum QuickPanelError {
    /// A view is already bound to this store.
    #[error("Panel store is already bound to a view")]
    AlreadyBound,

    /// Text surface error.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
}
