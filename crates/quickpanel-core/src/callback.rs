//! Callback-related types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::item::ListItem;

/// Why the panel closed, or which gesture activated an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CloseAction {
    /// Enter on a focused item.
    Enter,
    /// Click on a row.
    Click,
    /// Escape key.
    Esc,
    /// Click outside the panel and the input surface.
    OutsideClick,
    /// Enter with nothing focused.
    EnterEmpty,
    /// The trigger character was deleted from the host text.
    DeleteSymbol,
    /// Host-defined reason.
    Custom(String),
}

impl CloseAction {
    pub fn as_str(&self) -> &str {
        match self {
            CloseAction::Enter => "enter",
            CloseAction::Click => "click",
            CloseAction::Esc => "esc",
            CloseAction::OutsideClick => "outsideclick",
            CloseAction::EnterEmpty => "enter_empty",
            CloseAction::DeleteSymbol => "delete-symbol",
            CloseAction::Custom(s) => s,
        }
    }

    /// Closes that leave the host text untouched.
    pub fn keeps_host_text(&self) -> bool {
        matches!(
            self,
            CloseAction::OutsideClick | CloseAction::Esc | CloseAction::EnterEmpty
        )
    }
}

impl From<&str> for CloseAction {
    fn from(s: &str) -> Self {
        match s {
            "enter" => CloseAction::Enter,
            "click" => CloseAction::Click,
            "esc" => CloseAction::Esc,
            "outsideclick" => CloseAction::OutsideClick,
            "enter_empty" => CloseAction::EnterEmpty,
            "delete-symbol" => CloseAction::DeleteSymbol,
            other => CloseAction::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for CloseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Selection mode for repeat-selection panels.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ActionMode {
    /// Select or deselect.
    #[default]
    Toggle,
    /// Add one more selection (shift held).
    Add,
}

/// How the panel was opened.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TriggerSource {
    /// Trigger character typed in the text surface.
    #[default]
    Input,
    /// Toolbar button.
    Button,
}

/// Provenance record for an open panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriggerInfo {
    pub source: TriggerSource,

    /// Caret position (chars) when the panel was triggered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caret_position: Option<usize>,

    /// Host text when the panel was triggered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_text: Option<String>,
}

impl TriggerInfo {
    pub fn input(caret_position: usize, original_text: impl Into<String>) -> Self {
        Self {
            source: TriggerSource::Input,
            caret_position: Some(caret_position),
            original_text: Some(original_text.into()),
        }
    }

    pub fn button() -> Self {
        Self {
            source: TriggerSource::Button,
            caret_position: None,
            original_text: None,
        }
    }
}

/// Record passed to every host callback.
#[derive(Debug, Clone)]
pub struct CallbackOptions {
    /// Symbol of the active panel.
    pub symbol: String,

    /// Gesture or close reason.
    pub action: Option<CloseAction>,

    /// The activated item; an empty placeholder for `on_close`.
    pub item: ListItem,

    /// Search text at the time of the callback, trigger included.
    pub search_text: Option<String>,

    /// Whether the primary modifier was held.
    pub multiple: bool,

    pub mode: ActionMode,

    pub trigger_info: Option<TriggerInfo>,
}

/// A host callback.
///
/// Callbacks may call back into the store; the store never holds its lock
/// while one runs.
#[derive(Clone)]
pub struct PanelCallback(Arc<dyn Fn(&CallbackOptions) + Send + Sync>);

impl PanelCallback {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&CallbackOptions) + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn call(&self, options: &CallbackOptions) {
        (self.0)(options)
    }
}

impl fmt::Debug for PanelCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PanelCallback(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_close_action_strings() {
        let all = [
            CloseAction::Enter,
            CloseAction::Click,
            CloseAction::Esc,
            CloseAction::OutsideClick,
            CloseAction::EnterEmpty,
            CloseAction::DeleteSymbol,
        ];
        for action in all {
            assert_eq!(CloseAction::from(action.as_str()), action);
        }
        assert_eq!(
            CloseAction::from("navigate"),
            CloseAction::Custom("navigate".to_string())
        );
        assert_eq!(CloseAction::OutsideClick.to_string(), "outsideclick");
    }

    #[test]
    fn test_keeps_host_text() {
        assert!(CloseAction::Esc.keeps_host_text());
        assert!(CloseAction::OutsideClick.keeps_host_text());
        assert!(CloseAction::EnterEmpty.keeps_host_text());
        assert!(!CloseAction::Enter.keeps_host_text());
        assert!(!CloseAction::Click.keeps_host_text());
    }

    #[test]
    fn test_callback_invocation() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let callback = PanelCallback::new(move |opts| {
            assert_eq!(opts.symbol, "@");
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let opts = CallbackOptions {
            symbol: "@".to_string(),
            action: Some(CloseAction::Enter),
            item: ListItem::empty(),
            search_text: None,
            multiple: false,
            mode: ActionMode::Toggle,
            trigger_info: Some(TriggerInfo::button()),
        };
        callback.call(&opts);
        callback.clone().call(&opts);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(format!("{:?}", callback), "PanelCallback(..)");
    }
}
