//! List items shown in the quick panel.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

use crate::callback::{ActionMode, CallbackOptions, PanelCallback};

/// Stable item identifier.
///
/// Store updates look items up by id, so copies of an item handed to
/// callbacks still address the entry in the live list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(pub String);

impl ItemId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A selectable entry in the panel.
///
/// The panel never interprets an item beyond the fields below; `data`
/// carries whatever the host needs to act on a selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListItem {
    /// Stable identifier. Generated when absent from serialized input.
    #[serde(default)]
    pub id: ItemId,

    /// Primary display text.
    pub label: String,

    /// Secondary display text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Extra search corpus, searched ahead of label and description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter_text: Option<String>,

    /// Icon identifier (path, emoji, or named icon).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Trailing text replacing the selection/menu markers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    #[serde(default)]
    pub is_selected: bool,

    /// How many times the item was picked in repeat-selection panels.
    #[serde(default)]
    pub selection_count: u32,

    /// Activating the item opens a nested panel instead of closing.
    #[serde(default)]
    pub is_menu: bool,

    #[serde(default)]
    pub disabled: bool,

    /// Exempt from filtering and pinned to the top of the list.
    #[serde(default)]
    pub always_visible: bool,

    /// Arbitrary data for the host to consume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,

    #[serde(skip)]
    pub action: Option<PanelCallback>,
}

impl ListItem {
    /// Create an item with a fresh id and the given label.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    /// Placeholder item passed to `on_close`.
    pub fn empty() -> Self {
        Self {
            id: ItemId(String::new()),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn filter_text(mut self, filter_text: impl Into<String>) -> Self {
        self.filter_text = Some(filter_text.into());
        self
    }

    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.is_selected = selected;
        if !selected {
            self.selection_count = 0;
        }
        self
    }

    /// Set the repeat-selection counter. A positive count marks the item selected.
    pub fn selection_count(mut self, count: u32) -> Self {
        self.selection_count = count;
        self.is_selected = count > 0;
        self
    }

    pub fn menu(mut self) -> Self {
        self.is_menu = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.always_visible = true;
        self
    }

    pub fn data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the action run when the item is activated.
    pub fn with_action<F>(mut self, action: F) -> Self
    where
        F: Fn(&CallbackOptions) + Send + Sync + 'static,
    {
        self.action = Some(PanelCallback::new(action));
        self
    }

    /// Text searched by the filter: explicit filter text, then label, then description.
    pub fn search_corpus(&self) -> String {
        let mut corpus = String::new();
        if let Some(filter_text) = &self.filter_text {
            corpus.push_str(filter_text);
        }
        corpus.push_str(&self.label);
        if let Some(description) = &self.description {
            corpus.push_str(description);
        }
        corpus
    }

    /// Apply one pick in a repeat-selection panel.
    ///
    /// - `Add`: one more selection
    /// - `Toggle`: selected once, or not at all
    pub fn apply_selection(&mut self, mode: ActionMode) {
        self.selection_count = match mode {
            ActionMode::Add => self.selection_count.saturating_add(1),
            ActionMode::Toggle => {
                if self.selection_count > 0 {
                    0
                } else {
                    1
                }
            }
        };
        self.is_selected = self.selection_count > 0;
    }

    /// Whether the row should be drawn as selected.
    pub fn is_displayed_selected(&self) -> bool {
        self.is_selected || self.selection_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_items_get_distinct_ids() {
        let a = ListItem::new("Alpha");
        let b = ListItem::new("Alpha");
        assert_ne!(a.id, b.id);
        assert_eq!(a.label, "Alpha");
    }

    #[test]
    fn test_search_corpus_order() {
        let item = ListItem::new("GPT-4o")
            .description("fast")
            .filter_text("OpenAI");
        assert_eq!(item.search_corpus(), "OpenAIGPT-4ofast");

        let bare = ListItem::new("Beta");
        assert_eq!(bare.search_corpus(), "Beta");
    }

    #[test]
    fn test_apply_selection_toggle() {
        let mut item = ListItem::new("Alpha");
        item.apply_selection(ActionMode::Toggle);
        assert_eq!(item.selection_count, 1);
        assert!(item.is_selected);

        item.apply_selection(ActionMode::Toggle);
        assert_eq!(item.selection_count, 0);
        assert!(!item.is_selected);
    }

    #[test]
    fn test_apply_selection_add_then_toggle() {
        let mut item = ListItem::new("Alpha");
        item.apply_selection(ActionMode::Add);
        item.apply_selection(ActionMode::Add);
        assert_eq!(item.selection_count, 2);
        assert!(item.is_displayed_selected());

        // Toggle on a repeated selection clears it entirely
        item.apply_selection(ActionMode::Toggle);
        assert_eq!(item.selection_count, 0);
        assert!(!item.is_displayed_selected());
    }

    #[test]
    fn test_selection_builders_keep_invariant() {
        let item = ListItem::new("Alpha").selection_count(3);
        assert!(item.is_selected);

        let item = item.selected(false);
        assert_eq!(item.selection_count, 0);
        assert!(!item.is_displayed_selected());
    }

    #[test]
    fn test_deserialize_generates_id() {
        let json = r#"{"label": "Clear", "always_visible": true}"#;
        let item: ListItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.label, "Clear");
        assert!(item.always_visible);
        assert!(!item.id.as_ref().is_empty());
        assert!(item.action.is_none());
    }

    #[test]
    fn test_empty_placeholder() {
        let item = ListItem::empty();
        assert!(item.id.as_ref().is_empty());
        assert!(item.label.is_empty());
    }
}
