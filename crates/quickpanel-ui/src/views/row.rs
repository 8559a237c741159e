//! Row view model for one list entry.

use quickpanel_core::{ItemId, ListItem};

/// Trailing decoration of a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suffix {
    /// Host-provided suffix text.
    Custom(String),
    /// Repeated selection badge ("x3"). Only for counts above one.
    Count(u32),
    Check,
    MenuArrow,
    None,
}

impl Suffix {
    /// Pick the suffix for `item`: custom text, then the count badge, then the
    /// check mark, then the menu arrow.
    pub fn for_item(item: &ListItem) -> Self {
        if let Some(suffix) = &item.suffix {
            Suffix::Custom(suffix.clone())
        } else if item.selection_count > 1 {
            Suffix::Count(item.selection_count)
        } else if item.is_displayed_selected() {
            Suffix::Check
        } else if item.is_menu && !item.disabled {
            Suffix::MenuArrow
        } else {
            Suffix::None
        }
    }

    pub fn text(&self) -> Option<String> {
        match self {
            Suffix::Custom(text) => Some(text.clone()),
            Suffix::Count(n) => Some(format!("x{}", n)),
            Suffix::Check => Some("✓".to_string()),
            Suffix::MenuArrow => Some("›".to_string()),
            Suffix::None => None,
        }
    }
}

/// Everything a host needs to draw one row.
#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    /// Position in the filtered list.
    pub index: usize,
    pub id: ItemId,
    pub label: String,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub suffix: Suffix,
    pub focused: bool,
    pub selected: bool,
    pub disabled: bool,
    /// Top edge relative to the list viewport.
    pub offset_y: f32,
}

impl RowView {
    pub fn new(index: usize, item: &ListItem, focused: bool, offset_y: f32) -> Self {
        Self {
            index,
            id: item.id.clone(),
            label: item.label.clone(),
            description: item.description.clone(),
            icon: item.icon.clone(),
            suffix: Suffix::for_item(item),
            focused,
            selected: item.is_displayed_selected(),
            disabled: item.disabled,
            offset_y,
        }
    }
}
