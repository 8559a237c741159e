//! Snapshot of the store broadcast to subscribers.

use quickpanel_core::{ListItem, PanelOptions, TriggerInfo};

/// Current panel state.
///
/// `generation` changes when the item list is replaced (open, deferred clear);
/// `revision` changes on every mutation. Consumers compare both to decide
/// whether to refilter or just refresh rows.
#[derive(Debug, Clone, Default)]
pub struct PanelState {
    pub visible: bool,
    pub options: PanelOptions,
    pub generation: u64,
    pub revision: u64,
}

impl PanelState {
    pub fn symbol(&self) -> &str {
        &self.options.symbol
    }

    pub fn items(&self) -> &[ListItem] {
        &self.options.items
    }

    pub fn title(&self) -> Option<&str> {
        self.options.title.as_deref()
    }

    pub fn default_index(&self) -> usize {
        self.options.default_index
    }

    pub fn page_size(&self) -> usize {
        self.options.page_size
    }

    pub fn multiple(&self) -> bool {
        self.options.multiple
    }

    pub fn multiple_repeat(&self) -> bool {
        self.options.multiple_repeat
    }

    pub fn trigger_info(&self) -> Option<&TriggerInfo> {
        self.options.trigger_info.as_ref()
    }

    /// Whether the panel is showing `symbol`.
    pub fn is_showing(&self, symbol: &str) -> bool {
        self.visible && self.options.symbol == symbol
    }
}
