//! Panel options: the configuration installed by each `open`.

use crate::callback::{ActionMode, CallbackOptions, CloseAction, PanelCallback, TriggerInfo};
use crate::config::DEFAULT_PAGE_SIZE;
use crate::item::ListItem;

/// Configuration of one logical panel.
///
/// Opening a panel replaces the previous options wholesale; nothing is merged.
#[derive(Debug, Clone)]
pub struct PanelOptions {
    /// Identifies which logical panel is active (e.g. "/" or "@").
    /// Not necessarily the character that triggered it.
    pub symbol: String,

    pub items: Vec<ListItem>,

    /// Caption shown in the footer.
    pub title: Option<String>,

    /// Focus after each filter pass.
    pub default_index: usize,

    /// Rows per page, also the visible list height.
    pub page_size: usize,

    /// Primary modifier or shift keeps the panel open after a pick.
    pub multiple: bool,

    /// Shift picks add repeated selections.
    pub multiple_repeat: bool,

    pub trigger_info: Option<TriggerInfo>,

    pub on_close: Option<PanelCallback>,
    pub before_action: Option<PanelCallback>,
    pub after_action: Option<PanelCallback>,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            symbol: String::new(),
            items: Vec::new(),
            title: None,
            default_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            multiple: false,
            multiple_repeat: false,
            trigger_info: None,
            on_close: None,
            before_action: None,
            after_action: None,
        }
    }
}

impl PanelOptions {
    /// Create options for `symbol` with the given items and default settings.
    pub fn new(symbol: impl Into<String>, items: Vec<ListItem>) -> Self {
        Self {
            symbol: symbol.into(),
            items,
            ..Default::default()
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn default_index(mut self, index: usize) -> Self {
        self.default_index = index;
        self
    }

    /// Rows per page. Zero is treated as one.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn multiple_repeat(mut self, multiple_repeat: bool) -> Self {
        self.multiple_repeat = multiple_repeat;
        self
    }

    pub fn trigger_info(mut self, trigger_info: TriggerInfo) -> Self {
        self.trigger_info = Some(trigger_info);
        self
    }

    pub fn on_close<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallbackOptions) + Send + Sync + 'static,
    {
        self.on_close = Some(PanelCallback::new(f));
        self
    }

    pub fn before_action<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallbackOptions) + Send + Sync + 'static,
    {
        self.before_action = Some(PanelCallback::new(f));
        self
    }

    pub fn after_action<F>(mut self, f: F) -> Self
    where
        F: Fn(&CallbackOptions) + Send + Sync + 'static,
    {
        self.after_action = Some(PanelCallback::new(f));
        self
    }

    /// Build the record handed to callbacks for this panel.
    pub fn callback_options(
        &self,
        action: Option<CloseAction>,
        item: ListItem,
        search_text: Option<String>,
        multiple: bool,
        mode: ActionMode,
    ) -> CallbackOptions {
        CallbackOptions {
            symbol: self.symbol.clone(),
            action,
            item,
            search_text,
            multiple,
            mode,
            trigger_info: self.trigger_info.clone(),
        }
    }

    /// Find an item by id.
    pub fn item(&self, id: &crate::ItemId) -> Option<&ListItem> {
        self.items.iter().find(|item| &item.id == id)
    }
}
