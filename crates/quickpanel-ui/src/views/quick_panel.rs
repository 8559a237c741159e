//! Quick panel view - keyboard, pointer and text-surface handling.
//!
//! The view binds one `PanelStore` and one host `TextSurface`. Hosts forward
//! `PanelEvent`s while the panel may be open and draw the `PanelFrame`
//! returned by `frame()`.
//!
//! ## Architecture
//!
//! - The store owns the panel configuration and visibility
//! - The view owns ephemeral state (search text, focus, history, scroll)
//! - The filtered list is derived from the latest store snapshot and the
//!   latest committed search text, refreshed on every event and frame

use std::sync::Arc;

use quickpanel_core::{
    ActionMode, CloseAction, ListItem, PanelSettings, QuickPanelError, TriggerRemoval,
};
use quickpanel_store::{PanelState, PanelStore, StoreBinding};
use tokio::sync::watch;

use crate::events::{ClickTarget, PanelEvent};
use crate::filter::{filter_items, strip_trigger, FilterResult};
use crate::keymap::{primary_modifier, primary_modifier_label, Key, KeyEvent, Modifiers};
use crate::model::{ScrollTrigger, ViewState};
use crate::surface::{text_before, TextSurface};
use crate::transliterate::{default_transliterator, Transliterator};
use crate::views::footer::{FooterContext, FooterView};
use crate::views::row::RowView;
use crate::views::virtual_list::{Align, VirtualList};

// =============================================================================
// Frame
// =============================================================================

/// Everything a host needs to draw the panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelFrame {
    pub visible: bool,
    /// No non-pinned item matched the search; hosts hide the list.
    pub collapsed: bool,
    /// Rows in the visible range (plus overscan).
    pub rows: Vec<RowView>,
    pub list_height: f32,
    pub scroll_offset: f32,
    pub footer: FooterView,
}

/// Work postponed until the host has finished processing the current event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    /// Focus the surface and collapse the caret here.
    RestoreCaret(usize),
}

// =============================================================================
// QuickPanelView
// =============================================================================

pub struct QuickPanelView<S: TextSurface> {
    binding: StoreBinding,
    rx: watch::Receiver<PanelState>,
    /// Latest store state seen by the view.
    snapshot: PanelState,
    surface: S,
    settings: PanelSettings,
    primary: Modifiers,
    transliterator: Option<Box<dyn Transliterator>>,
    state: ViewState,
    filtered: FilterResult,
    /// Search version `filtered` was computed for.
    filtered_version: u64,
    list: VirtualList,
    /// Focus the list was last scrolled for.
    scrolled_focus: Option<usize>,
    deferred: Vec<Deferred>,
}

impl<S: TextSurface> QuickPanelView<S> {
    /// Bind a view to `store`.
    ///
    /// Fails with `AlreadyBound` if another view holds the store.
    pub fn new(
        store: &Arc<PanelStore>,
        surface: S,
        settings: PanelSettings,
    ) -> Result<Self, QuickPanelError> {
        let binding = store.bind()?;
        let mut rx = store.subscribe();
        let snapshot = rx.borrow_and_update().clone();

        let mut view = Self {
            binding,
            rx,
            snapshot,
            surface,
            primary: primary_modifier(settings.primary_modifier),
            list: VirtualList::new(settings.row_height, settings.overscan),
            settings,
            transliterator: default_transliterator(),
            state: ViewState::new(),
            filtered: FilterResult::default(),
            filtered_version: 0,
            scrolled_focus: None,
            deferred: Vec::new(),
        };
        view.refilter(true);
        Ok(view)
    }

    /// Replace the transliterator used for CJK matching.
    pub fn with_transliterator(mut self, transliterator: Option<Box<dyn Transliterator>>) -> Self {
        self.transliterator = transliterator;
        self.refilter(true);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn store(&self) -> &Arc<PanelStore> {
        self.binding.store()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn focus(&self) -> Option<usize> {
        self.state.focus
    }

    pub fn search_text(&self) -> &str {
        self.state.search.as_str()
    }

    pub fn history_len(&self) -> usize {
        self.state.history.len()
    }

    pub fn is_primary_held(&self) -> bool {
        self.state.primary_held
    }

    pub fn is_composing(&self) -> bool {
        self.state.composing
    }

    /// Filtered items in display order.
    pub fn filtered_items(&self) -> Vec<&ListItem> {
        (0..self.filtered.len())
            .filter_map(|i| self.item_at(i))
            .collect()
    }

    pub fn focused_item(&self) -> Option<&ListItem> {
        self.state.focus.and_then(|i| self.item_at(i))
    }

    /// Whether `run_deferred` has work queued.
    pub fn has_deferred(&self) -> bool {
        !self.deferred.is_empty()
    }

    fn item_at(&self, index: usize) -> Option<&ListItem> {
        self.filtered
            .indices
            .get(index)
            .and_then(|&source| self.snapshot.items().get(source))
    }

    /// A menu item is listed or there is a panel to go back to.
    fn can_navigate(&self) -> bool {
        !self.state.history.is_empty()
            || (0..self.filtered.len()).any(|i| self.item_at(i).is_some_and(|item| item.is_menu))
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    /// Catch up with the store and the search text.
    pub fn sync(&mut self) {
        self.reconcile();
        self.sync_scroll();
    }

    fn reconcile(&mut self) {
        self.binding.expire_pending_clear();

        let mut refilter = false;
        let mut reset_focus = false;

        if self.rx.has_changed().unwrap_or(false) {
            let next = self.rx.borrow_and_update().clone();
            let shown = next.visible && !self.snapshot.visible;
            let new_list = next.generation != self.snapshot.generation;
            self.snapshot = next;

            if shown {
                tracing::debug!("Panel '{}' shown", self.snapshot.symbol());
                self.state.reset_session();
                self.state.search.clear();
            }
            if new_list {
                self.list.reset();
                self.scrolled_focus = None;
            }
            refilter = true;
            reset_focus = shown || new_list;
        }

        if self.state.search.version() != self.filtered_version {
            refilter = true;
            reset_focus = true;
        }

        if refilter {
            self.refilter(reset_focus);
        }
    }

    fn refilter(&mut self, reset_focus: bool) {
        self.filtered = filter_items(
            self.snapshot.items(),
            self.state.search.as_str(),
            &self.settings.trigger_chars,
            self.transliterator.as_deref(),
        );
        self.filtered_version = self.state.search.version();

        let len = self.filtered.len();
        if reset_focus {
            self.state.reset_focus(len, self.snapshot.default_index());
        } else {
            self.state.clamp_focus(len);
        }
    }

    /// Size the list and bring a newly focused row into view.
    fn sync_scroll(&mut self) {
        let len = self.filtered.len();
        let height = self.list.list_height(self.snapshot.page_size(), len);
        self.list.update_size(height, len);

        if self.state.focus == self.scrolled_focus {
            return;
        }
        self.scrolled_focus = self.state.focus;

        let Some(index) = self.state.focus else {
            return;
        };
        let align = match self.state.scroll_trigger {
            ScrollTrigger::None => return,
            ScrollTrigger::Keyboard => Align::Auto,
            ScrollTrigger::Initial => Align::Smart,
        };
        self.list.scroll_to_item(index, align, len);
        self.state.scroll_trigger = ScrollTrigger::None;
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Process one host event.
    ///
    /// Returns `true` when the view consumed the event and the host should
    /// not act on it further. Events are ignored while the panel is hidden.
    pub fn handle_event(&mut self, event: PanelEvent) -> bool {
        self.reconcile();
        if !self.snapshot.visible {
            return false;
        }

        let handled = match event {
            PanelEvent::KeyDown(key) => self.on_key_down(key),
            PanelEvent::KeyUp(key) => {
                if !key.modifiers.intersects(self.primary) {
                    self.state.primary_held = false;
                }
                false
            }
            PanelEvent::TextChanged => {
                self.on_text_changed();
                false
            }
            PanelEvent::CompositionUpdate => {
                self.state.composing = true;
                false
            }
            PanelEvent::CompositionEnd => {
                self.state.composing = false;
                self.on_text_changed();
                false
            }
            PanelEvent::PointerMoved => {
                self.state.mouse_over = true;
                self.state.scroll_trigger = ScrollTrigger::Initial;
                false
            }
            PanelEvent::RowHovered(index) => {
                if self.state.mouse_over && index < self.filtered.len() {
                    self.state.focus = Some(index);
                }
                false
            }
            PanelEvent::RowClicked { index, modifiers } => {
                self.handle_item_action(index, CloseAction::Click, modifiers);
                true
            }
            PanelEvent::Clicked(ClickTarget::Outside) => {
                self.handle_close(Some(CloseAction::OutsideClick));
                false
            }
            PanelEvent::Clicked(ClickTarget::Panel | ClickTarget::InputSurface) => false,
        };

        self.sync();
        handled
    }

    fn on_key_down(&mut self, event: KeyEvent) -> bool {
        if event.modifiers.intersects(self.primary) {
            self.state.primary_held = true;
        }
        let held = self.state.primary_held;
        let len = self.filtered.len();
        let page = self.snapshot.page_size();

        match event.key {
            Key::Up | Key::Down | Key::PageUp | Key::PageDown | Key::Escape => {
                self.state.mouse_over = false;
            }
            Key::Left | Key::Right if held => self.state.mouse_over = false,
            _ => {}
        }

        match event.key {
            Key::Up => {
                self.state.scroll_trigger = ScrollTrigger::Keyboard;
                if held {
                    self.state.jump_up(len, page);
                } else {
                    self.state.focus_prev(len);
                }
                true
            }
            Key::Down => {
                self.state.scroll_trigger = ScrollTrigger::Keyboard;
                if held {
                    self.state.jump_down(len, page);
                } else {
                    self.state.focus_next(len);
                }
                true
            }
            Key::PageUp => {
                self.state.scroll_trigger = ScrollTrigger::Keyboard;
                self.state.page_up(len, page);
                true
            }
            Key::PageDown => {
                self.state.scroll_trigger = ScrollTrigger::Keyboard;
                self.state.page_down(len, page);
                true
            }
            Key::Left => {
                if !held || self.state.history.is_empty() {
                    return held;
                }
                self.state.scroll_trigger = ScrollTrigger::Initial;
                self.clear_search_text(false);
                if let Some(previous) = self.state.history.pop() {
                    tracing::debug!("Navigating back to panel '{}'", previous.symbol);
                    self.binding.open(previous);
                }
                true
            }
            Key::Right => {
                if !held {
                    return false;
                }
                let Some(index) = self
                    .state
                    .focus
                    .filter(|&i| self.item_at(i).is_some_and(|item| item.is_menu))
                else {
                    return true;
                };
                self.state.scroll_trigger = ScrollTrigger::Initial;
                self.handle_item_action(index, CloseAction::Enter, Modifiers::empty());
                true
            }
            Key::Enter | Key::NumpadEnter => {
                if self.state.composing {
                    return false;
                }
                match self.state.focus.filter(|&i| i < len) {
                    Some(index) => {
                        self.state.mouse_over = false;
                        self.handle_item_action(index, CloseAction::Enter, event.modifiers);
                        true
                    }
                    None => {
                        self.handle_close(Some(CloseAction::EnterEmpty));
                        false
                    }
                }
            }
            Key::Escape => {
                self.handle_close(Some(CloseAction::Esc));
                true
            }
            Key::Char(_) | Key::Other(_) => false,
        }
    }

    /// Take the search text from the last trigger before the caret.
    fn on_text_changed(&mut self) {
        if self.state.composing {
            return;
        }
        let (text, caret) = match self.read_surface() {
            Some(read) => read,
            None => return,
        };
        let before = text_before(&text, caret);

        let trigger_at = before
            .char_indices()
            .rev()
            .find(|&(_, c)| self.settings.is_trigger(c))
            .map(|(i, _)| i);

        match trigger_at {
            Some(start) => {
                self.state.search.set(&before[start..]);
            }
            None => self.handle_close(Some(CloseAction::DeleteSymbol)),
        }
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Invoke the item at `index` in the filtered list.
    fn handle_item_action(&mut self, index: usize, action: CloseAction, modifiers: Modifiers) {
        let Some(item) = self.item_at(index).cloned() else {
            return;
        };
        if item.disabled {
            tracing::debug!("Ignoring action on disabled item '{}'", item.label);
            return;
        }

        let shift = modifiers.contains(Modifiers::SHIFT);
        let held = self.state.primary_held || modifiers.intersects(self.primary);
        let mode = if shift {
            ActionMode::Add
        } else {
            ActionMode::Toggle
        };

        let options = self.snapshot.options.clone();
        let callback_options = options.callback_options(
            Some(action.clone()),
            item.clone(),
            Some(self.state.search.as_str().to_string()),
            held,
            mode,
        );

        if let Some(before_action) = &options.before_action {
            before_action.call(&callback_options);
        }
        if let Some(item_action) = &item.action {
            item_action.call(&callback_options);
        }
        if let Some(after_action) = &options.after_action {
            after_action.call(&callback_options);
        }

        if item.is_menu {
            let mut previous = options;
            previous.default_index = self.state.focus.unwrap_or(0);
            self.state.history.push(previous);
            tracing::debug!("Entered menu '{}'", item.label);
            self.clear_search_text(false);
            return;
        }

        if options.multiple && (held || shift) {
            return;
        }

        self.handle_close(Some(action));
    }

    fn handle_close(&mut self, action: Option<CloseAction>) {
        let search_text = self.state.search.as_str().to_string();
        let search_text = (!search_text.is_empty()).then_some(search_text);

        self.binding.store().close(action.clone(), search_text);
        self.state.history.clear();
        self.state.scroll_trigger = ScrollTrigger::Initial;

        match action {
            None | Some(CloseAction::DeleteSymbol) => {}
            Some(action) if action.keeps_host_text() => {}
            Some(_) => self.clear_search_text(true),
        }
    }

    /// Remove the search text (and the trigger with `include_symbol`) that
    /// ends at the caret, then reset the search.
    fn clear_search_text(&mut self, include_symbol: bool) {
        let Some((text, caret)) = self.read_surface() else {
            return;
        };
        let before = text_before(&text, caret);
        let triggers = &self.settings.trigger_chars;

        let mut search = self.state.search.as_str().to_string();
        if search.is_empty() {
            // Trigger typed but nothing searched yet
            if let Some(prev) = before.chars().next_back().filter(|c| triggers.contains(c)) {
                search = prev.to_string();
            }
        }

        let target = if include_symbol {
            search.as_str()
        } else {
            strip_trigger(&search, triggers)
        };
        if target.is_empty() {
            return;
        }

        let start = match self.settings.trigger_removal {
            TriggerRemoval::SuffixAnchored => suffix_start(before, target),
            TriggerRemoval::WhitespaceBounded => word_start(before, triggers, include_symbol),
        }
        .filter(|&start| start < before.len());

        if let Some(start) = start {
            let mut new_text = String::with_capacity(text.len());
            new_text.push_str(&text[..start]);
            new_text.push_str(&text[before.len()..]);
            let new_caret = text[..start].chars().count();

            match self.surface.set_text(&new_text) {
                Ok(()) => self.deferred.push(Deferred::RestoreCaret(new_caret)),
                Err(e) => tracing::debug!("Could not update host text: {}", e),
            }
        }

        self.state.search.clear();
    }

    /// Apply caret and focus restores queued by the last events.
    ///
    /// Hosts call this once their own handling of the event is done.
    pub fn run_deferred(&mut self) {
        for effect in std::mem::take(&mut self.deferred) {
            match effect {
                Deferred::RestoreCaret(caret) => {
                    let restored = self
                        .surface
                        .focus()
                        .and_then(|()| self.surface.set_caret(caret));
                    if let Err(e) = restored {
                        tracing::debug!("Could not restore caret: {}", e);
                    }
                }
            }
        }
    }

    fn read_surface(&self) -> Option<(String, usize)> {
        let read = self
            .surface
            .text()
            .and_then(|text| self.surface.caret().map(|caret| (text, caret)));
        match read {
            Ok(read) => Some(read),
            Err(e) => {
                tracing::debug!("Text surface unavailable: {}", e);
                None
            }
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Build the frame for a panel `width` pixels wide.
    pub fn frame(&mut self, width: f32) -> PanelFrame {
        self.sync();

        let len = self.filtered.len();
        let rows = self
            .list
            .visible_range(len)
            .filter_map(|i| {
                let item = self.item_at(i)?;
                Some(RowView::new(
                    i,
                    item,
                    self.state.focus == Some(i),
                    self.list.row_offset(i),
                ))
            })
            .collect();

        let footer = FooterView::build(FooterContext {
            title: self.snapshot.title(),
            width,
            wide_min_width: self.settings.wide_footer_min_width,
            modifier_label: primary_modifier_label(self.primary),
            primary_held: self.state.primary_held,
            can_navigate: self.can_navigate(),
            multiple: self.snapshot.multiple(),
            multiple_repeat: self.snapshot.multiple_repeat(),
        });

        PanelFrame {
            visible: self.snapshot.visible,
            collapsed: !self.filtered.has_matches,
            rows,
            list_height: self.list.height_px(),
            scroll_offset: self.list.scroll_offset_px(),
            footer,
        }
    }
}

/// Byte start of `target` when `before` ends with it.
fn suffix_start(before: &str, target: &str) -> Option<usize> {
    before
        .ends_with(target)
        .then(|| before.len() - target.len())
}

/// Byte start of the trigger word ending at the caret: the last trigger that
/// begins the text or follows whitespace. Keeps the trigger itself unless
/// `include_symbol`.
fn word_start(before: &str, triggers: &[char], include_symbol: bool) -> Option<usize> {
    let (index, trigger) = before
        .char_indices()
        .rev()
        .find(|(_, c)| triggers.contains(c))?;

    let starts_word = before[..index]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    if !starts_word {
        return None;
    }

    Some(if include_symbol {
        index
    } else {
        index + trigger.len_utf8()
    })
}
