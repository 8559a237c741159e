//! Observable panel store with a deferred clear.
//!
//! Every mutation broadcasts the new `PanelState`, so subscribers cannot
//! miss a change. Host callbacks (`on_close`, updaters) always run with the
//! lock released, which lets them call back into the store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use parking_lot::{Mutex, RwLock, RwLockReadGuard};
use quickpanel_core::{
    ActionMode, CloseAction, ItemId, ListItem, PanelOptions, QuickPanelError, TriggerInfo,
    DEFAULT_CLEAR_DELAY_MS,
};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::state::PanelState;

// =============================================================================
// PanelStore
// =============================================================================

/// Holds the single active panel configuration and its visibility.
///
/// ## Thread Safety
///
/// Uses `parking_lot::RwLock` for the state (never poisons) and
/// `tokio::sync::watch` for broadcasts. Share it as `Arc<PanelStore>`.
///
/// ## Deferred clear
///
/// `close` hides the panel immediately but keeps the configuration readable
/// for `clear_delay` so exit animations can still draw it. A later `open`
/// aborts the pending clear; a generation check covers a clear that is
/// already running.
///
/// Inside a tokio runtime the clear runs on a timer task. Without one, the
/// deadline is recorded and applied by the first read, `open` or
/// `expire_pending_clear` after it passes.
pub struct PanelStore {
    inner: RwLock<PanelState>,
    tx: watch::Sender<PanelState>,
    rx: watch::Receiver<PanelState>,
    clear_delay: Duration,
    clear_task: Mutex<Option<JoinHandle<()>>>,
    clear_deadline: Mutex<Option<ClearDeadline>>,
    bound: AtomicBool,
}

/// A clear waiting for a read to apply it.
#[derive(Debug, Clone, Copy)]
struct ClearDeadline {
    at: Instant,
    generation: u64,
}

impl PanelStore {
    /// Create an empty, hidden store with the default clear delay.
    pub fn new() -> Self {
        Self::with_clear_delay(Duration::from_millis(DEFAULT_CLEAR_DELAY_MS))
    }

    /// Create an empty, hidden store with a custom clear delay.
    pub fn with_clear_delay(clear_delay: Duration) -> Self {
        let (tx, rx) = watch::channel(PanelState::default());
        Self {
            inner: RwLock::new(PanelState::default()),
            tx,
            rx,
            clear_delay,
            clear_task: Mutex::new(None),
            clear_deadline: Mutex::new(None),
            bound: AtomicBool::new(false),
        }
    }

    // =========================================================================
    // Mutation Methods (all broadcast automatically)
    // =========================================================================

    /// Install `options` and show the panel.
    ///
    /// Cancels any pending clear and replaces the previous configuration
    /// wholesale.
    pub fn open(&self, options: PanelOptions) {
        self.cancel_pending_clear();

        let state = {
            let mut inner = self.inner.write();
            tracing::debug!(
                "Opening panel '{}' with {} items",
                options.symbol,
                options.items.len()
            );
            inner.options = options;
            inner.visible = true;
            inner.generation += 1;
            inner.revision += 1;
            inner.clone()
        };
        let _ = self.tx.send(state);
    }

    /// Hide the panel and notify `on_close`.
    ///
    /// The configuration is cleared after the clear delay unless the panel is
    /// reopened first.
    pub fn close(self: &Arc<Self>, action: Option<CloseAction>, search_text: Option<String>) {
        let (state, on_close, callback_options) = {
            let mut inner = self.inner.write();
            inner.visible = false;
            inner.revision += 1;
            tracing::debug!(
                "Closing panel '{}' (action: {:?})",
                inner.options.symbol,
                action.as_ref().map(CloseAction::as_str)
            );
            let callback_options = inner.options.callback_options(
                action,
                ListItem::empty(),
                search_text,
                false,
                ActionMode::Toggle,
            );
            (
                inner.clone(),
                inner.options.on_close.clone(),
                callback_options,
            )
        };
        let _ = self.tx.send(state);

        if let Some(on_close) = on_close {
            on_close.call(&callback_options);
        }

        self.schedule_clear();
    }

    /// Set an item's selected flag. Deselecting also resets its count.
    ///
    /// Returns `false` if no item has this id.
    pub fn update_item_selection(&self, id: &ItemId, selected: bool) -> bool {
        self.modify_item(id, |item| {
            item.is_selected = selected;
            if !selected {
                item.selection_count = 0;
            }
        })
    }

    /// Replace an item with `updater(item)`.
    ///
    /// The updater runs without the lock held. The id is preserved and a
    /// positive selection count forces the selected flag. Returns `false` if
    /// no item has this id.
    pub fn update_item<F>(&self, id: &ItemId, updater: F) -> bool
    where
        F: FnOnce(ListItem) -> ListItem,
    {
        let Some(current) = self.read().options.item(id).cloned() else {
            tracing::debug!("update_item: no item with id {}", id);
            return false;
        };

        let mut updated = updater(current);
        updated.id = id.clone();
        if updated.selection_count > 0 {
            updated.is_selected = true;
        }

        self.modify_item(id, move |item| *item = updated)
    }

    // =========================================================================
    // Read Methods
    // =========================================================================

    /// Get a snapshot of the current state.
    pub fn snapshot(&self) -> PanelState {
        self.read().clone()
    }

    /// Get a copy of the current options, callbacks included.
    pub fn current_options(&self) -> PanelOptions {
        self.read().options.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.read().visible
    }

    pub fn symbol(&self) -> String {
        self.read().options.symbol.clone()
    }

    pub fn items(&self) -> Vec<ListItem> {
        self.read().options.items.clone()
    }

    pub fn title(&self) -> Option<String> {
        self.read().options.title.clone()
    }

    pub fn default_index(&self) -> usize {
        self.read().options.default_index
    }

    pub fn page_size(&self) -> usize {
        self.read().options.page_size
    }

    pub fn multiple(&self) -> bool {
        self.read().options.multiple
    }

    pub fn multiple_repeat(&self) -> bool {
        self.read().options.multiple_repeat
    }

    pub fn trigger_info(&self) -> Option<TriggerInfo> {
        self.read().options.trigger_info.clone()
    }

    /// Whether the panel is visible and showing `symbol`.
    pub fn is_showing(&self, symbol: &str) -> bool {
        self.read().is_showing(symbol)
    }

    pub fn clear_delay(&self) -> Duration {
        self.clear_delay
    }

    /// Apply a clear whose deadline has passed.
    ///
    /// Only needed when the store is used outside a tokio runtime; views call
    /// it before reading their subscription.
    pub fn expire_pending_clear(&self) {
        let due = {
            let mut deadline = self.clear_deadline.lock();
            match *deadline {
                Some(pending) if Instant::now() >= pending.at => deadline.take(),
                _ => None,
            }
        };
        if let Some(pending) = due {
            self.clear_if_current(pending.generation);
        }
    }

    // =========================================================================
    // Subscription
    // =========================================================================

    /// Subscribe to state changes.
    ///
    /// The receiver sees the current state immediately and all future changes.
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.rx.clone()
    }

    /// Bind a view to this store.
    ///
    /// Only one binding may exist at a time; the binding is released on drop.
    pub fn bind(self: &Arc<Self>) -> Result<StoreBinding, QuickPanelError> {
        if self
            .bound
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::warn!("Refusing second view binding");
            return Err(QuickPanelError::AlreadyBound);
        }
        Ok(StoreBinding {
            store: self.clone(),
        })
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Mutate one item in place and broadcast. The closure runs under the lock.
    fn modify_item<F>(&self, id: &ItemId, f: F) -> bool
    where
        F: FnOnce(&mut ListItem),
    {
        self.expire_pending_clear();
        let state = {
            let mut inner = self.inner.write();
            let Some(item) = inner.options.items.iter_mut().find(|item| &item.id == id) else {
                return false;
            };
            f(item);
            inner.revision += 1;
            inner.clone()
        };
        let _ = self.tx.send(state);
        true
    }

    /// Read the state, applying an expired clear first.
    fn read(&self) -> RwLockReadGuard<'_, PanelState> {
        self.expire_pending_clear();
        self.inner.read()
    }

    fn cancel_pending_clear(&self) {
        if let Some(task) = self.clear_task.lock().take() {
            task.abort();
        }
        self.clear_deadline.lock().take();
    }

    fn schedule_clear(self: &Arc<Self>) {
        self.cancel_pending_clear();
        let generation = self.inner.read().generation;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let store: Weak<Self> = Arc::downgrade(self);
                let delay = self.clear_delay;
                let task = handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    if let Some(store) = store.upgrade() {
                        store.clear_if_current(generation);
                    }
                });
                *self.clear_task.lock() = Some(task);
            }
            Err(_) => {
                tracing::debug!("No tokio runtime, clearing panel on first read after delay");
                *self.clear_deadline.lock() = Some(ClearDeadline {
                    at: Instant::now() + self.clear_delay,
                    generation,
                });
            }
        }
    }

    /// Clear the configuration unless a newer `open` happened.
    fn clear_if_current(&self, generation: u64) {
        let state = {
            let mut inner = self.inner.write();
            if inner.generation != generation || inner.visible {
                tracing::debug!("Skipping stale panel clear");
                return;
            }
            let options = &mut inner.options;
            options.items.clear();
            options.title = None;
            options.symbol.clear();
            options.trigger_info = None;
            options.on_close = None;
            options.before_action = None;
            options.after_action = None;
            inner.generation += 1;
            inner.revision += 1;
            tracing::debug!("Cleared panel configuration");
            inner.clone()
        };
        let _ = self.tx.send(state);
    }
}

impl Default for PanelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for PanelStore {
    fn drop(&mut self) {
        if let Some(task) = self.clear_task.get_mut().take() {
            task.abort();
        }
    }
}

// =============================================================================
// StoreBinding
// =============================================================================

/// Exclusive binding of a view to a store.
pub struct StoreBinding {
    store: Arc<PanelStore>,
}

impl StoreBinding {
    pub fn store(&self) -> &Arc<PanelStore> {
        &self.store
    }
}

impl std::ops::Deref for StoreBinding {
    type Target = PanelStore;

    fn deref(&self) -> &PanelStore {
        &self.store
    }
}

impl Drop for StoreBinding {
    fn drop(&mut self) {
        self.store.bound.store(false, Ordering::Release);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex as PlMutex;
    use quickpanel_core::CallbackOptions;

    fn test_options(symbol: &str, labels: &[&str]) -> PanelOptions {
        PanelOptions::new(symbol, labels.iter().map(|l| ListItem::new(*l)).collect())
    }

    #[test]
    fn test_open_replaces_configuration() {
        let store = PanelStore::new();
        let rx = store.subscribe();

        store.open(
            test_options("/", &["Help", "Clear"])
                .title("Commands")
                .multiple(true),
        );
        assert!(store.is_visible());
        assert_eq!(rx.borrow().items().len(), 2);
        assert!(rx.borrow().is_showing("/"));

        // Second open does not merge
        store.open(test_options("@", &["Claude"]));
        let state = store.snapshot();
        assert_eq!(state.symbol(), "@");
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.title(), None);
        assert!(!state.multiple());
        assert_eq!(state.generation, 2);
    }

    #[test]
    fn test_grace_window_without_runtime() {
        let store = Arc::new(PanelStore::with_clear_delay(Duration::from_millis(20)));
        let mut rx = store.subscribe();
        store.open(test_options("/", &["Help"]).title("Commands"));

        store.close(Some(CloseAction::Esc), None);
        assert!(!store.is_visible());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.title().as_deref(), Some("Commands"));
        let _ = rx.borrow_and_update();

        std::thread::sleep(Duration::from_millis(60));
        assert!(!rx.has_changed().unwrap());
        store.expire_pending_clear();
        assert!(rx.has_changed().unwrap());
        assert!(store.items().is_empty());
        assert_eq!(store.symbol(), "");
    }

    #[test]
    fn test_open_without_runtime_cancels_deadline() {
        let store = Arc::new(PanelStore::with_clear_delay(Duration::from_millis(20)));
        store.open(test_options("/", &["Help"]));
        store.close(Some(CloseAction::Esc), None);
        store.open(test_options("@", &["Claude"]));

        std::thread::sleep(Duration::from_millis(60));
        assert!(store.is_visible());
        assert_eq!(store.symbol(), "@");
        assert_eq!(store.items().len(), 1);
    }

    #[test]
    fn test_close_notifies_on_close() {
        let store = Arc::new(PanelStore::new());
        let seen: Arc<PlMutex<Vec<CallbackOptions>>> = Arc::new(PlMutex::new(Vec::new()));
        let sink = seen.clone();

        store.open(
            test_options("@", &["Claude"])
                .trigger_info(TriggerInfo::button())
                .on_close(move |opts| sink.lock().push(opts.clone())),
        );
        store.close(Some(CloseAction::Esc), Some("@cl".to_string()));

        let seen = seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].symbol, "@");
        assert_eq!(seen[0].action, Some(CloseAction::Esc));
        assert_eq!(seen[0].search_text.as_deref(), Some("@cl"));
        assert!(seen[0].item.label.is_empty());
        assert!(!seen[0].multiple);
        assert_eq!(seen[0].trigger_info, Some(TriggerInfo::button()));
    }

    #[test]
    fn test_on_close_can_reenter_store() {
        let store = Arc::new(PanelStore::new());
        let weak = Arc::downgrade(&store);

        store.open(test_options("/", &["Help"]).on_close(move |_| {
            if let Some(store) = weak.upgrade() {
                // Reading from a callback must not deadlock
                assert!(!store.is_visible());
            }
        }));
        store.close(None, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configuration_readable_during_grace_window() {
        let store = Arc::new(PanelStore::new());
        store.open(test_options("/", &["Help"]).title("Commands"));
        store.close(Some(CloseAction::Enter), None);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!store.is_visible());
        assert_eq!(store.items().len(), 1);
        assert_eq!(store.title().as_deref(), Some("Commands"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(store.items().is_empty());
        assert_eq!(store.title(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_during_grace_window_survives_clear() {
        let store = Arc::new(PanelStore::new());
        store.open(test_options("/", &["Help"]));
        store.close(Some(CloseAction::Esc), None);

        tokio::time::sleep(Duration::from_millis(50)).await;
        store.open(test_options("@", &["Claude", "Gemini"]));
        assert_eq!(store.symbol(), "@");

        // Well past the original deadline
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(store.is_visible());
        assert_eq!(store.symbol(), "@");
        assert_eq!(store.items().len(), 2);
    }

    #[test]
    fn test_stale_clear_is_ignored() {
        let store = PanelStore::new();
        store.open(test_options("/", &["Help"]));
        let stale = store.snapshot().generation;
        store.open(test_options("@", &["Claude"]));
        store.inner.write().visible = false;

        store.clear_if_current(stale);
        assert_eq!(store.symbol(), "@");
    }

    #[test]
    fn test_update_item_selection() {
        let store = PanelStore::new();
        let item = ListItem::new("Claude").selection_count(2);
        let id = item.id.clone();
        store.open(PanelOptions::new("@", vec![item, ListItem::new("Gemini")]));

        assert!(store.update_item_selection(&id, false));
        let items = store.items();
        assert!(!items[0].is_selected);
        assert_eq!(items[0].selection_count, 0);

        assert!(store.update_item_selection(&id, true));
        assert!(store.items()[0].is_selected);

        // Unknown id is a no-op
        assert!(!store.update_item_selection(&ItemId::from("missing"), true));
        assert!(!store.items()[1].is_selected);
    }

    #[test]
    fn test_update_item_preserves_identity_and_fields() {
        let store = PanelStore::new();
        let item = ListItem::new("Claude").description("Anthropic");
        let id = item.id.clone();
        store.open(PanelOptions::new("@", vec![item]));
        let before = store.snapshot().revision;

        let updated = store.update_item(&id, |mut item| {
            item.id = ItemId::from("hijacked");
            item.selection_count += 1;
            item
        });
        assert!(updated);

        let items = store.items();
        assert_eq!(items[0].id, id);
        assert_eq!(items[0].description.as_deref(), Some("Anthropic"));
        assert_eq!(items[0].selection_count, 1);
        assert!(items[0].is_selected);

        // Item updates bump the revision but keep the generation
        let state = store.snapshot();
        assert!(state.revision > before);
        assert_eq!(state.generation, 1);
    }

    #[test]
    fn test_update_item_unknown_id() {
        let store = PanelStore::new();
        store.open(test_options("/", &["Help"]));
        assert!(!store.update_item(&ItemId::from("missing"), |item| item));
    }

    #[test]
    fn test_single_binding() {
        let store = Arc::new(PanelStore::new());
        let binding = store.bind().unwrap();
        assert!(matches!(store.bind(), Err(QuickPanelError::AlreadyBound)));

        drop(binding);
        assert!(store.bind().is_ok());
    }
}
