//! In-memory menu model
//!
//! This is the UI sink the tree renders into. Every tree node owns one menu
//! item; the TUI (or any other front end) walks the visible items and turns a
//! user selection into a [`Click`] on that item's event source.
//!
//! Each item carries an unbounded click channel. The receiving end can be
//! taken exactly once through [`MenuHandle::events`], which is what makes
//! "at most one listener per item" enforceable. Closing an item drops the
//! sending end, so a listener blocked on the stream wakes up with `None`
//! and exits.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;

/// Identifier of a menu item
pub type ItemId = u64;

/// Identifier of the invisible root item
pub const ROOT_ID: ItemId = 0;

/// A single click signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Click;

/// Stream of clicks for one item; ends when the item is closed
pub type ClickStream = mpsc::UnboundedReceiver<Click>;

struct Item {
    title: String,
    parent: Option<ItemId>,
    children: Vec<ItemId>,
    visible: bool,
    enabled: bool,
    separator: bool,
    clicks_tx: mpsc::UnboundedSender<Click>,
    clicks_rx: Option<ClickStream>,
}

impl Item {
    fn new(title: &str, parent: Option<ItemId>) -> Self {
        let (clicks_tx, clicks_rx) = mpsc::unbounded_channel();
        Self {
            title: title.to_string(),
            parent,
            children: Vec::new(),
            visible: true,
            enabled: true,
            separator: false,
            clicks_tx,
            clicks_rx: Some(clicks_rx),
        }
    }
}

struct MenuState {
    next_id: ItemId,
    items: HashMap<ItemId, Item>,
}

/// Read-only view of a menu item, used for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: ItemId,
    pub title: String,
    pub enabled: bool,
    pub separator: bool,
    pub has_children: bool,
}

/// Thread-safe menu store
#[derive(Clone)]
pub struct Menu {
    inner: Arc<RwLock<MenuState>>,
}

impl Menu {
    pub fn new() -> Self {
        let mut items = HashMap::new();
        items.insert(ROOT_ID, Item::new("", None));
        Self {
            inner: Arc::new(RwLock::new(MenuState {
                next_id: ROOT_ID + 1,
                items,
            })),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, MenuState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, MenuState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Handle to the invisible root item
    pub fn root(&self) -> MenuHandle {
        MenuHandle {
            id: ROOT_ID,
            menu: self.clone(),
        }
    }

    fn insert(&self, parent: ItemId, title: &str, separator: bool) -> ItemId {
        let mut state = self.write();
        let id = state.next_id;
        state.next_id += 1;

        let mut item = Item::new(title, Some(parent));
        if separator {
            item.separator = true;
            item.enabled = false;
        }
        state.items.insert(id, item);
        if let Some(parent) = state.items.get_mut(&parent) {
            parent.children.push(id);
        }
        id
    }

    /// Deliver a click to an item
    ///
    /// Returns false if the item is gone, hidden, disabled, or closed.
    pub fn click(&self, id: ItemId) -> bool {
        let state = self.read();
        match state.items.get(&id) {
            Some(item) if item.visible && item.enabled => item.clicks_tx.send(Click).is_ok(),
            _ => false,
        }
    }

    /// Visible children of an item, in insertion order
    pub fn visible_children(&self, id: ItemId) -> Vec<ItemView> {
        let state = self.read();
        let Some(item) = state.items.get(&id) else {
            return Vec::new();
        };
        item.children
            .iter()
            .filter_map(|child_id| {
                let child = state.items.get(child_id)?;
                if !child.visible {
                    return None;
                }
                Some(ItemView {
                    id: *child_id,
                    title: child.title.clone(),
                    enabled: child.enabled,
                    separator: child.separator,
                    has_children: child
                        .children
                        .iter()
                        .any(|c| state.items.get(c).is_some_and(|i| i.visible && !i.separator)),
                })
            })
            .collect()
    }

    /// Whether an item exists and is currently shown
    pub fn is_visible(&self, id: ItemId) -> bool {
        self.read().items.get(&id).is_some_and(|item| item.visible)
    }

    /// Whether an item is still present in the store
    pub fn contains(&self, id: ItemId) -> bool {
        self.read().items.contains_key(&id)
    }

    /// Title of an item
    pub fn title(&self, id: ItemId) -> Option<String> {
        self.read().items.get(&id).map(|item| item.title.clone())
    }

    /// Indented outline of every visible item, separators omitted
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        let mut pending: Vec<(ItemId, usize)> = self
            .visible_children(ROOT_ID)
            .into_iter()
            .rev()
            .filter(|view| !view.separator)
            .map(|view| (view.id, 0))
            .collect();

        while let Some((id, depth)) = pending.pop() {
            let Some(title) = self.title(id) else {
                continue;
            };
            let children = self.visible_children(id);
            out.push_str(&"  ".repeat(depth));
            out.push_str(&title);
            out.push('\n');
            pending.extend(
                children
                    .into_iter()
                    .rev()
                    .filter(|view| !view.separator)
                    .map(|view| (view.id, depth + 1)),
            );
        }
        out
    }

    /// Number of items in the store, root excluded
    pub fn len(&self) -> usize {
        self.read().items.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Menu {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to one menu item
#[derive(Clone)]
pub struct MenuHandle {
    id: ItemId,
    menu: Menu,
}

impl MenuHandle {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    /// Create a child item and return its handle
    pub fn add_child(&self, title: &str) -> MenuHandle {
        let id = self.menu.insert(self.id, title, false);
        MenuHandle {
            id,
            menu: self.menu.clone(),
        }
    }

    /// Append a disabled, cosmetic separator under this item
    pub fn add_separator(&self) {
        self.menu.insert(self.id, "", true);
    }

    /// Hide the item; its click stream stays open
    pub fn hide(&self) {
        if let Some(item) = self.menu.write().items.get_mut(&self.id) {
            item.visible = false;
        }
    }

    pub fn disable(&self) {
        if let Some(item) = self.menu.write().items.get_mut(&self.id) {
            item.enabled = false;
        }
    }

    /// Take the click stream of this item
    ///
    /// Returns `None` if the stream was already taken or the item is closed.
    pub fn events(&self) -> Option<ClickStream> {
        self.menu
            .write()
            .items
            .get_mut(&self.id)
            .and_then(|item| item.clicks_rx.take())
    }

    /// Hide the item and remove it, with all of its descendants, from the
    /// store. Dropping the stored senders ends every listener bound to them.
    pub fn close(&self) {
        if self.id == ROOT_ID {
            return;
        }
        let mut state = self.menu.write();
        let parent = state.items.get(&self.id).and_then(|item| item.parent);
        if let Some(parent) = parent.and_then(|p| state.items.get_mut(&p)) {
            parent.children.retain(|c| *c != self.id);
        }

        let mut pending = vec![self.id];
        while let Some(id) = pending.pop() {
            if let Some(item) = state.items.remove(&id) {
                pending.extend(item.children);
            }
        }
    }

    pub fn is_visible(&self) -> bool {
        self.menu.is_visible(self.id)
    }

    /// Whether the item has been closed
    pub fn is_closed(&self) -> bool {
        !self.menu.contains(self.id)
    }
}

impl std::fmt::Debug for MenuHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuHandle").field("id", &self.id).finish()
    }
}
