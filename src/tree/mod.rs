//! Reconciled menu tree
//!
//! The tree mirrors `root → context → namespace → kind → instance → action`.
//! Each node owns one menu item. Nodes are created through the upsert layer,
//! refreshed by touching their `updated` flag, and removed by the sweep that
//! ends every reconciliation pass.
//!
//! The whole tree sits behind one `RwLock`. Lock guards are never held across
//! an `.await`: listing happens first, then the observed snapshot is applied
//! in a single synchronous write section.

mod node;
mod upsert;

pub use node::Node;
pub use upsert::{CONSOLE_TITLE, REFRESH_TITLE, Upsert};

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::menu::Menu;

/// Structural errors raised by tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("No such namespace: {namespace} (context {context})")]
    NoSuchNamespace { context: String, namespace: String },

    #[error("Child '{title}' already exists under '{parent}'")]
    DuplicateChild { parent: String, title: String },
}

/// Shared handle to the tree and the menu it renders into
#[derive(Clone)]
pub struct Tree {
    root: Arc<RwLock<Node>>,
    menu: Menu,
}

impl Tree {
    pub fn new() -> Self {
        let menu = Menu::new();
        Self {
            root: Arc::new(RwLock::new(Node::root(&menu))),
            menu,
        }
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Node> {
        self.root.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Node> {
        self.root.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark every unlocked node as not yet observed
    pub fn mark(&self) {
        self.write().mark_stale();
    }

    /// Remove every node not observed since the last mark
    ///
    /// Returns the number of nodes removed.
    pub fn sweep(&self) -> usize {
        self.write().sweep()
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
