//! Tree node model

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use super::{TreeError, Upsert};
use crate::kube::ContextScope;
use crate::menu::{Menu, MenuHandle};

/// One element of the reconciled tree
///
/// Sibling titles are unique: children are keyed by title. Display order is
/// kept by the menu, which records insertion order.
#[derive(Debug)]
pub struct Node {
    title: String,
    item: MenuHandle,
    children: HashMap<String, Node>,
    scope: Option<ContextScope>,
    updated: bool,
    locked: bool,
    action_initialized: bool,
}

impl Node {
    /// The invisible root; locked, so it is never marked or swept
    pub fn root(menu: &Menu) -> Self {
        Self {
            title: String::new(),
            item: menu.root(),
            children: HashMap::new(),
            scope: None,
            updated: true,
            locked: true,
            action_initialized: false,
        }
    }

    fn child_of(
        parent_item: &MenuHandle,
        parent_scope: &Option<ContextScope>,
        title: &str,
        locked: bool,
    ) -> Self {
        Self {
            title: title.to_string(),
            item: parent_item.add_child(title),
            children: HashMap::new(),
            scope: parent_scope.clone(),
            updated: true,
            locked,
            action_initialized: false,
        }
    }

    /// Create a new child; fails if a child with that title exists
    pub fn add_child(&mut self, title: &str, locked: bool) -> Result<&mut Node, TreeError> {
        if self.children.contains_key(title) {
            return Err(TreeError::DuplicateChild {
                parent: self.title.clone(),
                title: title.to_string(),
            });
        }
        Ok(self.upsert_child(title, locked).into_node())
    }

    /// Touch the child with this title, or create it
    pub(crate) fn upsert_child(&mut self, title: &str, locked: bool) -> Upsert<'_> {
        let item = &self.item;
        let scope = &self.scope;
        match self.children.entry(title.to_string()) {
            Entry::Occupied(entry) => {
                let node = entry.into_mut();
                node.touch();
                Upsert::Touched(node)
            }
            Entry::Vacant(entry) => {
                Upsert::Created(entry.insert(Node::child_of(item, scope, title, locked)))
            }
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn item(&self) -> &MenuHandle {
        &self.item
    }

    pub fn scope(&self) -> Option<&ContextScope> {
        self.scope.as_ref()
    }

    pub(crate) fn set_scope(&mut self, scope: ContextScope) {
        self.scope = Some(scope);
    }

    pub fn is_updated(&self) -> bool {
        self.updated
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_action_initialized(&self) -> bool {
        self.action_initialized
    }

    pub(crate) fn set_action_initialized(&mut self) {
        self.action_initialized = true;
    }

    /// Record that this node was observed in the current pass
    pub fn touch(&mut self) {
        self.updated = true;
    }

    /// Touch this node and every descendant
    pub fn touch_subtree(&mut self) {
        self.updated = true;
        for child in self.children.values_mut() {
            child.touch_subtree();
        }
    }

    pub fn child(&self, title: &str) -> Option<&Node> {
        self.children.get(title)
    }

    pub fn child_mut(&mut self, title: &str) -> Option<&mut Node> {
        self.children.get_mut(title)
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.values()
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.children.values_mut()
    }

    /// Follow a path of titles down from this node
    pub fn descend(&self, path: &[&str]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, title| node.children.get(*title))
    }

    /// Number of direct children
    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes below this one
    pub fn descendant_count(&self) -> usize {
        self.children
            .values()
            .map(|child| 1 + child.descendant_count())
            .sum()
    }

    /// Mark phase: clear `updated` on every unlocked node of this subtree
    pub fn mark_stale(&mut self) {
        if !self.locked {
            self.updated = false;
        }
        for child in self.children.values_mut() {
            child.mark_stale();
        }
    }

    /// Sweep phase: dispose of every stale descendant
    ///
    /// A stale child is removed together with its whole subtree; the rest of
    /// the tree is walked regardless. Returns the number of nodes removed.
    pub fn sweep(&mut self) -> usize {
        let stale: Vec<String> = self
            .children
            .iter()
            .filter(|(_, child)| !child.updated)
            .map(|(title, _)| title.clone())
            .collect();

        let mut removed = 0;
        for title in stale {
            if let Some(child) = self.children.remove(&title) {
                tracing::debug!("Disposing {}", title);
                removed += child.dispose();
            }
        }

        for child in self.children.values_mut() {
            removed += child.sweep();
        }
        removed
    }

    /// Close this node's menu item and every descendant's, ending their
    /// listeners
    fn dispose(self) -> usize {
        let mut count = 1;
        for (_, child) in self.children {
            count += child.dispose();
        }
        self.item.close();
        count
    }
}
