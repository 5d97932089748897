//! Keyboard handling

use super::core::App;
use crate::listener::RefreshRequest;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

impl App {
    /// Main keyboard event handler
    ///
    /// Returns Some(true) to quit, None to keep running
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(true);
        }

        match key.code {
            KeyCode::Char('q') => return Some(true),
            KeyCode::Esc => {
                if self.status_message.take().is_none() {
                    return Some(true);
                }
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Right | KeyCode::Char('l') => self.expand_selected(),
            KeyCode::Left | KeyCode::Char('h') => self.collapse_selected(),
            KeyCode::Enter | KeyCode::Char(' ') => self.activate_selected(),
            KeyCode::Char('r') => self.request(RefreshRequest::All, "Refreshing all contexts"),
            KeyCode::Char('R') => self.request(RefreshRequest::Reload, "Reloading kubeconfig"),
            KeyCode::Char('a') => self.toggle_auto_refresh(),
            _ => {}
        }
        None
    }

    /// Move by `step` rows, skipping separators
    fn move_selection(&mut self, step: isize) {
        let rows = self.rows();
        if rows.is_empty() {
            return;
        }
        let mut index = self.selected_index(&rows);
        loop {
            let Some(next) = index.checked_add_signed(step).filter(|i| *i < rows.len()) else {
                return;
            };
            index = next;
            if !rows[index].separator {
                self.selected = index;
                return;
            }
        }
    }

    fn expand_selected(&mut self) {
        if let Some(row) = self.selected_row() {
            if row.has_children {
                self.expanded.insert(row.id);
            }
        }
    }

    /// Collapse the selected row, or jump to its parent if it is not expanded
    fn collapse_selected(&mut self) {
        let rows = self.rows();
        let index = self.selected_index(&rows);
        let Some(row) = rows.get(index) else {
            return;
        };
        if row.expanded {
            self.expanded.remove(&row.id);
            return;
        }
        if let Some(parent) = rows[..index]
            .iter()
            .rposition(|candidate| candidate.depth + 1 == row.depth)
        {
            self.selected = parent;
        }
    }

    /// Toggle a branch, or click a leaf
    fn activate_selected(&mut self) {
        let Some(row) = self.selected_row() else {
            return;
        };
        if row.has_children {
            if !self.expanded.remove(&row.id) {
                self.expanded.insert(row.id);
            }
            return;
        }
        if !row.enabled {
            return;
        }
        if self.menu.click(row.id) {
            tracing::debug!("Clicked {} (item {})", row.title, row.id);
            self.set_status_message(format!("{} sent", row.title), false);
        } else {
            self.set_status_message(format!("{} is no longer available", row.title), true);
        }
    }
}
