//! Core application state

use std::collections::HashSet;
use tokio::sync::mpsc;

use crate::config::{Config, ConfigLoader};
use crate::listener::RefreshRequest;
use crate::menu::{ItemId, Menu, ROOT_ID};
use crate::reconcile::AutoRefresh;
use crate::tui::Theme;

/// One visible line of the flattened menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: ItemId,
    pub depth: usize,
    pub title: String,
    pub enabled: bool,
    pub separator: bool,
    pub has_children: bool,
    pub expanded: bool,
}

pub struct App {
    pub(super) menu: Menu,
    pub(super) expanded: HashSet<ItemId>,
    pub(super) selected: usize,
    pub(super) requests: mpsc::UnboundedSender<RefreshRequest>,
    pub(super) auto_refresh: AutoRefresh,
    pub(super) config: Config,
    pub(super) status_message: Option<(String, bool)>,
    pub(super) theme: Theme,
}

impl App {
    pub fn new(
        menu: Menu,
        requests: mpsc::UnboundedSender<RefreshRequest>,
        auto_refresh: AutoRefresh,
        config: Config,
        theme: Theme,
    ) -> Self {
        Self {
            menu,
            expanded: HashSet::new(),
            selected: 0,
            requests,
            auto_refresh,
            config,
            status_message: None,
            theme,
        }
    }

    /// Visible menu items in display order, descending into expanded ones
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        self.collect_rows(ROOT_ID, 0, &mut rows);
        rows
    }

    fn collect_rows(&self, parent: ItemId, depth: usize, rows: &mut Vec<Row>) {
        for view in self.menu.visible_children(parent) {
            let expanded = view.has_children && self.expanded.contains(&view.id);
            rows.push(Row {
                id: view.id,
                depth,
                title: view.title,
                enabled: view.enabled,
                separator: view.separator,
                has_children: view.has_children,
                expanded,
            });
            if expanded {
                self.collect_rows(view.id, depth + 1, rows);
            }
        }
    }

    /// Index of the selected row, clamped to the current rows
    pub fn selected_index(&self, rows: &[Row]) -> usize {
        self.selected.min(rows.len().saturating_sub(1))
    }

    pub fn selected_row(&self) -> Option<Row> {
        let rows = self.rows();
        let index = self.selected_index(&rows);
        rows.into_iter().nth(index)
    }

    pub fn status_message(&self) -> Option<&(String, bool)> {
        self.status_message.as_ref()
    }

    pub fn set_status_message(&mut self, message: impl Into<String>, is_error: bool) {
        self.status_message = Some((message.into(), is_error));
    }

    pub(super) fn request(&mut self, request: RefreshRequest, message: &str) {
        if self.requests.send(request).is_err() {
            self.set_status_message("Refresh driver is not running", true);
        } else {
            self.set_status_message(message, false);
        }
    }

    /// Flip auto-refresh and persist the new value
    ///
    /// Only `autoRefresh.enabled` is written back to the config file.
    pub(super) fn toggle_auto_refresh(&mut self) {
        let enabled = self.auto_refresh.toggle();
        self.config.auto_refresh.enabled = enabled;
        tracing::info!("Auto refresh {}", if enabled { "enabled" } else { "disabled" });

        let saved = ConfigLoader::update_root(|config| {
            config.auto_refresh.enabled = enabled;
            Ok(())
        });
        match saved {
            Ok(_) => self.set_status_message(
                format!("Auto refresh {}", if enabled { "on" } else { "off" }),
                false,
            ),
            Err(e) => {
                tracing::warn!("Failed to persist auto refresh setting: {:#}", e);
                self.set_status_message(format!("Auto refresh not saved: {}", e), true);
            }
        }
    }
}
