//! Theme and styling definitions

use ratatui::style::{Color, Modifier, Style};

/// Colors used by the TUI
pub struct Theme {
    pub header_title: Color,
    pub header_value: Color,
    pub auto_refresh_on: Color,
    pub auto_refresh_off: Color,

    pub tree_branch: Color,
    pub tree_leaf: Color,
    pub tree_disabled: Color,
    pub tree_selected: Color,
    pub tree_selected_bg: Color,

    pub footer_key: Color,
    pub status_info: Color,
    pub status_error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            header_title: Color::Cyan,
            header_value: Color::Yellow,
            auto_refresh_on: Color::Green,
            auto_refresh_off: Color::Gray,

            tree_branch: Color::White,
            tree_leaf: Color::Cyan,
            tree_disabled: Color::DarkGray,
            tree_selected: Color::Blue,
            tree_selected_bg: Color::DarkGray,

            footer_key: Color::Yellow,
            status_info: Color::Green,
            status_error: Color::Red,
        }
    }
}

impl Theme {
    pub fn header_title_style(&self) -> Style {
        Style::default()
            .fg(self.header_title)
            .add_modifier(Modifier::BOLD)
    }

    pub fn header_value_style(&self) -> Style {
        Style::default().fg(self.header_value)
    }

    pub fn auto_refresh_style(&self, enabled: bool) -> Style {
        Style::default()
            .fg(if enabled {
                self.auto_refresh_on
            } else {
                self.auto_refresh_off
            })
            .add_modifier(Modifier::BOLD)
    }

    pub fn tree_item_style(&self, enabled: bool, has_children: bool) -> Style {
        let fg = match (enabled, has_children) {
            (false, _) => self.tree_disabled,
            (true, true) => self.tree_branch,
            (true, false) => self.tree_leaf,
        };
        Style::default().fg(fg)
    }

    pub fn tree_selected_style(&self) -> Style {
        Style::default()
            .fg(self.tree_selected)
            .bg(self.tree_selected_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn footer_key_style(&self) -> Style {
        Style::default().fg(self.footer_key)
    }

    pub fn status_style(&self, is_error: bool) -> Style {
        Style::default()
            .fg(if is_error {
                self.status_error
            } else {
                self.status_info
            })
            .add_modifier(Modifier::BOLD)
    }
}
