//! Menu tree rendering

use crate::tui::app::Row;
use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Render the flattened tree, keeping the selected row in view
pub fn render_tree(f: &mut Frame, area: Rect, rows: &[Row], selected: usize, theme: &Theme) {
    let items: Vec<ListItem> = rows
        .iter()
        .map(|row| {
            let indent = "  ".repeat(row.depth);
            if row.separator {
                return ListItem::new(Line::from(Span::styled(
                    format!("{}────", indent),
                    theme.tree_item_style(false, false),
                )));
            }
            let marker = match (row.has_children, row.expanded) {
                (true, true) => "▾ ",
                (true, false) => "▸ ",
                (false, _) => "  ",
            };
            ListItem::new(Line::from(vec![
                Span::raw(indent),
                Span::raw(marker),
                Span::styled(
                    row.title.clone(),
                    theme.tree_item_style(row.enabled, row.has_children),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" Contexts "))
        .highlight_style(theme.tree_selected_style());

    let mut state = ListState::default();
    if !rows.is_empty() {
        state.select(Some(selected));
    }
    f.render_stateful_widget(list, area, &mut state);
}
