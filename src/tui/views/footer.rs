//! Footer view rendering

use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

const KEYS: &[(&str, &str)] = &[
    ("↑↓", "move"),
    ("←→", "collapse/expand"),
    ("enter", "select"),
    ("r", "refresh"),
    ("R", "reload kubeconfig"),
    ("a", "auto-refresh"),
    ("q", "quit"),
];

/// Render the status message if there is one, the key hints otherwise
pub fn render_footer(
    f: &mut Frame,
    area: Rect,
    status_message: Option<&(String, bool)>,
    theme: &Theme,
) {
    let line = match status_message {
        Some((message, is_error)) => Line::from(Span::styled(
            message.clone(),
            theme.status_style(*is_error),
        )),
        None => Line::from(
            KEYS.iter()
                .flat_map(|(key, action)| {
                    [
                        Span::styled(format!("<{}>", key), theme.footer_key_style()),
                        Span::raw(format!(" {}  ", action)),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
    };

    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
