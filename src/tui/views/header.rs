//! Header view rendering

use crate::tui::theme::Theme;
use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render the header with context and item totals and the auto-refresh state
pub fn render_header(
    f: &mut Frame,
    area: Rect,
    contexts: usize,
    items: usize,
    auto_refresh: bool,
    interval_secs: u64,
    theme: &Theme,
) {
    let auto = if auto_refresh {
        format!("on ({}s)", interval_secs)
    } else {
        "off".to_string()
    };

    let line = Line::from(vec![
        Span::styled("kubetray", theme.header_title_style()),
        Span::raw("  contexts: "),
        Span::styled(contexts.to_string(), theme.header_value_style()),
        Span::raw("  items: "),
        Span::styled(items.to_string(), theme.header_value_style()),
        Span::raw("  auto-refresh: "),
        Span::styled(auto, theme.auto_refresh_style(auto_refresh)),
    ]);

    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}
