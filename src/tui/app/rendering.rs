//! Rendering logic for the application

use super::core::App;
use crate::tui::views::{render_footer, render_header, render_tree};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

impl App {
    /// Main render entry point
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(f.area());

        let rows = self.rows();
        self.selected = self.selected_index(&rows);
        let contexts = rows.iter().filter(|row| row.depth == 0).count();

        render_header(
            f,
            chunks[0],
            contexts,
            self.menu.len(),
            self.auto_refresh.is_enabled(),
            self.config.auto_refresh.interval,
            &self.theme,
        );
        render_tree(f, chunks[1], &rows, self.selected, &self.theme);
        render_footer(f, chunks[2], self.status_message.as_ref(), &self.theme);
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::menu::Menu;
    use crate::reconcile::AutoRefresh;
    use crate::tui::{App, Theme};
    use ratatui::{Terminal, backend::TestBackend};
    use tokio::sync::mpsc;

    #[test]
    fn test_render_shows_contexts() {
        let menu = Menu::new();
        menu.root().add_child("dev").add_child("Refresh");
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = App::new(
            menu,
            tx,
            AutoRefresh::new(true),
            Config::default(),
            Theme::default(),
        );

        let mut terminal = Terminal::new(TestBackend::new(60, 12)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(text.contains("dev"));
        assert!(text.contains("auto-refresh"));
    }
}
