//! TUI module
//!
//! Terminal front end for the menu tree, built with ratatui. It only reads
//! the menu and delivers clicks; all tree changes come from the driver.

mod app;
mod theme;
mod views;

pub use app::*;
pub use theme::*;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use tokio::sync::mpsc;

use crate::config::Config;
use crate::listener::RefreshRequest;
use crate::menu::Menu;
use crate::reconcile::AutoRefresh;

/// Run the TUI until the user quits
pub async fn run_tui(
    menu: Menu,
    requests: mpsc::UnboundedSender<RefreshRequest>,
    auto_refresh: AutoRefresh,
    config: Config,
) -> Result<()> {
    tracing::debug!("Initializing TUI");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(menu, requests, auto_refresh, config, Theme::default());
    let outcome = event_loop(&mut terminal, &mut app).await;

    tracing::debug!("TUI shutting down");

    // Restore the terminal even if the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        // Redraw every tick so passes running in the background show up
        terminal.draw(|f| app.render(f))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) == Some(true) {
                    return Ok(());
                }
            }
        }

        // Let spawned passes and listeners make progress between polls
        tokio::task::yield_now().await;
    }
}
