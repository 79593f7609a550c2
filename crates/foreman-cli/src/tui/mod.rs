//! Terminal user interface for foreman.
//!
//! ## Entry points
//!
//! - [`run_tui`]: sign-in screen, then dashboard, clients, projects and
//!   profile tabs gated by the user's role.

pub mod app;
pub mod draw;
pub mod form;

use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use foreman_core::Workspace;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::info;

use app::App;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Run the full-screen interface until the user quits.
pub fn run_tui(ws: Workspace) -> Result<()> {
    if !io::stdout().is_terminal() {
        bail!("`fm tui` needs an interactive terminal");
    }

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(ws);
    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("tui closed");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|frame| draw::render(frame, app))?;
        if event::poll(POLL_INTERVAL)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.handle_key(key);
        }
        if app.should_quit {
            return Ok(());
        }
    }
}
