mod app;
mod config;
mod fetch;
mod logging;
mod pager;
mod reading;
mod stats;
mod ui;

use anyhow::Result;
use app::App;
use clap::Parser;
use config::Args;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;
use tokio::sync::mpsc;

/// How often to refresh the UI.
const UI_TICK_RATE: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    logging::init(args.log_file.as_deref())?;

    // Start polling before the terminal is taken over, so the first
    // snapshot is often in flight by the time the first frame draws.
    let (tx, rx) = mpsc::unbounded_channel();
    let refresh = fetch::spawn_fetcher(args.url.clone(), args.refresh_interval(), tx)?;
    let mut app = App::new(args.threshold, args.rows_per_page(), rx, refresh);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Main loop
    let res = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = res {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Main application loop.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        app.process_updates();
        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(UI_TICK_RATE)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                KeyCode::Left | KeyCode::Char('h') => app.previous_page(),
                KeyCode::Right | KeyCode::Char('l') => app.next_page(),
                KeyCode::Char('r') => app.refresh_now(),
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
