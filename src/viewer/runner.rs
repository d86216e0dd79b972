//! Terminal setup and the event loop.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{debug, info};
use ratatui::prelude::*;

use super::app::App;
use super::model::Model;
use super::ui;

/// Run the interactive viewer until the user quits.
///
/// The terminal is restored even when the loop fails.
pub fn run_viewer(model: Model, tick_rate: Duration) -> io::Result<()> {
    let mut app = App::new(model);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    info!(tick_ms = tick_rate.as_millis() as u64; "viewer started");

    let result = run_app(&mut terminal, &mut app, tick_rate);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("viewer closed");

    result
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App, tick_rate: Duration) -> io::Result<()> {
    let mut dirty = true;
    loop {
        if dirty {
            terminal.draw(|frame| ui::render(frame, app))?;
            dirty = false;
        }

        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    dirty |= app.handle_key(key);
                }
                Event::Resize(width, height) => {
                    debug!(width = width, height = height; "terminal resized");
                    dirty = true;
                }
                _ => {}
            }
        }

        dirty |= app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}
