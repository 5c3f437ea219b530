mod app;
mod config;
mod http;
mod language;
mod loader;
mod logging;
mod module;
mod nav;
mod notify;
mod tablegrid;
mod template;
mod ui;
mod view;

use crate::app::dispatch;
use crate::app::event::AppEvent;
use crate::app::handler;
use crate::app::root::{AppRoot, Services};
use crate::app::state::*;
use crate::language::Language;
use crate::module::about::AboutInfo;
use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, EventStream},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    // Install panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = restore_terminal();
        original_hook(info);
    }));

    let cfg = config::load_config()?;
    logging::init(&cfg.logging)?;

    let language = match &cfg.ui.language_file {
        Some(path) => Language::with_overrides(path)?,
        None => Language::english(),
    };

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
        .context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, cfg, language).await;

    // Restore terminal
    restore_terminal()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "exiting with error");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    cfg: config::AppConfig,
    language: Language,
) -> Result<()> {
    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<AppEvent>();

    let about = AboutInfo {
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        config_path: config::config_path().display().to_string(),
    };
    let services = Services::build(&cfg, language, about).context("Failed to build services")?;
    let mut root = AppRoot::new(services);
    let mut state = AppState::new();

    // Spawn terminal input task
    let term_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut reader = EventStream::new();
        loop {
            match reader.next().await {
                Some(Ok(event)) => {
                    if term_tx.send(AppEvent::Terminal(event)).is_err() {
                        break;
                    }
                }
                Some(Err(_)) => break,
                None => break,
            }
        }
    });

    // Spawn tick task (20 FPS = 50ms)
    let tick_tx = event_tx.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(50));
        loop {
            interval.tick().await;
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    root.start(Arc::new(cfg));
    flush_requests(root.services(), &event_tx);

    // Initial render
    terminal.draw(|f| ui::render(f, &state, &root))?;

    // Main event loop
    loop {
        let event = event_rx.recv().await;
        let Some(event) = event else { break };

        let actions = handler::handle_event(&mut state, event);
        for action in actions {
            dispatch::perform(&root, &mut state, action);
        }

        if state.should_quit {
            break;
        }

        flush_requests(root.services(), &event_tx);

        if take_dirty(&mut state, root.services()) {
            terminal.draw(|f| ui::render(f, &state, &root))?;
        }
    }

    Ok(())
}

/// Hand every queued API request to a background task.
fn flush_requests(services: &Services, tx: &mpsc::UnboundedSender<AppEvent>) {
    for request in services.http.drain() {
        services.http.dispatch(request, tx.clone());
    }
}

/// Whether anything on screen changed since the last frame. Clears every flag.
fn take_dirty(state: &mut AppState, services: &Services) -> bool {
    let shell = std::mem::take(&mut state.dirty);
    let view = services.view.take_dirty();
    let grid = services.table_grid.take_dirty();
    let notify = services.notify.take_dirty();
    shell || view || grid || notify
}
