//! Interactive TUI dashboard: onboarding, meal browser, progress log, tips
//! and profile.

pub mod app;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio_util::sync::CancellationToken;

use nutriguide_core::controller::AppController;

use crate::config::NutriConfig;
use app::{Action, App};

type Term = Terminal<CrosstermBackend<io::Stdout>>;

/// Launch the interactive TUI dashboard.
///
/// A missing plan is generated before the terminal is taken over, so
/// `cancel` (Ctrl-C) can still interrupt it.
pub async fn run_dashboard(config: &NutriConfig, cancel: &CancellationToken) -> Result<()> {
    let slots = config.slots()?;
    let generator = config.generator()?;
    let mut controller =
        AppController::load(slots, generator).context("failed to load saved data")?;

    if controller.needs_generation() {
        println!("Generating your plan...");
        controller.start(cancel).await?;
    }

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller);
    let result = run_event_loop(&mut terminal, &mut app).await;

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        let event = if event::poll(tick_rate)? {
            Some(event::read()?)
        } else {
            None
        };

        let action = app.handle_event(event).await;
        if action != Action::None {
            perform(terminal, app, action).await?;
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Draw the loading screen and await `action`. Esc or Ctrl-C cancels the
/// in-flight requests; an existing plan is kept, otherwise the failure
/// screen offers a retry.
async fn perform(terminal: &mut Term, app: &mut App, action: Action) -> Result<()> {
    app.busy = action.busy_label();
    terminal.draw(|f| ui::render(f, app))?;

    let cancel = CancellationToken::new();
    let done = CancellationToken::new();
    let watcher = watch_for_cancel(cancel.clone(), done.clone());

    let result = app.perform(action, &cancel).await;
    done.cancel();
    watcher.await.context("key watcher panicked")?;
    app.busy = None;

    if let Err(e) = result {
        tracing::error!(error = %e, "dashboard action failed");
        app.status_message = Some(e.to_string());
    }
    Ok(())
}

/// Read keys on a blocking thread until `done`, cancelling on Esc or Ctrl-C.
fn watch_for_cancel(
    cancel: CancellationToken,
    done: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while !done.is_cancelled() {
            match event::poll(Duration::from_millis(100)) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(_) => break,
            }
            if let Ok(Event::Key(key)) = event::read() {
                let ctrl_c = key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL);
                if key.code == KeyCode::Esc || ctrl_c {
                    tracing::info!("generation cancelled from the dashboard");
                    cancel.cancel();
                }
            }
        }
    })
}
