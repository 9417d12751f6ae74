//! Terminal user interface
//!
//! A ratatui front end over the status session and the action dispatcher.
//! The run loop owns the terminal; the [`App`] owns all UI state and hands
//! kubectl work back to the loop as [`Job`]s.

mod app;
mod constants;
mod keybindings;
mod theme;
pub mod views;

pub use app::*;
pub use theme::*;

use crate::config::Config;
use crate::kubectl::args;
use crate::services::{list_namespaces, ActionDispatcher, SharedSession};
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Run the TUI application until the user quits
pub async fn run_tui(
    session: SharedSession,
    dispatcher: Arc<ActionDispatcher>,
    context: String,
    config: &Config,
    theme: Theme,
) -> Result<()> {
    tracing::debug!("Initializing TUI");
    let mouse = config.ui.enable_mouse;

    let snapshot = session.lock().await.snapshot();
    let registry = crate::registry::ResourceRegistry::global();
    let mut app = App::new(registry, Arc::clone(&dispatcher), snapshot, context, theme);
    app.request_refresh(None, None);

    let mut terminal = enter_terminal(mouse)?;
    tracing::debug!("TUI initialized, entering main loop");

    let result = run_loop(&mut terminal, &mut app, &session, &dispatcher, mouse).await;

    tracing::debug!("TUI shutting down");
    leave_terminal(&mut terminal, mouse)?;
    result
}

async fn run_loop(
    terminal: &mut Term,
    app: &mut App,
    session: &SharedSession,
    dispatcher: &Arc<ActionDispatcher>,
    mouse: bool,
) -> Result<()> {
    use crate::tui::constants::EVENT_POLL_MS;

    loop {
        terminal.draw(|f| app.render(f))?;

        while let Some(job) = app.next_job() {
            match job {
                Job::Interactive { description, argv } => {
                    let message = run_interactive(terminal, mouse, &description, &argv).await?;
                    app.set_status_message(message);
                }
                job => spawn_job(job, session, dispatcher),
            }
        }

        app.poll_async();
        app.check_status_message_timeout();

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) == Some(true) {
                    return Ok(());
                }
            }
        }
    }
}

/// Start a job in the background; its result arrives on the job's channel
fn spawn_job(job: Job, session: &SharedSession, dispatcher: &Arc<ActionDispatcher>) {
    let runner = Arc::clone(&dispatcher.context().runner);
    match job {
        Job::Refresh {
            kind,
            namespace,
            tx,
        } => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                let mut session = session.lock().await;
                let result = session
                    .refresh(runner.as_ref(), kind.as_deref(), namespace.as_deref())
                    .await
                    .map(|()| session.snapshot())
                    .map_err(|e| e.to_string());
                if let Err(e) = &result {
                    tracing::warn!("Refresh failed: {}", e);
                }
                let _ = tx.send(result);
            });
        }
        Job::Filter { expr, tx } => {
            let session = Arc::clone(session);
            tokio::spawn(async move {
                let mut session = session.lock().await;
                let result = session
                    .set_filter(&expr)
                    .map(|()| session.snapshot())
                    .map_err(|e| e.to_string());
                let _ = tx.send(result);
            });
        }
        Job::Namespaces { tx } => {
            tokio::spawn(async move {
                let result = list_namespaces(runner.as_ref())
                    .await
                    .map_err(|e| e.to_string());
                let _ = tx.send(result);
            });
        }
        Job::Action { pending, tx } => {
            let dispatcher = Arc::clone(dispatcher);
            tokio::spawn(async move {
                let result = dispatcher
                    .dispatch(pending.key, Some(&pending.object), &pending.args)
                    .await;
                match &result {
                    Ok(_) => tracing::info!(
                        "Action '{}' finished on {}",
                        pending.key,
                        pending.object.display_name()
                    ),
                    Err(e) => tracing::warn!(
                        "Action '{}' failed on {}: {}",
                        pending.key,
                        pending.object.display_name(),
                        e
                    ),
                }
                let _ = tx.send(result.map_err(|e| e.to_string()));
            });
        }
        Job::Interactive { argv, .. } => {
            tracing::warn!("Interactive command {} reached the spawner", args::display(&argv));
        }
    }
}

/// Hand the terminal to `argv` until it exits, then restore the UI
async fn run_interactive(
    terminal: &mut Term,
    mouse: bool,
    description: &str,
    argv: &[String],
) -> Result<(String, bool)> {
    let Some((program, rest)) = argv.split_first() else {
        return Ok(("Empty command line".to_string(), true));
    };
    tracing::debug!("Running {} in the foreground", args::display(argv));

    leave_terminal(terminal, mouse)?;
    let status = tokio::process::Command::new(program)
        .args(rest)
        .status()
        .await;
    *terminal = enter_terminal(mouse)?;
    terminal.clear()?;

    Ok(match status {
        Ok(status) if status.success() => (format!("Finished {}", description), false),
        Ok(status) => (
            format!(
                "{} exited with status {}",
                description,
                status
                    .code()
                    .map_or_else(|| "unknown".to_string(), |code| code.to_string())
            ),
            true,
        ),
        Err(e) => (format!("Failed to run {}: {}", program, e), true),
    })
}

fn enter_terminal(mouse: bool) -> Result<Term> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn leave_terminal(terminal: &mut Term, mouse: bool) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    if mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    terminal.show_cursor()?;
    Ok(())
}
