//! Terminal dashboard for a local container daemon
//!
//! Built with Ratatui. State lives in [`App`]; daemon calls run on background
//! tasks through [`worker::Worker`] and report back as [`Message`]s.

pub mod app;
pub mod browser;
mod event;
pub mod filter;
pub mod layout;
pub mod message;
pub mod pager;
pub mod search;
pub mod shell_session;
pub mod snapshot;
pub mod ui;
pub mod widgets;
pub mod worker;

pub use app::{App, AppConfig, AppError, AppResult, DestroyConfirmation, StatusLine, ViewMode};
pub use event::{Event, EventHandler};
pub use message::{Command, ContainerAction, Message};

use crossterm::{
    cursor::Show,
    event::{DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use lcm_provider::Connection;
use ratatui::prelude::*;
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing_subscriber::layer::SubscriberExt;
use worker::Worker;

/// Run the dashboard against an established connection
///
/// With `suppress_logs` set, tracing output is swallowed for the lifetime of
/// the UI so it cannot corrupt the display.
pub async fn run(connection: Connection, config: AppConfig, suppress_logs: bool) -> AppResult<()> {
    // The guard restores the previous subscriber when dropped
    let _guard = suppress_logs.then(|| {
        tracing::subscriber::set_default(
            tracing_subscriber::registry().with(tracing_subscriber::layer::Identity::new()),
        )
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let worker = Worker::new(Arc::from(connection.provider), tx);
    let mut app = App::new(connection.label, config);

    // Setup terminal
    enable_raw_mode()?;
    let res = match execute!(
        io::stdout(),
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableBracketedPaste
    ) {
        Ok(()) => run_app(&mut app, &worker, &mut rx).await,
        Err(e) => Err(e.into()),
    };

    // Restore terminal, even when the loop failed
    let restored = restore_terminal();
    res?;
    restored?;
    Ok(())
}

async fn run_app(
    app: &mut App,
    worker: &Worker,
    rx: &mut mpsc::UnboundedReceiver<Message>,
) -> AppResult<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    let size = terminal.size()?;
    app.update(Message::Resize {
        width: size.width,
        height: size.height,
    });
    app.run(&mut terminal, worker, rx).await
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        DisableMouseCapture,
        Show
    )
}
