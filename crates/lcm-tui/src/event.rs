//! Terminal event handling

use crate::message::{Message, Scroll};
use crossterm::event::{
    self, Event as CrosstermEvent, KeyEvent, KeyEventKind, MouseEvent, MouseEventKind,
};
use std::time::Duration;
use tokio::sync::mpsc;

/// Terminal events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Key press
    Key(KeyEvent),
    /// Mouse event
    Mouse(MouseEvent),
    /// Terminal resize
    Resize(u16, u16),
    /// Bracketed paste
    Paste(String),
}

impl Event {
    /// Translate into a state machine message; `None` for events we ignore
    pub fn into_message(self) -> Option<Message> {
        match self {
            Event::Key(key) if key.kind == KeyEventKind::Press => Some(Message::Key {
                code: key.code,
                modifiers: key.modifiers,
            }),
            Event::Key(_) => None,
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollUp => Some(Message::Wheel(Scroll::Up)),
                MouseEventKind::ScrollDown => Some(Message::Wheel(Scroll::Down)),
                _ => None,
            },
            Event::Resize(width, height) => Some(Message::Resize { width, height }),
            Event::Paste(text) => Some(Message::Paste(text)),
        }
    }
}

/// Reads terminal events on a blocking thread
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<Event>,
}

impl EventHandler {
    /// Start reading; `poll_interval` bounds how long shutdown can lag
    pub fn new(poll_interval: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let dispatch = tracing::dispatcher::get_default(|current| current.clone());

        tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || read_loop(&tx, poll_interval))
        });

        Self { rx }
    }

    /// Receive the next event; `None` once the reader has stopped
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

/// Forward terminal events until the receiver is dropped or the terminal fails
fn read_loop(tx: &mpsc::UnboundedSender<Event>, poll_interval: Duration) {
    while !tx.is_closed() {
        match event::poll(poll_interval) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                tracing::warn!("Terminal poll failed: {}", e);
                break;
            }
        }

        let event = match event::read() {
            Ok(CrosstermEvent::Key(key)) => Event::Key(key),
            Ok(CrosstermEvent::Mouse(mouse)) => Event::Mouse(mouse),
            Ok(CrosstermEvent::Resize(w, h)) => Event::Resize(w, h),
            Ok(CrosstermEvent::Paste(text)) => Event::Paste(text),
            Ok(_) => continue,
            Err(e) => {
                tracing::warn!("Terminal read failed: {}", e);
                break;
            }
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}
