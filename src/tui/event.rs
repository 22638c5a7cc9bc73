//! Terminal event polling.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Terminal events the dashboard reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Nothing arrived before the timeout.
    Tick,
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Non-blocking reader of crossterm events.
#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    pub fn new() -> Self {
        Self
    }

    /// Waits up to `timeout` for the next relevant event.
    pub fn next(&self, timeout: Duration) -> io::Result<Event> {
        if !event::poll(timeout)? {
            return Ok(Event::Tick);
        }
        Ok(match event::read()? {
            CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
            CrosstermEvent::Resize(width, height) => Event::Resize(width, height),
            _ => Event::Tick,
        })
    }
}
